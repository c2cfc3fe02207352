use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use scoring_init::{bootstrap, schema};
use scoring_kernel::{settings::Settings, Direction, Schema};

#[derive(Debug, Parser)]
#[command(name = "scoring-cli", version, about = "Manage the scoring_algo MongoDB schema")]
struct Cli {
    /// MongoDB connection string; overrides `database.uri` from configuration.
    #[arg(long, global = true, value_name = "URI")]
    uri: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create any missing collections and unique `id` indexes.
    Init,
    /// Print the schema without contacting the database.
    Plan {
        #[arg(long)]
        json: bool,
    },
    /// Check that every collection and index exists; exits non-zero otherwise.
    Verify,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load scoring-init settings")?;
    if let Some(uri) = cli.uri {
        settings.database.uri = uri;
    }
    scoring_telemetry::init(&settings.telemetry)?;

    tracing::debug!(env = ?settings.environment, command = ?cli.command, "scoring-cli starting");

    match cli.command {
        Command::Init => {
            let report = bootstrap::run(&settings).await?;
            println!("{}", report.confirmation());
        }
        Command::Plan { json } => {
            let schema = schema::scoring_algo();
            if json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else {
                print!("{}", render_plan(&schema));
            }
        }
        Command::Verify => {
            let report = bootstrap::check(&settings).await?;

            for name in &report.missing_collections {
                println!("missing collection: {}", name);
            }
            for problem in &report.index_problems {
                println!(
                    "index {} on {}: expected 1, found {}",
                    problem.index, problem.collection, problem.found
                );
            }
            for name in &report.unexpected_collections {
                println!("unexpected collection: {}", name);
            }

            if !report.is_complete() {
                bail!("database {} does not match the schema", report.database);
            }
            println!("Database {} matches the schema", report.database);
        }
    }

    Ok(())
}

fn render_plan(schema: &Schema) -> String {
    let mut out = format!("database {}\n", schema.database);
    for collection in &schema.collections {
        out.push_str(&format!("  collection {}\n", collection.name));
        for index in &collection.indexes {
            let direction = match index.direction {
                Direction::Ascending => "ascending",
                Direction::Descending => "descending",
            };
            out.push_str(&format!(
                "    {}index {} on {} ({})\n",
                if index.unique { "unique " } else { "" },
                index.default_name(),
                index.field,
                direction
            ));
        }
    }
    out
}
