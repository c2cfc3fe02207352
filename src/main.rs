use anyhow::Context;
use scoring_kernel::settings::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load scoring-init settings")?;
    scoring_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        database = scoring_init::schema::DATABASE,
        "scoring-init bootstrap starting"
    );

    let report = scoring_init::bootstrap::run(&settings).await?;

    println!("{}", report.confirmation());
    Ok(())
}
