use anyhow::Context;
use scoring_db::{InitReport, MongoStore, VerifyReport};
use scoring_kernel::settings::Settings;

use crate::schema;

/// Connect with `settings` and apply the `scoring_algo` schema.
pub async fn run(settings: &Settings) -> anyhow::Result<InitReport> {
    let schema = schema::scoring_algo();
    let store = MongoStore::connect(&settings.database, schema.database)
        .await
        .context("failed to configure MongoDB client")?;

    let report = scoring_db::initialize(&store, &schema)
        .await
        .with_context(|| format!("failed to initialize database {}", schema.database))?;

    Ok(report)
}

/// Connect with `settings` and compare the store with the `scoring_algo` schema.
pub async fn check(settings: &Settings) -> anyhow::Result<VerifyReport> {
    let schema = schema::scoring_algo();
    let store = MongoStore::connect(&settings.database, schema.database)
        .await
        .context("failed to configure MongoDB client")?;

    let report = scoring_db::verify(&store, &schema)
        .await
        .with_context(|| format!("failed to verify database {}", schema.database))?;

    Ok(report)
}
