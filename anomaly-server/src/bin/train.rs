//! Offline trainer
//!
//! connect → fetch recent login features → fit → threshold → save.
//! Any failure exits non-zero; nothing is retried.

use std::fs;

use anomaly_core::{train, ModelError, TrainingParams, TrainingRow};
use anomaly_server::{
    config::{TrainerConfig, DEFAULT_LOG_FILTER},
    db, dsn, init_tracing,
};
use anyhow::{bail, Context};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = TrainerConfig::from_env();

    init_tracing(DEFAULT_LOG_FILTER, config.log_json);

    dsn::log_target(&config.target);

    let options = config
        .target
        .connect_options()
        .context("invalid database connection settings")?;
    let pool = db::create_pool(options)
        .await
        .context("failed to connect to database")?;

    let rows = db::fetch_training_rows(&pool, config.row_limit)
        .await
        .context("failed to fetch login features")?;
    pool.close().await;

    tracing::info!(rows = rows.len(), limit = config.row_limit, "Fetched login feature rows");

    let rows: Vec<TrainingRow> = rows.into_iter().map(TrainingRow::from).collect();
    let artifact = match train(&rows, &TrainingParams::default()) {
        Err(ModelError::EmptyTrainingSet) => {
            bail!("No features yet. Insert some login_events and refresh login_features first.")
        }
        result => result.context("model fitting failed")?,
    };

    artifact
        .save(&config.model_path)
        .with_context(|| format!("failed to write model artifact to {}", config.model_path.display()))?;

    let saved = fs::canonicalize(&config.model_path).unwrap_or_else(|_| config.model_path.clone());
    println!(
        "{}",
        serde_json::json!({
            "saved": saved.display().to_string(),
            "threshold": artifact.threshold,
            "version": artifact.version,
        })
    );

    Ok(())
}
