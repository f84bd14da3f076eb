//! `socrata-upload`: publishes confirmed reports.

use crate::cli::SocrataArgs;
use anyhow::{Context, Result, ensure};
use fms_socrata::{SocrataClient, SocrataConfig, upload_recent_reports};
use tracing::info;

/// Uploads the oldest `limit` confirmed reports.
pub async fn upload(args: &SocrataArgs) -> Result<()> {
    ensure!(args.limit > 0, "--limit must be positive, got {}", args.limit);

    let config = SocrataConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let client = SocrataClient::new(&config);

    let result = upload_recent_reports(&config, &client, args.limit)
        .await
        .with_context(|| format!("uploading reports to dataset {}", config.dataset))?;

    info!("Socrata upsert finished: {result}");
    println!("{result}");
    Ok(())
}
