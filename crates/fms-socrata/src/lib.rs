//! # fms-socrata
//!
//! Publishes confirmed `FixMyStreet` reports to a Socrata dataset through the
//! SODA upsert endpoint.
//!
//! ## Flow
//!
//! 1. [`SocrataConfig::load`] reads the site's `conf/general.yml`
//! 2. [`recent_reports`] selects confirmed problems from the `problem` table
//! 3. Each [`ProblemRow`] becomes a [`SodaReport`]
//! 4. [`SocrataClient::upsert`] posts them and returns the row counts

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod report;
mod repository;

pub use client::{DEFAULT_DOMAIN, SocrataClient, UpsertResult};
pub use config::{DatabaseConfig, SocrataConfig};
pub use error::{Error, Result};
pub use report::{Location, REPORT_URL_BASE, SodaReport, isoformat};
pub use repository::{DEFAULT_LIMIT, ProblemRow, connect, recent_reports};

/// Reads the oldest `limit` confirmed reports and upserts them.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or queried, or if the
/// upload fails.
pub async fn upload_recent_reports(
    config: &SocrataConfig,
    client: &SocrataClient,
    limit: i64,
) -> Result<UpsertResult> {
    let pool = connect(&config.database).await?;
    let rows = recent_reports(&pool, limit).await?;
    pool.close().await;

    let reports: Vec<SodaReport> = rows.into_iter().map(SodaReport::from).collect();
    client.upsert(&config.dataset, &reports).await
}
