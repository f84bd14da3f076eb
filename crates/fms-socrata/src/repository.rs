//! Reads confirmed problems from the `FixMyStreet` database.

use crate::config::DatabaseConfig;
use crate::error::Result;
use chrono::NaiveDateTime;
use sqlx::Row;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use tracing::{debug, info};

/// Reports uploaded per run unless told otherwise.
pub const DEFAULT_LIMIT: i64 = 5;

/// The columns of a `problem` row that are published.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemRow {
    /// Problem ID.
    pub id: i32,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// When the report was confirmed.
    pub confirmed: Option<NaiveDateTime>,
    /// Report category.
    pub category: String,
    /// Report title.
    pub title: String,
}

/// Opens a small pool for the given database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .database(&config.name)
        .username(&config.user)
        .password(&config.password);
    if let Some(port) = config.port {
        options = options.port(port);
    }

    debug!("Connecting to {} on {}", config.name, config.host);
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Confirmed reports, oldest confirmation first, at most `limit` of them.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn recent_reports(pool: &PgPool, limit: i64) -> Result<Vec<ProblemRow>> {
    let rows = sqlx::query(
        r"
        SELECT id, latitude, longitude, confirmed, category, title
        FROM problem
        WHERE state = 'confirmed'
        ORDER BY confirmed ASC
        LIMIT $1
        ",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let problems = rows
        .iter()
        .map(row_to_problem)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    info!("Fetched {} confirmed reports", problems.len());
    Ok(problems)
}

fn row_to_problem(row: &PgRow) -> std::result::Result<ProblemRow, sqlx::Error> {
    Ok(ProblemRow {
        id: row.try_get("id")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        confirmed: row.try_get("confirmed")?,
        category: row.try_get("category")?,
        title: row.try_get("title")?,
    })
}
