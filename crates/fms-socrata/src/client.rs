//! SODA upsert client.

use crate::config::SocrataConfig;
use crate::error::{Error, Result};
use crate::report::SodaReport;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, warn};
use url::Url;

/// Socrata domain hosting the dataset.
pub const DEFAULT_DOMAIN: &str = "opendata.socrata.com";

/// Row counts reported by an upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct UpsertResult {
    /// Rows added.
    #[serde(rename = "Rows Created", default)]
    pub created: u64,
    /// Rows changed.
    #[serde(rename = "Rows Updated", default)]
    pub updated: u64,
    /// Rows removed.
    #[serde(rename = "Rows Deleted", default)]
    pub deleted: u64,
    /// Rows rejected.
    #[serde(rename = "Errors", default)]
    pub errors: u64,
}

impl fmt::Display for UpsertResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} deleted, {} errors",
            self.created, self.updated, self.deleted, self.errors
        )
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Authenticated client for one Socrata domain.
#[derive(Debug, Clone)]
pub struct SocrataClient {
    base_url: String,
    app_token: String,
    username: String,
    password: String,
    http_client: Client,
}

impl SocrataClient {
    /// Creates a client for [`DEFAULT_DOMAIN`] with the configured credentials.
    #[must_use]
    pub fn new(config: &SocrataConfig) -> Self {
        Self {
            base_url: format!("https://{DEFAULT_DOMAIN}"),
            app_token: config.app_token.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            http_client: Client::new(),
        }
    }

    /// Points the client at another server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn resource_url(&self, dataset: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;
        Ok(base.join(&format!("/resource/{dataset}.json"))?)
    }

    /// Inserts or updates `reports` in `dataset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Socrata rejects it.
    pub async fn upsert(&self, dataset: &str, reports: &[SodaReport]) -> Result<UpsertResult> {
        let url = self.resource_url(dataset)?;
        debug!("Upserting {} reports to {url}", reports.len());

        let response = self
            .http_client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .header("X-App-Token", &self.app_token)
            .json(reports)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or(body);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: UpsertResult = response.json().await?;
        if result.errors > 0 {
            warn!("Socrata rejected {} rows", result.errors);
        }
        info!("Upsert to {dataset}: {result}");
        Ok(result)
    }
}
