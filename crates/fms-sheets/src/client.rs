//! HTTP client for `spreadsheets.values.get`.

use crate::error::{Error, Result};
use crate::values::ValueRange;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

/// Production Sheets API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Reads spreadsheet values with a bearer token.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    base_url: String,
    access_token: String,
    http_client: Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

impl SheetsClient {
    /// Creates a client using `access_token` against the production API.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
            http_client: Client::new(),
        }
    }

    /// Points the client at another server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn values_url(&self, doc_id: &str, range: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", doc_id, "values", range]);
        Ok(url)
    }

    /// Fetches the cells of `range` (A1 notation) as text rows.
    ///
    /// An empty range yields no rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API reports an error, or
    /// the response is not a value range.
    pub async fn values(&self, doc_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(doc_id, range)?;
        debug!("GET {url}");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let rows = response.json::<ValueRange>().await?.into_rows();
        info!("Read {} rows from {range}", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_values_url_encodes_range() {
        let client = SheetsClient::new("t");
        let url = client.values_url("doc123", "Categories 2024!A2:P").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/doc123/values/Categories%202024!A2:P"
        );
    }

    #[test]
    fn test_base_url_with_trailing_slash() {
        let client = SheetsClient::new("t").with_base_url("http://127.0.0.1:9/");
        let url = client.values_url("d", "A1:B2").unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/d/values/A1:B2");
    }
}
