//! Downloads remote fragments.

use crate::error::{Error, Result};
use fms_core::Template;
use reqwest::Client;
use tracing::debug;

/// Fetches fragments by name from a URL pattern.
#[derive(Debug, Clone)]
pub struct FragmentFetcher {
    url_template: Template,
    http_client: Client,
}

impl FragmentFetcher {
    /// Creates a fetcher for a pattern whose only placeholder is `{fragment}`.
    #[must_use]
    pub fn new(url_template: Template) -> Self {
        Self {
            url_template,
            http_client: Client::new(),
        }
    }

    /// The URL for one fragment.
    #[must_use]
    pub fn url_for(&self, fragment: &str) -> String {
        self.url_template.fill(|_| fragment)
    }

    /// Downloads a fragment with carriage returns removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server answers with an
    /// error status.
    pub async fn fetch(&self, fragment: &str) -> Result<String> {
        let url = self.url_for(fragment);
        debug!("Fetching {fragment} from {url}");

        let fetch_error = |source| Error::Fetch {
            fragment: fragment.to_string(),
            source,
        };
        let body = self
            .http_client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(fetch_error)?
            .text()
            .await
            .map_err(fetch_error)?;

        Ok(body.replace('\r', ""))
    }
}
