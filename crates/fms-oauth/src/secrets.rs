//! Client secrets downloaded from the Google Cloud console.
//!
//! The file wraps the client under an `installed` (desktop app) or `web` key:
//!
//! ```json
//! {"installed": {"client_id": "...", "client_secret": "...",
//!   "auth_uri": "https://accounts.google.com/o/oauth2/auth",
//!   "token_uri": "https://oauth2.googleapis.com/token",
//!   "redirect_uris": ["http://localhost"]}}
//! ```

use crate::error::{Error, Result};
use crate::flow::OAuthClient;
use crate::provider::{GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, Provider};
use serde::Deserialize;
use std::path::Path;

/// Redirect used when the secrets file lists none.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost";

/// An `OAuth2` client registration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    /// Client ID.
    pub client_id: String,
    /// Client secret.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Authorization endpoint.
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    /// Token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// Registered redirect URIs.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URL.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

impl ClientSecrets {
    /// Parses a client secrets document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or has neither an
    /// `installed` nor a `web` section.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: SecretsFile = serde_json::from_str(json)?;
        let secrets = file.installed.or(file.web).ok_or_else(|| {
            Error::InvalidConfig(
                "client secrets must contain an \"installed\" or \"web\" section".to_string(),
            )
        })?;
        if secrets.client_id.is_empty() {
            return Err(Error::InvalidConfig("client_id is empty".to_string()));
        }
        Ok(secrets)
    }

    /// Reads a client secrets file such as `credentials.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// The redirect URI used for the console flow.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map_or(DEFAULT_REDIRECT_URI, String::as_str)
    }

    /// Builds a client for these secrets requesting `scopes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints in the file are not valid URLs.
    pub fn client<S: AsRef<str>>(&self, scopes: &[S]) -> Result<OAuthClient> {
        let provider =
            Provider::new("Google", &self.auth_uri, &self.token_uri)?.with_default_scopes(scopes);
        provider.validate()?;

        let mut client =
            OAuthClient::new(&self.client_id, provider).with_redirect_uri(self.redirect_uri());
        if let Some(secret) = &self.client_secret {
            client = client.with_client_secret(secret);
        }
        Ok(client)
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
    use crate::SHEETS_READONLY_SCOPE;

    const INSTALLED: &str = r#"{"installed": {
        "client_id": "123.apps.googleusercontent.com",
        "project_id": "fms-sheets",
        "auth_uri": "https://accounts.google.com/o/oauth2/auth",
        "token_uri": "https://oauth2.googleapis.com/token",
        "client_secret": "shh",
        "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob", "http://localhost"]
    }}"#;

    #[test]
    fn test_installed_secrets() {
        let secrets = ClientSecrets::from_json_str(INSTALLED).unwrap();
        assert_eq!(secrets.client_id, "123.apps.googleusercontent.com");
        assert_eq!(secrets.client_secret.as_deref(), Some("shh"));
        assert_eq!(secrets.redirect_uri(), "urn:ietf:wg:oauth:2.0:oob");

        let client = secrets.client(&[SHEETS_READONLY_SCOPE]).unwrap();
        assert_eq!(client.client_id, secrets.client_id);
        assert_eq!(client.provider.default_scopes, vec![SHEETS_READONLY_SCOPE]);
        assert!(client.provider.is_google());
    }

    #[test]
    fn test_web_secrets_with_defaults() {
        let secrets = ClientSecrets::from_json_str(r#"{"web": {"client_id": "abc"}}"#).unwrap();
        assert_eq!(secrets.token_uri, GOOGLE_TOKEN_URL);
        assert_eq!(secrets.redirect_uri(), DEFAULT_REDIRECT_URI);
        assert!(secrets.client_secret.is_none());
    }

    #[test]
    fn test_missing_section() {
        let err = ClientSecrets::from_json_str(r#"{"other": {}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, INSTALLED).unwrap();
        assert!(ClientSecrets::from_file(&path).is_ok());
        assert!(matches!(
            ClientSecrets::from_file(dir.path().join("absent.json")),
            Err(Error::Io(_))
        ));
    }
}
