//! Site configuration read from `conf/general.yml`.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// `PostgreSQL` connection settings for the `FixMyStreet` database.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// Database host.
    #[serde(rename = "FMS_DB_HOST")]
    pub host: String,
    /// Database name.
    #[serde(rename = "FMS_DB_NAME")]
    pub name: String,
    /// Database user.
    #[serde(rename = "FMS_DB_USER")]
    pub user: String,
    /// Database password.
    #[serde(rename = "FMS_DB_PASS", default)]
    pub password: String,
    /// Database port, when not the default.
    #[serde(rename = "FMS_DB_PORT", default)]
    pub port: Option<u16>,
}

/// Everything the Socrata upload needs.
///
/// `general.yml` holds many other keys; they are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SocrataConfig {
    /// Database settings.
    #[serde(flatten)]
    pub database: DatabaseConfig,
    /// SODA application token.
    #[serde(rename = "SOCRATA_APP_TOKEN")]
    pub app_token: String,
    /// Socrata account user name.
    #[serde(rename = "SOCRATA_USERNAME")]
    pub username: String,
    /// Socrata account password.
    #[serde(rename = "SOCRATA_PASSWORD")]
    pub password: String,
    /// Dataset identifier to upsert into (e.g. `abcd-1234`).
    #[serde(rename = "SOCRATA_DATASET_URL")]
    pub dataset: String,
}

impl SocrataConfig {
    /// Parses configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a key is missing, or the
    /// dataset identifier is empty.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        if config.dataset.trim().is_empty() {
            return Err(Error::Config("SOCRATA_DATASET_URL is empty".to_string()));
        }
        Ok(config)
    }

    /// Reads configuration from a `general.yml` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading Socrata configuration from {}", path.display());
        Self::from_yaml_str(&std::fs::read_to_string(path)?)
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

    const GENERAL: &str = "\
FMS_DB_HOST: localhost
FMS_DB_NAME: fms
FMS_DB_USER: fms
FMS_DB_PASS: secret
BASE_URL: 'http://www.example.org'
SOCRATA_APP_TOKEN: app-token
SOCRATA_USERNAME: user@example.org
SOCRATA_PASSWORD: hunter2
SOCRATA_DATASET_URL: abcd-1234
";

    #[test]
    fn test_general_yml_keys() {
        let config = SocrataConfig::from_yaml_str(GENERAL).unwrap();
        assert_eq!(
            config.database,
            DatabaseConfig {
                host: "localhost".to_string(),
                name: "fms".to_string(),
                user: "fms".to_string(),
                password: "secret".to_string(),
                port: None,
            }
        );
        assert_eq!(config.app_token, "app-token");
        assert_eq!(config.username, "user@example.org");
        assert_eq!(config.dataset, "abcd-1234");
    }

    #[test]
    fn test_missing_key() {
        let yaml = GENERAL.replace("SOCRATA_APP_TOKEN: app-token\n", "");
        assert!(matches!(
            SocrataConfig::from_yaml_str(&yaml),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn test_empty_dataset() {
        let yaml = GENERAL.replace("abcd-1234", "''");
        assert!(matches!(
            SocrataConfig::from_yaml_str(&yaml),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("general.yml");
        std::fs::write(&path, GENERAL).unwrap();
        assert_eq!(SocrataConfig::load(&path).unwrap().database.port, None);
    }
}
