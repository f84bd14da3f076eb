//! Configuration model for the categories sheet tools.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::range::SheetRange;
use super::validation::validate_config;
use crate::error::{Error, Result};

/// Environment variable that overrides `disabled_message`.
pub const DISABLED_MESSAGE_ENV: &str = "DISABLED_MESSAGE";

/// Zero-based column indices of the fields the classifier reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Columns {
    /// Group (department) column.
    pub group: usize,
    /// Category name column.
    pub category: usize,
    /// Email candidate columns, in priority order.
    pub emails: Vec<usize>,
    /// WFS layer name column.
    pub wfs_layer: usize,
}

impl Default for Columns {
    fn default() -> Self {
        // Layout of the master categories sheet.
        Self {
            group: 0,
            category: 1,
            emails: vec![3, 6, 9],
            wfs_layer: 15,
        }
    }
}

/// Per-category settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Extra form fields attached to the category in `categories.json`.
    pub extra_fields: Option<Value>,
    /// Asset attributes attached to the category's WFS layer in `layers.js`.
    pub wfs_attributes: Option<Value>,
}

/// Configuration for one run of the categories tools.
///
/// Loaded once at startup and passed by reference afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Spreadsheet document ID.
    #[serde(default)]
    pub doc_id: String,
    /// Range to fetch, e.g. `A1:P999`.
    pub sheet_range: String,
    /// Column layout.
    #[serde(default)]
    pub columns: Columns,
    /// Template turning an address into a forwarding alias, e.g.
    /// `forward+{email}@example.org`.
    #[serde(default)]
    pub email_replacement: Option<String>,
    /// Per-category settings keyed by category name.
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryConfig>,
    /// Message shown while reporting in a category is disabled.
    #[serde(default)]
    pub disabled_message: Option<String>,
}

impl Config {
    /// Parses and validates a YAML configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or validation fails.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        validate_config(&config).map_err(Error::Invalid)?;
        config.warn_unreachable_columns();
        Ok(config)
    }

    /// Loads the configuration file and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let yaml = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Applies `DISABLED_MESSAGE` from the environment, if set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(message) = std::env::var(DISABLED_MESSAGE_ENV) {
            debug!("Using {DISABLED_MESSAGE_ENV} from environment");
            self.disabled_message = Some(message);
        }
    }

    /// Parsed sheet range.
    ///
    /// # Errors
    ///
    /// Returns an error if `sheet_range` is not a valid A1 range.
    pub fn range(&self) -> Result<SheetRange> {
        SheetRange::parse(&self.sheet_range)
    }

    /// Non-empty forwarding alias template, if configured.
    #[must_use]
    pub fn email_replacement(&self) -> Option<&str> {
        self.email_replacement.as_deref().filter(|t| !t.is_empty())
    }

    /// Settings for a category, if it has any.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories.get(name)
    }

    /// Message for `categories.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither the file nor the environment provided one.
    pub fn disabled_message(&self) -> Result<&str> {
        self.disabled_message.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "disabled_message is not set (add it to the config or set {DISABLED_MESSAGE_ENV})"
            ))
        })
    }

    /// Logs column indices that no row can reach after padding.
    fn warn_unreachable_columns(&self) {
        let Ok(range) = self.range() else {
            return;
        };
        let width = range.column_count();
        let columns = &self.columns;
        let fields = [
            ("group", columns.group),
            ("category", columns.category),
            ("wfs_layer", columns.wfs_layer),
        ]
        .into_iter()
        .chain(columns.emails.iter().map(|&index| ("emails", index)));

        for (field, index) in fields {
            if index >= width {
                warn!(
                    "columns.{field} = {index} is outside {} ({width} columns); every row will be skipped",
                    self.sheet_range
                );
            }
        }
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
    use serde_json::json;

    const SAMPLE: &str = r#"
doc_id: 1AbCdEf
sheet_range: "Master!A1:P999"
email_replacement: "forward+{email}@example.org"
disabled_message: Please call us instead.
categories:
  Potholes:
    extra_fields:
      - code: depth
        description: How deep is it?
  Street lighting:
    wfs_attributes:
      asset_id: central_asset_id
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.doc_id, "1AbCdEf");
        assert_eq!(config.columns, Columns::default());
        assert_eq!(config.range().unwrap().column_count(), 16);
        assert_eq!(
            config.email_replacement(),
            Some("forward+{email}@example.org")
        );
        assert_eq!(config.disabled_message().unwrap(), "Please call us instead.");

        let potholes = config.category("Potholes").unwrap();
        assert_eq!(
            potholes.extra_fields,
            Some(json!([{"code": "depth", "description": "How deep is it?"}]))
        );
        assert!(potholes.wfs_attributes.is_none());

        let lighting = config.category("Street lighting").unwrap();
        assert_eq!(
            lighting.wfs_attributes,
            Some(json!({"asset_id": "central_asset_id"}))
        );
        assert!(config.category("Graffiti").is_none());
    }

    #[test]
    fn test_custom_columns() {
        let config = Config::from_yaml_str(
            "sheet_range: A1:K9\ncolumns:\n  emails: [2, 4, 9]\n  wfs_layer: 10\n",
        )
        .unwrap();
        assert_eq!(config.columns.group, 0);
        assert_eq!(config.columns.category, 1);
        assert_eq!(config.columns.emails, vec![2, 4, 9]);
        assert_eq!(config.columns.wfs_layer, 10);
    }

    #[test]
    fn test_empty_replacement_is_disabled() {
        let config =
            Config::from_yaml_str("sheet_range: A1:P9\nemail_replacement: \"\"\n").unwrap();
        assert_eq!(config.email_replacement(), None);
    }

    #[test]
    fn test_missing_disabled_message() {
        let config = Config::from_yaml_str("sheet_range: A1:P9\n").unwrap();
        assert!(matches!(config.disabled_message(), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_config_reports_all_errors() {
        let err = Config::from_yaml_str(
            "sheet_range: \"1:9\"\ncolumns: {emails: []}\nemail_replacement: \"{mail}\"\n",
        )
        .unwrap_err();
        let Error::Invalid(errors) = err else {
            panic!("expected validation errors, got {err:?}");
        };
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.doc_id, "1AbCdEf");
    }
}
