//! `categories.json` export.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::classify::ParsedRow;
use crate::config::Config;
use crate::error::Result;

/// A routed category inside a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryEntry {
    /// Category name.
    pub category: String,
    /// Routing address.
    pub email: String,
    /// Extra form fields from the configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_fields: Option<Value>,
}

/// Document written to `categories.json` for the category importer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryExport {
    /// Message shown for disabled categories.
    pub disabled_message: String,
    /// Categories keyed by group, each in sheet order.
    pub groups: BTreeMap<String, Vec<CategoryEntry>>,
}

impl CategoryExport {
    /// Groups routed rows by group name.
    ///
    /// Rows without an email are left out. `extra_fields` is attached only
    /// when the category's configured value is non-empty.
    ///
    /// # Errors
    ///
    /// Returns an error if no `disabled_message` is configured.
    pub fn build(rows: &[ParsedRow], config: &Config) -> Result<Self> {
        let disabled_message = config.disabled_message()?.to_string();
        let mut groups: BTreeMap<String, Vec<CategoryEntry>> = BTreeMap::new();

        for row in rows {
            let Some(email) = &row.email else {
                continue;
            };
            let extra_fields = config
                .category(&row.category)
                .and_then(|c| c.extra_fields.as_ref())
                .filter(|v| is_present(v))
                .cloned();

            groups.entry(row.group.clone()).or_default().push(CategoryEntry {
                category: row.category.clone(),
                email: email.clone(),
                extra_fields,
            });
        }

        Ok(Self {
            disabled_message,
            groups,
        })
    }

    /// Total number of categories across all groups.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Serializes with 2-space indentation and sorted keys.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let value = sort_keys(serde_json::to_value(self)?);
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Writes the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        info!(
            "Wrote {} categories in {} groups to {}",
            self.category_count(),
            self.groups.len(),
            path.display()
        );
        Ok(())
    }
}

/// Rebuilds every object in `value` with its keys in ascending order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Whether a configured value counts as set (not null, false, zero or empty).
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
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
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(group: &str, category: &str, email: Option<&str>) -> ParsedRow {
        ParsedRow {
            group: group.to_string(),
            category: category.to_string(),
            email: email.map(ToString::to_string),
            wfs_layer: String::new(),
        }
    }

    fn config() -> Config {
        Config::from_yaml_str(
            r"
sheet_range: A1:P999
disabled_message: Reporting is paused.
categories:
  Potholes:
    extra_fields:
      - code: depth
  Graffiti:
    extra_fields: []
  Litter:
    wfs_attributes: {bin: id}
",
        )
        .unwrap()
    }

    #[test]
    fn test_groups_and_skips_unrouted() {
        let rows = vec![
            row("Roads", "Potholes", Some("roads@x.org")),
            row("Parks", "Litter", Some("parks@x.org")),
            row("Roads", "Gritting", None),
            row("Roads", "Drains", Some("drains@x.org")),
        ];
        let export = CategoryExport::build(&rows, &config()).unwrap();

        assert_eq!(export.disabled_message, "Reporting is paused.");
        assert_eq!(export.groups.keys().collect::<Vec<_>>(), vec!["Parks", "Roads"]);
        let roads: Vec<_> = export.groups["Roads"].iter().map(|e| e.category.as_str()).collect();
        assert_eq!(roads, vec!["Potholes", "Drains"]);
        assert_eq!(export.category_count(), 3);
    }

    #[test]
    fn test_extra_fields_only_when_present() {
        let rows = vec![
            row("Roads", "Potholes", Some("roads@x.org")),
            row("Roads", "Graffiti", Some("roads@x.org")),
            row("Roads", "Signs", Some("roads@x.org")),
        ];
        let export = CategoryExport::build(&rows, &config()).unwrap();
        let roads = &export.groups["Roads"];
        assert_eq!(roads[0].extra_fields, Some(json!([{"code": "depth"}])));
        assert_eq!(roads[1].extra_fields, None);
        assert_eq!(roads[2].extra_fields, None);
    }

    #[test]
    fn test_json_layout() {
        let rows = vec![
            row("Roads", "Potholes", Some("roads@x.org")),
            row("Animals", "Dead animal", Some("animals@x.org")),
        ];
        let json = CategoryExport::build(&rows, &config())
            .unwrap()
            .to_json()
            .unwrap();
        let expected = r#"{
  "disabled_message": "Reporting is paused.",
  "groups": {
    "Animals": [
      {
        "category": "Dead animal",
        "email": "animals@x.org"
      }
    ],
    "Roads": [
      {
        "category": "Potholes",
        "email": "roads@x.org",
        "extra_fields": [
          {
            "code": "depth"
          }
        ]
      }
    ]
  }
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_nested_keys_sorted() {
        let config = Config::from_yaml_str(
            r"
sheet_range: A1:P999
disabled_message: Closed.
categories:
  Potholes:
    extra_fields:
      - {zeta: 1, alpha: 2}
",
        )
        .unwrap();
        let rows = vec![row("Roads", "Potholes", Some("roads@x.org"))];
        let json = CategoryExport::build(&rows, &config)
            .unwrap()
            .to_json()
            .unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        assert!(alpha < zeta);
        assert!(json.find("\"category\"").unwrap() < json.find("\"email\"").unwrap());
    }

    #[test]
    fn test_leading_space_address_is_not_exported() {
        let config = Config::from_yaml_str(
            "sheet_range: A1:K9\ndisabled_message: Closed.\ncolumns: {emails: [2], wfs_layer: 10}\n",
        )
        .unwrap();
        let rows = crate::classify::classify_rows(
            [
                vec!["Roads", "Potholes", " a@x.org"],
                vec!["Roads", "Drains", "d@x.org"],
            ],
            &config,
        )
        .unwrap();
        let export = CategoryExport::build(&rows, &config).unwrap();
        let roads: Vec<_> = export.groups["Roads"].iter().map(|e| e.category.as_str()).collect();
        assert_eq!(roads, vec!["Drains"]);
        assert!(!export.to_json().unwrap().contains("\"email\": \"\""));
    }

    #[test]
    fn test_missing_disabled_message() {
        let config = Config::from_yaml_str("sheet_range: A1:P9\n").unwrap();
        assert!(CategoryExport::build(&[], &config).is_err());
    }

    #[test]
    fn test_is_present() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!(false)));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!([])));
        assert!(!is_present(&json!({})));
        assert!(is_present(&json!(true)));
        assert!(is_present(&json!(2)));
        assert!(is_present(&json!("x")));
        assert!(is_present(&json!([0])));
    }
}
