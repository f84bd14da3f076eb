//! `layers.js` export: WFS layer to category mappings for the cobrand's
//! `assets.js`.

use std::fmt;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use super::json::to_spaced_string;
use crate::classify::ParsedRow;
use crate::config::Config;
use crate::error::Result;

/// One `fixmystreet.assets.add` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerMapping {
    /// WFS feature type name.
    pub wfs_layer: String,
    /// Category the layer is attached to.
    pub category: String,
    /// JSON-encoded asset attributes.
    pub attributes: String,
}

impl fmt::Display for LayerMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            concat!(
                "\n",
                "fixmystreet.assets.add(wfs_defaults, {{\n",
                "    wfs_feature: \"{layer}\",\n",
                "    asset_category: \"{category}\",\n",
                "    attributes: {attributes}\n",
                "}});\n",
            ),
            layer = self.wfs_layer,
            category = self.category,
            attributes = self.attributes,
        )
    }
}

/// The mappings written to `layers.js`, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerSet {
    /// Mappings in row order.
    pub mappings: Vec<LayerMapping>,
}

impl LayerSet {
    /// Collects a mapping for each routed row with a WFS layer.
    ///
    /// Rows without a layer are skipped silently. Rows with a layer but no
    /// email are skipped with a warning, since the layer would point at a
    /// category that is never created.
    ///
    /// # Errors
    ///
    /// Returns an error if a category's attributes cannot be encoded.
    pub fn build(rows: &[ParsedRow], config: &Config) -> Result<Self> {
        let empty = Value::Object(serde_json::Map::new());
        let mut mappings = Vec::new();

        for row in rows.iter().filter(|row| !row.wfs_layer.is_empty()) {
            if row.email.is_none() {
                warn!(
                    "No email category for WFS layer {}, skipping.",
                    row.wfs_layer
                );
                continue;
            }

            let attributes = config
                .category(&row.category)
                .and_then(|c| c.wfs_attributes.as_ref())
                .unwrap_or(&empty);

            mappings.push(LayerMapping {
                wfs_layer: row.wfs_layer.clone(),
                category: row.category.clone(),
                attributes: to_spaced_string(attributes)?,
            });
        }

        Ok(Self { mappings })
    }

    /// Renders every mapping, each followed by a blank line.
    #[must_use]
    pub fn render(&self) -> String {
        self.mappings.iter().map(|m| format!("{m}\n")).collect()
    }

    /// Writes the rendered mappings to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.render())?;
        info!("Wrote {} WFS layers to {}", self.mappings.len(), path.display());
        Ok(())
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

    fn row(category: &str, email: Option<&str>, wfs_layer: &str) -> ParsedRow {
        ParsedRow {
            group: "Roads".to_string(),
            category: category.to_string(),
            email: email.map(ToString::to_string),
            wfs_layer: wfs_layer.to_string(),
        }
    }

    fn config() -> Config {
        Config::from_yaml_str(
            r"
sheet_range: A1:P999
categories:
  Street lights:
    wfs_attributes:
      asset_id: central_asset_id
      type: lamp
",
        )
        .unwrap()
    }

    #[test]
    fn test_render_fragment() {
        let rows = vec![row("Street lights", Some("l@x.org"), "lighting:columns")];
        let layers = LayerSet::build(&rows, &config()).unwrap();
        let expected = concat!(
            "\n",
            "fixmystreet.assets.add(wfs_defaults, {\n",
            "    wfs_feature: \"lighting:columns\",\n",
            "    asset_category: \"Street lights\",\n",
            "    attributes: {\"asset_id\": \"central_asset_id\", \"type\": \"lamp\"}\n",
            "});\n",
            "\n",
        );
        assert_eq!(layers.render(), expected);
    }

    #[test]
    fn test_default_attributes() {
        let rows = vec![row("Potholes", Some("p@x.org"), "roads:potholes")];
        let layers = LayerSet::build(&rows, &config()).unwrap();
        assert_eq!(layers.mappings[0].attributes, "{}");
    }

    #[test]
    fn test_attribute_order_follows_config() {
        let config = Config::from_yaml_str(
            "sheet_range: A1:P9\ncategories:\n  Bins:\n    wfs_attributes: {zeta: 1, alpha: 2}\n",
        )
        .unwrap();
        let rows = vec![row("Bins", Some("b@x.org"), "waste:bins")];
        let layers = LayerSet::build(&rows, &config).unwrap();
        assert_eq!(layers.mappings[0].attributes, r#"{"zeta": 1, "alpha": 2}"#);
    }

    #[test]
    fn test_leading_space_address_is_skipped() {
        let config = Config::from_yaml_str(
            "sheet_range: A1:K9\ncolumns: {emails: [2], wfs_layer: 10}\n",
        )
        .unwrap();
        let rows = crate::classify::classify_rows(
            [
                vec!["G", "Potholes", " a@x.org", "", "", "", "", "", "", "", "roads:potholes"],
                vec!["G", "Lights", "l@x.org", "", "", "", "", "", "", "", "lighting:columns"],
            ],
            &config,
        )
        .unwrap();
        let layers = LayerSet::build(&rows, &config).unwrap();
        let layer_names: Vec<_> = layers.mappings.iter().map(|m| m.wfs_layer.as_str()).collect();
        assert_eq!(layer_names, vec!["lighting:columns"]);
    }

    #[test]
    fn test_skip_rules() {
        let rows = vec![
            row("A", Some("a@x.org"), ""),
            row("B", None, "layer:b"),
            row("C", None, ""),
            row("D", Some("d@x.org"), "layer:d"),
            row("E", Some("e@x.org"), "layer:e"),
        ];
        let layers = LayerSet::build(&rows, &config()).unwrap();
        let categories: Vec<_> = layers.mappings.iter().map(|m| m.category.as_str()).collect();
        assert_eq!(categories, vec!["D", "E"]);
    }
}
