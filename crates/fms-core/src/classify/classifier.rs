//! Row classification.

use tracing::{debug, warn};

use super::resolver::EmailResolver;
use crate::config::Config;
use crate::error::Result;

/// A categories sheet row reduced to the fields the exporters use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// Group (department) the category is listed under.
    pub group: String,
    /// Category name.
    pub category: String,
    /// Routing address; `None` excludes the row from `categories.json`.
    pub email: Option<String>,
    /// WFS layer name, empty if the category has no asset layer.
    pub wfs_layer: String,
}

/// Error for a row that cannot be classified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// A configured column lies beyond the padded row.
    #[error("column {index} ({field}) is outside the row ({width} cells)")]
    ColumnOutOfRange {
        /// Configuration field naming the column.
        field: &'static str,
        /// Configured zero-based index.
        index: usize,
        /// Width of the padded row.
        width: usize,
    },
}

/// Classifies raw rows using one configuration.
#[derive(Debug, Clone)]
pub struct RowClassifier<'a> {
    config: &'a Config,
    resolver: EmailResolver,
    width: usize,
}

impl<'a> RowClassifier<'a> {
    /// Creates a classifier for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet range or the replacement template is invalid.
    pub fn new(config: &'a Config) -> Result<Self> {
        let width = config.range()?.column_count();
        let resolver = EmailResolver::new(config.email_replacement())?;
        Ok(Self {
            config,
            resolver,
            width,
        })
    }

    /// Number of cells a row is padded to.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Classifies one row.
    ///
    /// The row is padded with empty cells up to the sheet width first.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::ColumnOutOfRange`] if a configured column lies
    /// beyond the padded row.
    pub fn classify<S: AsRef<str>>(
        &self,
        row: &[S],
    ) -> std::result::Result<ParsedRow, RowError> {
        let cells = pad_row(row, self.width);
        let cell = |field: &'static str, index: usize| {
            cells
                .get(index)
                .cloned()
                .ok_or(RowError::ColumnOutOfRange {
                    field,
                    index,
                    width: cells.len(),
                })
        };

        let columns = &self.config.columns;
        let group = cell("group", columns.group)?;
        let category = cell("category", columns.category)?;
        let wfs_layer = cell("wfs_layer", columns.wfs_layer)?;
        let candidates = columns
            .emails
            .iter()
            .map(|&index| cell("emails", index))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let resolution = self.resolver.resolve(&candidates);
        for warning in &resolution.warnings {
            warn!("{group} - {category} {warning}");
        }

        Ok(ParsedRow {
            group,
            category,
            email: resolution.email,
            wfs_layer,
        })
    }

    /// Classifies rows in order, skipping rows that cannot be classified.
    pub fn classify_all<R, S>(&self, rows: impl IntoIterator<Item = R>) -> Vec<ParsedRow>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        rows.into_iter()
            .enumerate()
            .filter_map(|(n, row)| match self.classify(row.as_ref()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    debug!("Skipping row {}: {e}", n + 1);
                    None
                }
            })
            .collect()
    }
}

/// Right-pads a row with empty cells up to `width`.
///
/// Rows already at or beyond `width` are copied unchanged.
#[must_use]
pub fn pad_row<S: AsRef<str>>(row: &[S], width: usize) -> Vec<String> {
    let mut cells: Vec<String> = row.iter().map(|c| c.as_ref().to_string()).collect();
    if cells.len() < width {
        cells.resize(width, String::new());
    }
    cells
}

/// Classifies a single row against a configuration.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the row is malformed.
pub fn classify<S: AsRef<str>>(row: &[S], config: &Config) -> Result<ParsedRow> {
    Ok(RowClassifier::new(config)?.classify(row)?)
}

/// Classifies rows in order, skipping malformed ones.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn classify_rows<R, S>(
    rows: impl IntoIterator<Item = R>,
    config: &Config,
) -> Result<Vec<ParsedRow>>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    Ok(RowClassifier::new(config)?.classify_all(rows))
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

    fn config(yaml: &str) -> Config {
        Config::from_yaml_str(yaml).unwrap()
    }

    fn narrow() -> Config {
        config(
            "sheet_range: A1:K999\n\
             columns: {group: 0, category: 1, emails: [2, 4, 9], wfs_layer: 10}\n",
        )
    }

    #[test]
    fn test_end_to_end_row() {
        let row = [
            "GroupA", "Potholes", "", "", "a@x.org", "", "", "", "", "", "LayerX",
        ];
        let parsed = classify(&row, &narrow()).unwrap();
        assert_eq!(
            parsed,
            ParsedRow {
                group: "GroupA".to_string(),
                category: "Potholes".to_string(),
                email: Some("a@x.org".to_string()),
                wfs_layer: "LayerX".to_string(),
            }
        );
    }

    #[test]
    fn test_short_row_is_padded() {
        let cfg = config("sheet_range: A1:P999\n");
        let classifier = RowClassifier::new(&cfg).unwrap();
        assert_eq!(classifier.width(), 16);

        let parsed = classifier
            .classify(&["Parks", "Litter bins", "", "parks@x.org"])
            .unwrap();
        assert_eq!(parsed.email.as_deref(), Some("parks@x.org"));
        assert_eq!(parsed.wfs_layer, "");
    }

    #[test]
    fn test_column_beyond_width() {
        let cfg = config("sheet_range: A1:D9\ncolumns: {group: 7, emails: [3]}\n");
        let err = RowClassifier::new(&cfg)
            .unwrap()
            .classify(&["a", "b", "c", "d@x.org"])
            .unwrap_err();
        assert_eq!(
            err,
            RowError::ColumnOutOfRange {
                field: "group",
                index: 7,
                width: 4
            }
        );
    }

    #[test]
    fn test_classify_all_skips_malformed_rows() {
        let cfg = config("sheet_range: A1:D9\ncolumns: {wfs_layer: 3, emails: [2, 5]}\n");
        let rows = vec![
            vec!["G", "C1", "c1@x.org"],
            vec!["G", "C2", "c2@x.org", "L", "", "alt@x.org"],
        ];
        let parsed = RowClassifier::new(&cfg).unwrap().classify_all(&rows);
        // The first row only reaches column 3 after padding.
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].category, "C2");
        assert_eq!(parsed[0].email.as_deref(), Some("c2@x.org"));
    }

    #[test]
    fn test_alloy_row() {
        let row = ["G", "Flytipping", "Alloy", "", "a@x.org"];
        let parsed = classify(&row, &narrow()).unwrap();
        assert_eq!(parsed.email, None);
    }

    #[test]
    fn test_replacement_from_config() {
        let cfg = config(
            "sheet_range: A1:K9\nemail_replacement: \"fwd+{email}@example.org\"\ncolumns: {emails: [2], wfs_layer: 10}\n",
        );
        let parsed = classify(&["G", "C", "a.b@x.org"], &cfg).unwrap();
        assert_eq!(parsed.email.as_deref(), Some("fwd+a_b_x_org@example.org"));
    }

    #[test]
    fn test_pad_row() {
        assert_eq!(pad_row(&["a"], 3), vec!["a", "", ""]);
        assert_eq!(pad_row(&["a", "b", "c", "d"], 2), vec!["a", "b", "c", "d"]);
        assert_eq!(pad_row::<&str>(&[], 2), vec!["", ""]);
    }
}
