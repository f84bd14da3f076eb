//! Value ranges as returned by `spreadsheets.values.get`.

use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// A block of cells.
///
/// Google omits `values` entirely for an empty range, and trims trailing
/// empty cells from each row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    /// The A1 range the values cover.
    #[serde(default)]
    pub range: Option<String>,
    /// `ROWS` or `COLUMNS`.
    #[serde(default)]
    pub major_dimension: Option<String>,
    /// Cell values, row by row.
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// The cells as text. Numbers and booleans use their JSON spelling;
    /// `null` becomes an empty string.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RowsDocument {
    Range(ValueRange),
    Rows(Vec<Vec<Value>>),
}

/// Reads rows saved to disk, either as a `values.get` response or as a bare
/// array of rows.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is neither shape.
pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let contents = std::fs::read_to_string(path)?;
    let range = match serde_json::from_str(&contents)? {
        RowsDocument::Range(range) => range,
        RowsDocument::Rows(values) => ValueRange {
            values,
            ..ValueRange::default()
        },
    };
    Ok(range.into_rows())
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

    #[test]
    fn test_mixed_cells_become_text() {
        let range: ValueRange = serde_json::from_str(
            r#"{"range": "Sheet1!A1:D2", "majorDimension": "ROWS",
                "values": [["Roads", 12, true, null], ["Lighting"]]}"#,
        )
        .unwrap();

        assert_eq!(range.range.as_deref(), Some("Sheet1!A1:D2"));
        assert_eq!(
            range.into_rows(),
            vec![
                vec!["Roads", "12", "true", ""],
                vec!["Lighting"],
            ]
        );
    }

    #[test]
    fn test_missing_values_is_empty() {
        let range: ValueRange =
            serde_json::from_str(r#"{"range": "Sheet1!A1:D2", "majorDimension": "ROWS"}"#)
                .unwrap();
        assert!(range.into_rows().is_empty());
    }

    #[test]
    fn test_load_rows_accepts_both_shapes() {
        let dir = tempfile::tempdir().unwrap();

        let bare = dir.path().join("bare.json");
        std::fs::write(&bare, r#"[["Roads", "Potholes"]]"#).unwrap();
        assert_eq!(load_rows(&bare).unwrap(), vec![vec!["Roads", "Potholes"]]);

        let response = dir.path().join("response.json");
        std::fs::write(&response, r#"{"values": [["Roads", "Potholes"]]}"#).unwrap();
        assert_eq!(load_rows(&response).unwrap(), vec![vec!["Roads", "Potholes"]]);
    }

    #[test]
    fn test_load_rows_rejects_other_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, "42").unwrap();
        assert!(matches!(load_rows(&path), Err(crate::Error::Json(_))));
    }
}
