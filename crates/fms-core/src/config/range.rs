//! A1 sheet range parsing.

use crate::error::{Error, Result};

/// Highest column a Google sheet can have (`ZZZ`).
pub const MAX_COLUMNS: usize = 18_278;

/// A spreadsheet range such as `A1:P999` or `Categories!A2:P`.
///
/// Only the last column matters to the classifier: it fixes how many cells a
/// full row has, since the Sheets API drops trailing empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetRange {
    last_column: usize,
}

impl SheetRange {
    /// Parses a range, ignoring any sheet-name prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if the end reference has no column
    /// letters or lies beyond column `ZZZ`.
    pub fn parse(range: &str) -> Result<Self> {
        let cells = range.rsplit_once('!').map_or(range, |(_, cells)| cells);
        let end = cells.rsplit_once(':').map_or(cells, |(_, end)| end).trim();

        let letters: String = end.chars().take_while(char::is_ascii_alphabetic).collect();
        if letters.is_empty() {
            return Err(Error::InvalidRange(range.to_string()));
        }

        let last_column = column_number(&letters)
            .filter(|&n| n <= MAX_COLUMNS)
            .ok_or_else(|| Error::InvalidRange(range.to_string()))?;
        Ok(Self { last_column })
    }

    /// One-based number of the last column (`P` is 16).
    #[must_use]
    pub const fn last_column(&self) -> usize {
        self.last_column
    }

    /// Number of cells in a full row.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.last_column
    }

    /// Zero-based index of the last column (`P` is 15).
    #[must_use]
    pub const fn last_column_index(&self) -> usize {
        self.last_column - 1
    }
}

/// Converts column letters to a one-based column number (`A` = 1, `AA` = 27).
fn column_number(letters: &str) -> Option<usize> {
    letters.bytes().try_fold(0usize, |acc, b| {
        let digit = usize::from(b.to_ascii_uppercase() - b'A') + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
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
    fn test_single_letter_column() {
        let range = SheetRange::parse("A1:P999").unwrap();
        assert_eq!(range.last_column(), 16);
        assert_eq!(range.last_column_index(), 15);
        assert_eq!(range.column_count(), 16);
    }

    #[test]
    fn test_multi_letter_column() {
        assert_eq!(SheetRange::parse("A1:Z9").unwrap().last_column(), 26);
        assert_eq!(SheetRange::parse("A1:AA9").unwrap().last_column(), 27);
        assert_eq!(SheetRange::parse("A1:AZ9").unwrap().last_column(), 52);
    }

    #[test]
    fn test_sheet_prefix_and_open_rows() {
        assert_eq!(
            SheetRange::parse("Master list!A2:K").unwrap().last_column(),
            11
        );
        assert_eq!(SheetRange::parse("a1:p999").unwrap().last_column(), 16);
    }

    #[test]
    fn test_single_cell() {
        assert_eq!(SheetRange::parse("C7").unwrap().last_column(), 3);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(SheetRange::parse("").is_err());
        assert!(SheetRange::parse("A1:99").is_err());
        assert!(SheetRange::parse("Sheet1!").is_err());
    }

    #[test]
    fn test_column_limit() {
        assert_eq!(SheetRange::parse("A1:ZZZ9").unwrap().last_column(), MAX_COLUMNS);
        assert!(SheetRange::parse("A1:AAAA9").is_err());
        assert!(SheetRange::parse("A1:ZZZZZZ").is_err());
    }
}
