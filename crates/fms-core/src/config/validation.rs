//! Configuration validation.

use super::model::Config;
use super::range::SheetRange;
use crate::template::Template;

/// Validation error for a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `sheet_range` is empty.
    EmptySheetRange,
    /// `sheet_range` has no column letters in its end reference, or ends past `ZZZ`.
    InvalidSheetRange,
    /// `columns.emails` lists no columns.
    NoEmailColumns,
    /// `email_replacement` is not a valid template.
    InvalidEmailReplacement,
    /// `email_replacement` uses a placeholder other than `{email}`.
    UnknownReplacementPlaceholder,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptySheetRange => "sheet_range is required",
            Self::InvalidSheetRange => {
                "sheet_range must end in a column reference up to ZZZ, e.g. A1:P999"
            }
            Self::NoEmailColumns => "columns.emails must list at least one column",
            Self::InvalidEmailReplacement => "email_replacement has unbalanced braces",
            Self::UnknownReplacementPlaceholder => {
                "email_replacement may only use the {email} placeholder"
            }
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptySheetRange | Self::InvalidSheetRange => "sheet_range",
            Self::NoEmailColumns => "columns.emails",
            Self::InvalidEmailReplacement | Self::UnknownReplacementPlaceholder => {
                "email_replacement"
            }
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating a configuration.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate a configuration.
///
/// Returns `Ok(())` if valid, or `Err(Vec<ValidationError>)` with all errors.
/// Column indices are not checked against the range: rows that cannot reach
/// a column are skipped one by one during classification.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if any fields are invalid.
pub fn validate_config(config: &Config) -> ValidationResult {
    let mut errors = Vec::new();

    // Range validation
    if config.sheet_range.trim().is_empty() {
        errors.push(ValidationError::EmptySheetRange);
    } else if SheetRange::parse(&config.sheet_range).is_err() {
        errors.push(ValidationError::InvalidSheetRange);
    }

    // Column validation
    if config.columns.emails.is_empty() {
        errors.push(ValidationError::NoEmailColumns);
    }

    // Replacement validation
    if let Some(replacement) = config.email_replacement() {
        match Template::parse(replacement) {
            Ok(template) => {
                if template.placeholders().any(|name| name != "email") {
                    errors.push(ValidationError::UnknownReplacementPlaceholder);
                }
            }
            Err(_) => errors.push(ValidationError::InvalidEmailReplacement),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
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
    use crate::config::Columns;
    use std::collections::BTreeMap;

    fn config(sheet_range: &str, email_replacement: Option<&str>) -> Config {
        Config {
            doc_id: String::new(),
            sheet_range: sheet_range.to_string(),
            columns: Columns::default(),
            email_replacement: email_replacement.map(ToString::to_string),
            categories: BTreeMap::new(),
            disabled_message: None,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&config("A1:P999", None)).is_ok());
        assert!(validate_config(&config("A1:P999", Some("fwd+{email}@x.org"))).is_ok());
        assert!(validate_config(&config("A1:P999", Some("{{literal}} {email}"))).is_ok());
    }

    #[test]
    fn test_range_errors() {
        let errors = validate_config(&config("  ", None)).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptySheetRange]);

        let errors = validate_config(&config("1:999", None)).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidSheetRange]);
        assert_eq!(errors[0].field(), "sheet_range");

        let errors = validate_config(&config("A1:ZZZZZZ", None)).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidSheetRange]);
        assert!(validate_config(&config("A1:ZZZ", None)).is_ok());
    }

    #[test]
    fn test_replacement_errors() {
        let errors = validate_config(&config("A1:P9", Some("fwd+{email@x.org"))).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidEmailReplacement]);

        let errors = validate_config(&config("A1:P9", Some("{user}@x.org"))).unwrap_err();
        assert_eq!(errors, vec![ValidationError::UnknownReplacementPlaceholder]);
    }

    #[test]
    fn test_no_email_columns() {
        let mut cfg = config("A1:P9", None);
        cfg.columns.emails.clear();
        let errors = validate_config(&cfg).unwrap_err();
        assert!(errors.contains(&ValidationError::NoEmailColumns));
    }
}
