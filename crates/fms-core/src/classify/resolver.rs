//! Email routing resolution.

use std::fmt;

use crate::template::{Template, TemplateError};

/// Cell value marking a category as handled by the Alloy asset system.
pub const ALLOY_SENTINEL: &str = "Alloy";

/// Non-fatal condition noticed while resolving an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    /// Several candidate columns hold an address; the first one was used.
    MultipleAddresses {
        /// Number of columns containing `@`.
        count: usize,
    },
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleAddresses { count } => {
                write!(f, "has {count} addresses; using the first one")
            }
        }
    }
}

/// Outcome of resolving a row's email candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Routing address, or `None` if the row is excluded from email routing.
    pub email: Option<String>,
    /// Warnings raised along the way.
    pub warnings: Vec<ResolveWarning>,
}

/// Picks a routing address out of a row's email candidate cells.
#[derive(Debug, Clone, Default)]
pub struct EmailResolver {
    replacement: Option<Template>,
}

impl EmailResolver {
    /// Creates a resolver with an optional forwarding alias template.
    ///
    /// An empty template counts as none.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is malformed or uses a placeholder
    /// other than `{email}`.
    pub fn new(replacement: Option<&str>) -> Result<Self, TemplateError> {
        let replacement = match replacement.filter(|t| !t.is_empty()) {
            Some(source) => {
                let template = Template::parse(source)?;
                if let Some(other) = template.placeholders().find(|&name| name != "email") {
                    return Err(TemplateError::UnknownPlaceholder(other.to_string()));
                }
                Some(template)
            }
            None => None,
        };
        Ok(Self { replacement })
    }

    /// Resolves candidate cells, given in column priority order.
    ///
    /// - Any cell equal to [`ALLOY_SENTINEL`] excludes the row.
    /// - Cells without `@` are ignored; if none remain the row is excluded.
    /// - With several addresses the first wins and a warning is recorded.
    /// - Only the first of several space-separated addresses in one cell is
    ///   used (residential/commercial split categories).
    /// - A configured replacement template turns the address into an alias.
    /// - Without a template, an empty first token (leading space) excludes the row.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, candidates: &[S]) -> Resolution {
        if candidates.iter().any(|c| c.as_ref() == ALLOY_SENTINEL) {
            return Resolution::default();
        }

        let emails: Vec<&str> = candidates
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| c.contains('@'))
            .collect();
        let Some(&first) = emails.first() else {
            return Resolution::default();
        };

        let mut warnings = Vec::new();
        if emails.len() > 1 {
            warnings.push(ResolveWarning::MultipleAddresses {
                count: emails.len(),
            });
        }

        let email = first.split_once(' ').map_or(first, |(head, _)| head);
        let email = match &self.replacement {
            Some(template) => {
                let alias = obfuscate(email);
                template.fill(|_| alias.as_str())
            }
            None if email.is_empty() => return Resolution { email: None, warnings },
            None => email.to_string(),
        };

        Resolution {
            email: Some(email),
            warnings,
        }
    }
}

/// Replaces every `.` and `@` with `_`.
#[must_use]
pub fn obfuscate(email: &str) -> String {
    email.replace(['.', '@'], "_")
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

    fn plain() -> EmailResolver {
        EmailResolver::new(None).unwrap()
    }

    #[test]
    fn test_alloy_excludes_row() {
        let resolution = plain().resolve(&["Alloy", "a@x.org", ""]);
        assert_eq!(resolution, Resolution::default());

        let resolution = plain().resolve(&["a@x.org", "", "Alloy"]);
        assert_eq!(resolution.email, None);
    }

    #[test]
    fn test_no_address() {
        let resolution = plain().resolve(&["", "TBC", "awaiting contact"]);
        assert_eq!(resolution.email, None);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_first_address_wins() {
        let resolution = plain().resolve(&["a@x.org", "", "b@y.org"]);
        assert_eq!(resolution.email.as_deref(), Some("a@x.org"));
        assert_eq!(
            resolution.warnings,
            vec![ResolveWarning::MultipleAddresses { count: 2 }]
        );
    }

    #[test]
    fn test_space_separated_cell() {
        let resolution = plain().resolve(&["", "res@x.org com@x.org", ""]);
        assert_eq!(resolution.email.as_deref(), Some("res@x.org"));
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_leading_space_yields_no_address() {
        let resolution = plain().resolve(&[" a@x.org", ""]);
        assert_eq!(resolution.email, None);
    }

    #[test]
    fn test_replacement_template() {
        let resolver = EmailResolver::new(Some("forward+{email}@example.org")).unwrap();
        let resolution = resolver.resolve(&["a.b@x.org"]);
        assert_eq!(
            resolution.email.as_deref(),
            Some("forward+a_b_x_org@example.org")
        );
    }

    #[test]
    fn test_replacement_applies_after_split() {
        let resolver = EmailResolver::new(Some("{email}@relay.test")).unwrap();
        let resolution = resolver.resolve(&["res@x.org com@x.org"]);
        assert_eq!(resolution.email.as_deref(), Some("res_x_org@relay.test"));
    }

    #[test]
    fn test_empty_replacement_is_ignored() {
        let resolver = EmailResolver::new(Some("")).unwrap();
        assert_eq!(
            resolver.resolve(&["a.b@x.org"]).email.as_deref(),
            Some("a.b@x.org")
        );
    }

    #[test]
    fn test_bad_replacement_rejected() {
        assert!(EmailResolver::new(Some("{user}@x.org")).is_err());
        assert!(EmailResolver::new(Some("{email")).is_err());
    }

    #[test]
    fn test_obfuscate() {
        assert_eq!(obfuscate("first.last@council.gov.uk"), "first_last_council_gov_uk");
    }

    #[test]
    fn test_warning_message() {
        let warning = ResolveWarning::MultipleAddresses { count: 3 };
        assert_eq!(warning.to_string(), "has 3 addresses; using the first one");
    }
}
