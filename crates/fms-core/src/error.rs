//! Error types for the core library.

use thiserror::Error;

use crate::classify::RowError;
use crate::config::ValidationError;
use crate::template::TemplateError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// YAML configuration could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sheet range could not be parsed.
    #[error("Invalid sheet range: {0}")]
    InvalidRange(String),

    /// Placeholder template error.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Row could not be classified.
    #[error("Malformed row: {0}")]
    Row(#[from] RowError),

    /// Configuration failed validation.
    #[error("Invalid configuration: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
