//! Error types for the Socrata export.

/// Result type alias for Socrata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Socrata export errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration YAML error.
    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The SODA API answered with an error status.
    #[error("Socrata API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the raw body.
        message: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
