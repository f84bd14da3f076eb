//! Error types for the template builder.

use fms_core::TemplateError;
use std::path::PathBuf;

/// Result type alias for template building.
pub type Result<T> = std::result::Result<T, Error>;

/// Template builder errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error on a template or output file.
    #[error("{path}: {source}")]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Fragment download failed.
    #[error("Fetching fragment {fragment}: {source}")]
    Fetch {
        /// Fragment name.
        fragment: String,
        /// Underlying error.
        source: reqwest::Error,
    },

    /// Template set YAML error.
    #[error("Template set error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A template file or the fragment URL pattern is malformed, or refers
    /// to a fragment that was not fetched.
    #[error("{name}: {source}")]
    Template {
        /// Template file name or `base_url`.
        name: String,
        /// Underlying error.
        source: TemplateError,
    },

    /// Invalid template set.
    #[error("Invalid template set: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
