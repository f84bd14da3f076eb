//! Configuration module.
//!
//! Provides the run configuration, sheet range parsing and validation.

mod model;
mod range;
mod validation;

pub use model::{CategoryConfig, Columns, Config, DISABLED_MESSAGE_ENV};
pub use range::{MAX_COLUMNS, SheetRange};
pub use validation::{ValidationError, ValidationResult, validate_config};
