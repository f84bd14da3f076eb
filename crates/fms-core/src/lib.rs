//! # fms-core
//!
//! Category sheet processing for `FixMyStreet` cobrands.
//!
//! This crate provides:
//! - Configuration loading and validation (`config.yml`)
//! - Sheet range parsing (column count from an A1 range)
//! - Row classification into typed [`ParsedRow`] records
//! - Email routing resolution ("Alloy" sentinel, multi-address cells,
//!   forwarding aliases)
//! - `categories.json` export (grouped, key-sorted)
//! - `layers.js` export (WFS layer to category mapping)
//! - Brace placeholder templates shared with the other tools
//!
//! ## Example
//!
//! ```
//! use fms_core::{CategoryExport, Config, classify_rows};
//!
//! let config = Config::from_yaml_str(
//!     "sheet_range: A1:K99\n\
//!      disabled_message: Reporting is paused\n\
//!      columns: {group: 0, category: 1, emails: [2, 4, 9], wfs_layer: 10}\n",
//! )?;
//! let rows = vec![vec!["Roads", "Potholes", "", "", "roads@example.org"]];
//! let parsed = classify_rows(&rows, &config)?;
//! let export = CategoryExport::build(&parsed, &config)?;
//! assert_eq!(export.groups["Roads"][0].email, "roads@example.org");
//! # Ok::<(), fms_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod config;
mod error;
pub mod export;
pub mod template;

pub use classify::{
    ALLOY_SENTINEL, EmailResolver, ParsedRow, Resolution, ResolveWarning, RowClassifier, RowError,
    classify, classify_rows, pad_row,
};
pub use config::{
    CategoryConfig, Columns, Config, SheetRange, ValidationError, ValidationResult,
    validate_config,
};
pub use error::{Error, Result};
pub use export::{CategoryEntry, CategoryExport, LayerMapping, LayerSet};
pub use template::{Template, TemplateError};
