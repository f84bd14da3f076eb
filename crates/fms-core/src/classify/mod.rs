//! Row classification and email routing resolution.

mod classifier;
mod resolver;

pub use classifier::{ParsedRow, RowClassifier, RowError, classify, classify_rows, pad_row};
pub use resolver::{ALLOY_SENTINEL, EmailResolver, Resolution, ResolveWarning, obfuscate};
