//! Output artifacts built from classified rows.

mod categories;
mod json;
mod layers;

pub use categories::{CategoryEntry, CategoryExport};
pub use json::to_spaced_string;
pub use layers::{LayerMapping, LayerSet};
