//! Subcommand implementations.

pub mod sheet;
pub mod socrata;
pub mod templates;
