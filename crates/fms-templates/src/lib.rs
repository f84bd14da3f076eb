//! # fms-templates
//!
//! Some councils publish their site chrome as remote HTML fragments. This
//! crate downloads those fragments, applies small text patches, saves each
//! one, and substitutes them into local `*.html.template` files.
//!
//! ```ignore
//! use fms_templates::{TemplateBuilder, TemplateSet};
//!
//! let builder = TemplateBuilder::new("templates/web/eastsussex", TemplateSet::east_sussex())?;
//! for written in builder.build().await? {
//!     println!("wrote {}", written.display());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod builder;
mod error;
mod fetch;
mod set;

pub use builder::TemplateBuilder;
pub use error::{Error, Result};
pub use fetch::FragmentFetcher;
pub use set::{EAST_SUSSEX_BASE_URL, FragmentSpec, Patch, TemplateSet};
