//! # fms-sheets
//!
//! Reads cell values from Google Sheets (API v4) as rows of strings.
//!
//! ```ignore
//! use fms_sheets::SheetsClient;
//!
//! let client = SheetsClient::new(token.access_token.clone());
//! let rows = client.values("1AbCdEf", "Sheet1!A2:P").await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod values;

pub use client::{DEFAULT_BASE_URL, SheetsClient};
pub use error::{Error, Result};
pub use values::{ValueRange, load_rows};
