//! # fms-oauth
//!
//! `OAuth2` authorization for the Google APIs the `FixMyStreet` tools read
//! from (currently the Sheets API).
//!
//! ## Features
//!
//! - **Client secrets**: reads the `credentials.json` downloaded from the
//!   Google Cloud console (`installed` or `web` application)
//! - **Authorization Code Flow** with PKCE, completed on the console: the
//!   user opens a URL and pastes back the code
//! - **Token management**: expiry checking, refresh, JSON token file
//!
//! ## Quick Start
//!
//! ```ignore
//! use fms_oauth::{ClientSecrets, TokenStore, SHEETS_READONLY_SCOPE, obtain_token};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let secrets = ClientSecrets::from_file("credentials.json")?;
//!     let client = secrets.client(&[SHEETS_READONLY_SCOPE])?;
//!     let store = TokenStore::new("token.json");
//!
//!     // Uses the stored token, refreshes it, or asks on the console.
//!     let stdin = std::io::stdin();
//!     let token = obtain_token(&client, &store, stdin.lock(), std::io::stderr()).await?;
//!
//!     println!("Authorization: {}", token.authorization_header());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod console;
mod error;
pub mod flow;
mod installed;
pub mod provider;
pub mod secrets;
pub mod token;

pub use error::{Error, Result};
pub use flow::{AuthorizationCodeFlow, OAuthClient, PkceChallenge};
pub use installed::obtain_token;
pub use provider::{Provider, SHEETS_READONLY_SCOPE};
pub use secrets::ClientSecrets;
pub use token::{Token, TokenStore};
