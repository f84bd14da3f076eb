//! Token acquisition for installed applications.

use crate::console;
use crate::error::Result;
use crate::flow::{AuthorizationCodeFlow, OAuthClient};
use crate::token::{Token, TokenStore};
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Returns a usable access token, asking the user only when necessary.
///
/// A valid stored token is used as is. An expired one is refreshed when it
/// carries a refresh token; otherwise, or if the refresh grant has been
/// revoked, the console flow runs. Any new token is written back to `store`.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written, the refresh fails
/// for a reason other than a revoked grant, or the console flow fails.
pub async fn obtain_token<R: BufRead, W: Write>(
    client: &OAuthClient,
    store: &TokenStore,
    input: R,
    output: W,
) -> Result<Token> {
    let stored = store.load()?;

    if let Some(token) = stored.as_ref().filter(|t| t.is_valid()) {
        return Ok(token.clone());
    }

    let refreshed = match stored {
        Some(token) if token.can_refresh() => {
            info!("Refreshing expired token from {}", store.path().display());
            match client.refresh_token(&token).await {
                Ok(token) => Some(token),
                Err(e) if e.is_invalid_grant() => {
                    warn!("Stored refresh token was rejected, authorizing again: {e}");
                    None
                }
                Err(e) => return Err(e),
            }
        }
        _ => None,
    };

    let token = match refreshed {
        Some(token) => token,
        None => {
            let flow = AuthorizationCodeFlow::new(client.clone())
                .with_pkce()
                .with_state();
            console::authorize(&flow, input, output).await?
        }
    };

    store.save(&token)?;
    Ok(token)
}
