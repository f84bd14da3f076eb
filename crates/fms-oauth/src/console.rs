//! Completing the authorization code flow on a terminal.
//!
//! The user opens the printed URL, grants access, and pastes back either the
//! code shown by Google or the whole URL the browser was redirected to.

use crate::error::{Error, Result};
use crate::flow::AuthorizationCodeFlow;
use crate::token::Token;
use std::io::{BufRead, Write};
use tracing::info;
use url::Url;

/// What the user pasted at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeResponse {
    /// Authorization code.
    pub code: String,
    /// `state` carried by a pasted redirect URL.
    pub state: Option<String>,
}

impl CodeResponse {
    /// Interprets a pasted line as a redirect URL or a bare code.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is empty, or if it is a redirect URL
    /// carrying an `error` parameter or no `code`.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Err(Error::MissingCode);
        }

        let Ok(url) = Url::parse(line) else {
            return Ok(Self {
                code: line.to_string(),
                state: None,
            });
        };
        if !matches!(url.scheme(), "http" | "https") {
            return Ok(Self {
                code: line.to_string(),
                state: None,
            });
        }

        let mut code = None;
        let mut state = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                "error" => {
                    return Err(Error::oauth_error(
                        value.into_owned(),
                        "authorization was not granted",
                    ));
                }
                _ => {}
            }
        }

        code.filter(|c| !c.is_empty())
            .map(|code| Self { code, state })
            .ok_or(Error::MissingCode)
    }
}

/// Prints the authorization URL, reads the user's response and exchanges it
/// for a token.
///
/// # Errors
///
/// Returns an error if the console cannot be used, the response is unusable
/// or the token exchange fails.
pub async fn authorize<R: BufRead, W: Write>(
    flow: &AuthorizationCodeFlow,
    mut input: R,
    mut output: W,
) -> Result<Token> {
    let url = flow.authorization_url(None)?;
    writeln!(
        output,
        "Please visit this URL to authorize this application: {url}"
    )?;
    write!(output, "Enter the authorization code: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let response = CodeResponse::parse(&line)?;
    if response.state.is_some() {
        flow.verify_state(response.state.as_deref())?;
    }

    let token = flow.exchange_code(&response.code).await?;
    info!("Authorization granted");
    Ok(token)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_code() {
        let response = CodeResponse::parse("  4/0AX4XfWh  \n").unwrap();
        assert_eq!(response.code, "4/0AX4XfWh");
        assert!(response.state.is_none());
    }

    #[test]
    fn test_redirect_url() {
        let response =
            CodeResponse::parse("http://localhost/?state=xyz&code=4%2F0AX&scope=sheets").unwrap();
        assert_eq!(response.code, "4/0AX");
        assert_eq!(response.state.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_denied_redirect() {
        let err = CodeResponse::parse("http://localhost/?error=access_denied").unwrap_err();
        assert!(matches!(err, Error::OAuth { ref error, .. } if error == "access_denied"));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(CodeResponse::parse("\n"), Err(Error::MissingCode)));
        assert!(matches!(
            CodeResponse::parse("http://localhost/?state=xyz"),
            Err(Error::MissingCode)
        ));
    }
}
