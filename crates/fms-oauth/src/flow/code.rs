//! Authorization Code Flow for installed applications.

use super::pkce::random_string;
use super::{OAuthClient, PkceChallenge};
use crate::error::{Error, Result};
use crate::token::Token;
use url::Url;

/// Authorization Code Flow for `OAuth2`.
///
/// The user opens [`authorization_url`](Self::authorization_url) in a browser,
/// consents, and the code from the redirect is passed to
/// [`exchange_code`](Self::exchange_code).
#[derive(Debug)]
pub struct AuthorizationCodeFlow {
    client: OAuthClient,
    pkce: Option<PkceChallenge>,
    state: Option<String>,
}

impl AuthorizationCodeFlow {
    /// Creates a new authorization code flow.
    #[must_use]
    pub const fn new(client: OAuthClient) -> Self {
        Self {
            client,
            pkce: None,
            state: None,
        }
    }

    /// Sends a PKCE challenge with the request and its verifier with the exchange.
    #[must_use]
    pub fn with_pkce(mut self) -> Self {
        self.pkce = Some(PkceChallenge::generate());
        self
    }

    /// Sends a random `state` value that the redirect must echo back.
    #[must_use]
    pub fn with_state(mut self) -> Self {
        self.state = Some(random_string(24));
        self
    }

    /// The `state` value sent with the request, if any.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Returns the PKCE verifier if PKCE is enabled.
    #[must_use]
    pub fn pkce_verifier(&self) -> Option<&str> {
        self.pkce.as_ref().map(PkceChallenge::verifier)
    }

    /// Builds the URL the user opens to grant access.
    ///
    /// `scopes` overrides the provider's default scopes.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider configuration is invalid.
    pub fn authorization_url(&self, scopes: Option<&[String]>) -> Result<Url> {
        self.client.provider.validate()?;
        let mut url = self.client.provider.auth_url.clone();

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("client_id", &self.client.client_id)
                .append_pair("response_type", "code");

            if let Some(redirect_uri) = &self.client.redirect_uri {
                pairs.append_pair("redirect_uri", redirect_uri);
            }

            let scope = scopes.map_or_else(
                || self.client.provider.default_scopes.join(" "),
                |s| s.join(" "),
            );
            if !scope.is_empty() {
                pairs.append_pair("scope", &scope);
            }

            if let Some(state) = &self.state {
                pairs.append_pair("state", state);
            }

            if let Some(pkce) = &self.pkce {
                pairs
                    .append_pair("code_challenge", pkce.challenge())
                    .append_pair("code_challenge_method", pkce.method());
            }

            // Needed for Google to hand out a refresh token every time.
            if self.client.provider.is_google() {
                pairs
                    .append_pair("access_type", "offline")
                    .append_pair("prompt", "consent");
            }
        }

        Ok(url)
    }

    /// Checks the `state` echoed back by the redirect.
    ///
    /// # Errors
    ///
    /// Returns an error if a state was sent and `returned` does not match it.
    pub fn verify_state(&self, returned: Option<&str>) -> Result<()> {
        match (&self.state, returned) {
            (None, _) => Ok(()),
            (Some(sent), Some(got)) if sent == got => Ok(()),
            (Some(_), _) => Err(Error::oauth_error(
                "state_mismatch",
                "the redirect did not carry the state value that was sent",
            )),
        }
    }

    /// Exchanges the authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        self.client
            .exchange_code(code, self.pkce_verifier())
            .await
    }
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
    use crate::provider::Provider;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn google_client() -> OAuthClient {
        OAuthClient::new("test_client", Provider::google().unwrap())
            .with_redirect_uri("http://localhost")
    }

    #[test]
    fn test_authorization_url() {
        let flow = AuthorizationCodeFlow::new(google_client()).with_state();
        let url = flow.authorization_url(None).unwrap();
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |key: &str| {
            query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("client_id"), Some("test_client"));
        assert_eq!(get("response_type"), Some("code"));
        assert_eq!(get("redirect_uri"), Some("http://localhost"));
        assert_eq!(get("scope"), Some(crate::SHEETS_READONLY_SCOPE));
        assert_eq!(get("state"), flow.state());
        assert_eq!(get("access_type"), Some("offline"));
        assert_eq!(get("prompt"), Some("consent"));
    }

    #[test]
    fn test_authorization_url_with_pkce() {
        let flow = AuthorizationCodeFlow::new(google_client()).with_pkce();
        let url = flow.authorization_url(None).unwrap();

        assert!(url.as_str().contains("code_challenge="));
        assert!(url.as_str().contains("code_challenge_method=S256"));
        assert!(flow.pkce_verifier().is_some());
    }

    #[test]
    fn test_authorization_url_custom_scopes() {
        let flow = AuthorizationCodeFlow::new(google_client());
        let scopes = vec!["email".to_string(), "profile".to_string()];
        let url = flow.authorization_url(Some(&scopes)).unwrap();

        assert!(url.as_str().contains("scope=email+profile"));
    }

    #[test]
    fn test_non_google_provider_has_no_consent_params() {
        let provider = Provider::new("Other", "https://a.example/auth", "https://a.example/token")
            .unwrap();
        let flow = AuthorizationCodeFlow::new(OAuthClient::new("id", provider));
        let url = flow.authorization_url(None).unwrap();

        assert!(!url.as_str().contains("access_type"));
        assert!(!url.as_str().contains("prompt"));
    }

    #[test]
    fn test_verify_state() {
        let flow = AuthorizationCodeFlow::new(google_client()).with_state();
        let sent = flow.state().unwrap().to_string();

        flow.verify_state(Some(&sent)).unwrap();
        assert!(flow.verify_state(Some("forged")).is_err());
        assert!(flow.verify_state(None).is_err());

        let stateless = AuthorizationCodeFlow::new(google_client());
        stateless.verify_state(None).unwrap();
    }

    #[tokio::test]
    async fn test_exchange_sends_verifier() {
        let server = MockServer::start().await;
        let provider = Provider::new(
            "Test",
            format!("{}/auth", server.uri()),
            format!("{}/token", server.uri()),
        )
        .unwrap();
        let flow = AuthorizationCodeFlow::new(
            OAuthClient::new("id", provider).with_redirect_uri("http://localhost"),
        )
        .with_pkce();

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=4%2Fabc"))
            .and(body_string_contains(format!(
                "code_verifier={}",
                flow.pkce_verifier().unwrap()
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.token",
                "token_type": "Bearer",
                "expires_in": 3599,
                "refresh_token": "1//refresh"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = flow.exchange_code("4/abc").await.unwrap();
        assert_eq!(token.access_token, "ya29.token");
        assert_eq!(token.refresh_token.as_deref(), Some("1//refresh"));
    }
}
