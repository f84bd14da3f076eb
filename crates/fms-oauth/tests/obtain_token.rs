//! Token acquisition against a mock token endpoint.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, Utc};
use fms_oauth::{OAuthClient, Provider, Token, TokenStore, obtain_token};
use std::io::Cursor;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OAuthClient {
    let provider = Provider::new(
        "Google",
        format!("{}/o/oauth2/auth", server.uri()),
        format!("{}/token", server.uri()),
    )
    .unwrap()
    .with_default_scopes(&[fms_oauth::SHEETS_READONLY_SCOPE]);
    OAuthClient::new("client-id", provider)
        .with_client_secret("client-secret")
        .with_redirect_uri("http://localhost")
}

fn token_reply(access: &str, refresh: Option<&str>) -> ResponseTemplate {
    let mut body = serde_json::json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": 3599,
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = refresh.into();
    }
    ResponseTemplate::new(200).set_body_json(body)
}

#[tokio::test]
async fn valid_stored_token_is_used_without_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));
    let stored = Token::new("still-good", "Bearer")
        .with_expires_at(Utc::now() + Duration::hours(1));
    store.save(&stored).unwrap();

    let mut prompt = Vec::new();
    let token = obtain_token(&client_for(&server), &store, Cursor::new(""), &mut prompt)
        .await
        .unwrap();

    assert_eq!(token.access_token, "still-good");
    assert!(prompt.is_empty());
}

#[tokio::test]
async fn expired_token_is_refreshed_and_saved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(token_reply("refreshed", None))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));
    store
        .save(
            &Token::new("old", "Bearer")
                .with_refresh_token("1//keep")
                .with_expires_at(Utc::now() - Duration::hours(1)),
        )
        .unwrap();

    let token = obtain_token(&client_for(&server), &store, Cursor::new(""), Vec::new())
        .await
        .unwrap();

    assert_eq!(token.access_token, "refreshed");
    let saved = store.load().unwrap().unwrap();
    assert_eq!(saved.access_token, "refreshed");
    assert_eq!(saved.refresh_token.as_deref(), Some("1//keep"));
}

#[tokio::test]
async fn missing_token_runs_console_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=pasted-code"))
        .and(body_string_contains("code_verifier="))
        .respond_with(token_reply("fresh", Some("1//new")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    let mut prompt = Vec::new();
    let token = obtain_token(
        &client_for(&server),
        &store,
        Cursor::new("pasted-code\n"),
        &mut prompt,
    )
    .await
    .unwrap();

    assert_eq!(token.access_token, "fresh");
    let prompt = String::from_utf8(prompt).unwrap();
    assert!(prompt.contains("Please visit this URL to authorize this application: "));
    assert!(prompt.contains("access_type=offline"));
    assert!(prompt.contains("Enter the authorization code: "));
    assert_eq!(store.load().unwrap().unwrap().refresh_token.as_deref(), Some("1//new"));
}

#[tokio::test]
async fn revoked_refresh_token_falls_back_to_console() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Token has been expired or revoked."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(token_reply("reauthorized", Some("1//again")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));
    store
        .save(
            &Token::new("old", "Bearer")
                .with_refresh_token("1//revoked")
                .with_expires_at(Utc::now() - Duration::hours(1)),
        )
        .unwrap();

    let token = obtain_token(
        &client_for(&server),
        &store,
        Cursor::new("code\n"),
        Vec::new(),
    )
    .await
    .unwrap();
    assert_eq!(token.access_token, "reauthorized");
}

#[tokio::test]
async fn empty_console_answer_is_an_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    let err = obtain_token(&client_for(&server), &store, Cursor::new("\n"), Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, fms_oauth::Error::MissingCode));
    assert!(store.load().unwrap().is_none());
}
