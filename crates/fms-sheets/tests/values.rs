//! `SheetsClient` against a mock Sheets API.

#![allow(clippy::unwrap_used)]

use fms_sheets::{Error, SheetsClient};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetches_rows_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/doc-1/values/Sheet1!A1:P3"))
        .and(header("authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "range": "Sheet1!A1:P3",
            "majorDimension": "ROWS",
            "values": [
                ["Group", "Category"],
                ["Roads", "Potholes", "", "roads@example.org"],
                ["Lighting", "Street light out", 3]
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SheetsClient::new("ya29.token").with_base_url(server.uri());
    let rows = client.values("doc-1", "Sheet1!A1:P3").await.unwrap();

    assert_eq!(
        rows,
        vec![
            vec!["Group", "Category"],
            vec!["Roads", "Potholes", "", "roads@example.org"],
            vec!["Lighting", "Street light out", "3"],
        ]
    );
}

#[tokio::test]
async fn empty_range_has_no_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "range": "Sheet1!A1:P3",
            "majorDimension": "ROWS"
        })))
        .mount(&server)
        .await;

    let client = SheetsClient::new("t").with_base_url(server.uri());
    assert!(client.values("doc-1", "A1:P3").await.unwrap().is_empty());
}

#[tokio::test]
async fn api_error_message_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {
                "code": 403,
                "message": "The caller does not have permission",
                "status": "PERMISSION_DENIED"
            }
        })))
        .mount(&server)
        .await;

    let client = SheetsClient::new("t").with_base_url(server.uri());
    let err = client.values("doc-1", "A1:P3").await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "The caller does not have permission");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_json_error_falls_back_to_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .mount(&server)
        .await;

    let client = SheetsClient::new("t").with_base_url(server.uri());
    let err = client.values("missing", "A1:B2").await.unwrap_err();
    assert_eq!(err.to_string(), "Sheets API error (404): Not Found");
}
