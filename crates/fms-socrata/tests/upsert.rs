//! `SocrataClient` against a mock SODA endpoint.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use fms_socrata::{Error, ProblemRow, SocrataClient, SocrataConfig, SodaReport, UpsertResult};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config() -> SocrataConfig {
    SocrataConfig::from_yaml_str(
        "FMS_DB_HOST: localhost\n\
         FMS_DB_NAME: fms\n\
         FMS_DB_USER: fms\n\
         FMS_DB_PASS: ''\n\
         SOCRATA_APP_TOKEN: app-token\n\
         SOCRATA_USERNAME: user\n\
         SOCRATA_PASSWORD: pass\n\
         SOCRATA_DATASET_URL: abcd-1234\n",
    )
    .unwrap()
}

fn report() -> SodaReport {
    SodaReport::from(ProblemRow {
        id: 7,
        latitude: 51.0,
        longitude: -1.5,
        confirmed: NaiveDate::from_ymd_opt(2015, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0),
        category: "Near miss".to_string(),
        title: "Close pass".to_string(),
    })
}

#[tokio::test]
async fn upsert_posts_reports_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/resource/abcd-1234.json"))
        .and(header("x-app-token", "app-token"))
        // base64("user:pass")
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .and(body_json(serde_json::json!([{
            "id": 7,
            "category": "Near miss",
            "title": "Close pass",
            "occurred": "2015-06-01T12:00:00",
            "url": "http://collideosco.pe/report/7",
            "location": {"longitude": -1.5, "latitude": 51.0}
        }])))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "By RowIdentifier": 0,
            "Rows Updated": 0,
            "Rows Deleted": 0,
            "Rows Created": 1,
            "Errors": 0,
            "By SID": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config();
    let client = SocrataClient::new(&config).with_base_url(server.uri());
    let result = client.upsert(&config.dataset, &[report()]).await.unwrap();

    assert_eq!(
        result,
        UpsertResult {
            created: 1,
            ..UpsertResult::default()
        }
    );
    assert_eq!(
        result.to_string(),
        "1 created, 0 updated, 0 deleted, 0 errors"
    );
}

#[tokio::test]
async fn rejected_upsert_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "code": "permission_denied",
            "error": true,
            "message": "You must be logged in to write to this dataset"
        })))
        .mount(&server)
        .await;

    let config = config();
    let client = SocrataClient::new(&config).with_base_url(server.uri());
    match client.upsert("abcd-1234", &[report()]).await.unwrap_err() {
        Error::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "You must be logged in to write to this dataset");
        }
        other => panic!("unexpected error: {other}"),
    }
}
