//! Building templates against a mock fragment server.

#![allow(clippy::unwrap_used)]

use fms_templates::{Error, TemplateBuilder, TemplateSet};
use pretty_assertions::assert_eq;
use std::fs;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(server: &MockServer, fragment: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/remote"))
        .and(query_param("control", fragment))
        .and(query_param("host", "mysociety.org"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn east_sussex_against(server: &MockServer) -> TemplateSet {
    TemplateSet {
        base_url: format!("{}/remote?control={{fragment}}&host=mysociety.org", server.uri()),
        ..TemplateSet::east_sussex()
    }
}

#[tokio::test]
async fn builds_east_sussex_header_and_footer() {
    let server = MockServer::start().await;
    serve(&server, "HtmlTag", "<html lang=\"en\">\r\n").await;
    serve(&server, "MetadataDesktop", "<meta charset=\"utf-8\">\r\n").await;
    serve(&server, "HeaderDesktop", "<header>\r\n<nav></nav>\r\n</header>").await;
    serve(&server, "FooterDesktop", "<footer>ESCC</footer>").await;

    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("header.html.template"),
        "{HtmlTag}<head>{MetadataDesktop}</head>\n<body>\n{HeaderDesktop}\n<style>a {{ color: red }}</style>\n",
    )
    .unwrap();
    fs::write(dir.path().join("footer.html.template"), "{FooterDesktop}\n</body>\n").unwrap();

    let builder = TemplateBuilder::new(dir.path(), east_sussex_against(&server)).unwrap();
    let written = builder.build().await.unwrap();

    assert_eq!(
        written,
        vec![dir.path().join("footer.html"), dir.path().join("header.html")]
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("header.html")).unwrap(),
        concat!(
            "<html lang=\"en\">\n<head><meta charset=\"utf-8\">\n</head>\n<body>\n",
            "<header id=\"site-header\" class=\"eastsussex\">\n<nav></nav>\n</header>\n",
            "<style>a { color: red }</style>\n"
        )
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("footer.html")).unwrap(),
        "<footer>ESCC</footer>\n</body>\n"
    );

    // Each fragment is also kept on its own, patched and without \r.
    assert_eq!(
        fs::read_to_string(dir.path().join("HeaderDesktop.html")).unwrap(),
        "<header id=\"site-header\" class=\"eastsussex\">\n<nav></nav>\n</header>"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("HtmlTag.html")).unwrap(),
        "<html lang=\"en\">\n"
    );
}

#[tokio::test]
async fn missing_template_file_is_reported() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let builder = TemplateBuilder::new(dir.path(), east_sussex_against(&server)).unwrap();
    let err = builder.build().await.unwrap_err();
    assert!(matches!(err, Error::Io { ref path, .. } if path.ends_with("footer.html.template")));
}

#[tokio::test]
async fn fragment_server_error_stops_the_build() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("footer.html.template"), "{FooterDesktop}").unwrap();

    let builder = TemplateBuilder::new(dir.path(), east_sussex_against(&server)).unwrap();
    let err = builder.build().await.unwrap_err();
    assert!(matches!(err, Error::Fetch { ref fragment, .. } if fragment == "FooterDesktop"));
    assert!(!dir.path().join("footer.html").exists());
}

#[tokio::test]
async fn placeholder_without_fragment_is_an_error() {
    let server = MockServer::start().await;
    serve(&server, "FooterDesktop", "<footer/>").await;

    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("footer.html.template"),
        "{FooterDesktop}{Sidebar}",
    )
    .unwrap();

    let set = TemplateSet {
        templates: TemplateSet::east_sussex()
            .templates
            .into_iter()
            .filter(|(name, _)| name == "footer.html.template")
            .collect(),
        ..east_sussex_against(&server)
    };
    let err = TemplateBuilder::new(dir.path(), set)
        .unwrap()
        .build()
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "footer.html.template: unknown placeholder 'Sidebar'"
    );
}
