//! End-to-end tests: raw sheet rows through classification to both
//! output artifacts.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io;
use std::sync::{Arc, Mutex};

use fms_core::{CategoryExport, Config, LayerSet, classify_rows};
use pretty_assertions::assert_eq;

const CONFIG: &str = r#"
doc_id: sheet-123
sheet_range: "Categories!A1:P999"
disabled_message: "Please phone 020 0000 0000."
email_replacement: "hackney+{email}@example.org"
categories:
  Potholes:
    extra_fields:
      - code: depth
        required: true
    wfs_attributes:
      asset_id: central_as_id
  Street lights:
    wfs_attributes:
      column_id: unitid
"#;

fn sheet() -> Vec<Vec<String>> {
    let rows: Vec<Vec<&str>> = vec![
        // Header row: no address anywhere, dropped from both outputs.
        vec!["Group", "Category", "", "Email", "", "", "Email 2"],
        vec![
            "Roads", "Potholes", "", "roads@council.gov.uk", "", "", "", "", "", "", "", "", "",
            "", "", "highways:potholes",
        ],
        vec!["Roads", "Gritting", "", "Alloy", "", "", "roads@council.gov.uk"],
        vec![
            "Lighting",
            "Street lights",
            "",
            "",
            "",
            "",
            "lights@council.gov.uk",
            "",
            "",
            "lights.out@council.gov.uk",
            "",
            "",
            "",
            "",
            "",
            "lighting:columns",
        ],
        vec![
            "Waste",
            "Bins",
            "",
            "res@council.gov.uk com@council.gov.uk",
        ],
        vec![
            "Waste", "Fly-tipping", "", "Alloy", "", "", "", "", "", "", "", "", "", "", "",
            "waste:flytips",
        ],
        vec!["Waste"],
    ];
    rows.into_iter()
        .map(|row| row.into_iter().map(String::from).collect())
        .collect()
}

#[test]
fn categories_json_from_sheet() {
    let config = Config::from_yaml_str(CONFIG).unwrap();
    let parsed = classify_rows(&sheet(), &config).unwrap();
    let json = CategoryExport::build(&parsed, &config)
        .unwrap()
        .to_json()
        .unwrap();

    let expected = r#"{
  "disabled_message": "Please phone 020 0000 0000.",
  "groups": {
    "Lighting": [
      {
        "category": "Street lights",
        "email": "hackney+lights_council_gov_uk@example.org"
      }
    ],
    "Roads": [
      {
        "category": "Potholes",
        "email": "hackney+roads_council_gov_uk@example.org",
        "extra_fields": [
          {
            "code": "depth",
            "required": true
          }
        ]
      }
    ],
    "Waste": [
      {
        "category": "Bins",
        "email": "hackney+res_council_gov_uk@example.org"
      }
    ]
  }
}"#;
    assert_eq!(json, expected);
}

#[test]
fn layers_js_from_sheet() {
    let config = Config::from_yaml_str(CONFIG).unwrap();
    let parsed = classify_rows(&sheet(), &config).unwrap();
    let js = LayerSet::build(&parsed, &config).unwrap().render();

    let expected = concat!(
        "\n",
        "fixmystreet.assets.add(wfs_defaults, {\n",
        "    wfs_feature: \"highways:potholes\",\n",
        "    asset_category: \"Potholes\",\n",
        "    attributes: {\"asset_id\": \"central_as_id\"}\n",
        "});\n",
        "\n",
        "\n",
        "fixmystreet.assets.add(wfs_defaults, {\n",
        "    wfs_feature: \"lighting:columns\",\n",
        "    asset_category: \"Street lights\",\n",
        "    attributes: {\"column_id\": \"unitid\"}\n",
        "});\n",
        "\n",
    );
    assert_eq!(js, expected);
}

#[test]
fn repeated_exports_are_byte_identical() {
    let config = Config::from_yaml_str(CONFIG).unwrap();
    let first = CategoryExport::build(&classify_rows(&sheet(), &config).unwrap(), &config)
        .unwrap()
        .to_json()
        .unwrap();
    let second = CategoryExport::build(&classify_rows(&sheet(), &config).unwrap(), &config)
        .unwrap()
        .to_json()
        .unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn writes_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::from_yaml_str(CONFIG).unwrap();
    let parsed = classify_rows(&sheet(), &config).unwrap();

    let categories_path = dir.path().join("categories.json");
    let export = CategoryExport::build(&parsed, &config).unwrap();
    export.write_to(&categories_path).unwrap();
    let written = std::fs::read_to_string(&categories_path).unwrap();
    assert_eq!(written, export.to_json().unwrap());

    let layers_path = dir.path().join("layers.js");
    let layers = LayerSet::build(&parsed, &config).unwrap();
    layers.write_to(&layers_path).unwrap();
    let written = std::fs::read_to_string(&layers_path).unwrap();
    assert_eq!(written.matches("fixmystreet.assets.add").count(), 2);
}

/// Collects formatted log lines for the duration of a test.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_logs(f: impl FnOnce()) -> String {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    logs.contents()
}

#[test]
fn warns_about_extra_addresses() {
    let config = Config::from_yaml_str(CONFIG).unwrap();
    let logs = capture_logs(|| {
        classify_rows(&sheet(), &config).unwrap();
    });
    assert!(logs.contains("WARN"));
    assert!(logs.contains("Lighting - Street lights has 2 addresses; using the first one"));
}

#[test]
fn warns_about_layer_without_category() {
    let config = Config::from_yaml_str(CONFIG).unwrap();
    let parsed = classify_rows(&sheet(), &config).unwrap();
    let logs = capture_logs(|| {
        LayerSet::build(&parsed, &config).unwrap();
    });
    assert!(logs.contains("No email category for WFS layer waste:flytips, skipping."));
    assert!(!logs.contains("highways:potholes"));
}
