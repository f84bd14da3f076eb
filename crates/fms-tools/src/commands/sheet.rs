//! `categories` and `assets`: exports built from the category spreadsheet.

use crate::cli::SheetArgs;
use anyhow::{Context, Result, bail};
use fms_core::{CategoryExport, Config, LayerSet, ParsedRow, classify_rows};
use fms_oauth::{ClientSecrets, SHEETS_READONLY_SCOPE, TokenStore, obtain_token};
use fms_sheets::SheetsClient;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CATEGORIES_OUTPUT: &str = "categories.json";
const DEFAULT_LAYERS_OUTPUT: &str = "layers.js";

/// Writes the grouped category list.
pub async fn categories(args: &SheetArgs) -> Result<()> {
    let (config, rows) = load(args).await?;
    let export = CategoryExport::build(&rows, &config)?;
    let output = output_path(args, DEFAULT_CATEGORIES_OUTPUT);
    export
        .write_to(&output)
        .with_context(|| format!("writing {}", output.display()))
}

/// Writes the WFS layer registrations.
pub async fn assets(args: &SheetArgs) -> Result<()> {
    let (config, rows) = load(args).await?;
    let layers = LayerSet::build(&rows, &config)?;
    let output = output_path(args, DEFAULT_LAYERS_OUTPUT);
    layers
        .write_to(&output)
        .with_context(|| format!("writing {}", output.display()))
}

fn output_path(args: &SheetArgs, default: &str) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Loads the configuration and the classified rows.
async fn load(args: &SheetArgs) -> Result<(Config, Vec<ParsedRow>)> {
    let config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    let raw = match &args.input {
        Some(path) => {
            fms_sheets::load_rows(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => fetch_rows(&config, &args.credentials, &args.token).await?,
    };
    if raw.is_empty() {
        bail!("No data found.");
    }
    info!("Classifying {} rows", raw.len());

    let rows = classify_rows(&raw, &config)?;
    Ok((config, rows))
}

async fn fetch_rows(config: &Config, credentials: &Path, token: &Path) -> Result<Vec<Vec<String>>> {
    let secrets = ClientSecrets::from_file(credentials)
        .with_context(|| format!("reading {}", credentials.display()))?;
    let client = secrets.client(&[SHEETS_READONLY_SCOPE])?;
    let store = TokenStore::new(token);

    let stdin = std::io::stdin();
    let token = obtain_token(&client, &store, stdin.lock(), std::io::stderr())
        .await
        .context("authorizing with Google")?;

    let rows = SheetsClient::new(token.access_token)
        .values(&config.doc_id, &config.sheet_range)
        .await
        .context("reading the category sheet")?;
    Ok(rows)
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
    use pretty_assertions::assert_eq;
    use std::fs;

    const CONFIG: &str = "\
doc_id: sheet-doc
sheet_range: Sheet1!A2:P
disabled_message: Please call us.
categories:
  Potholes:
    extra_fields:
      - code: depth
    wfs_attributes:
      asset_id: central_as
";

    fn args_in(dir: &Path, rows: &serde_json::Value) -> SheetArgs {
        fs::write(dir.join("config.yml"), CONFIG).unwrap();
        fs::write(dir.join("rows.json"), rows.to_string()).unwrap();
        SheetArgs {
            config: dir.join("config.yml"),
            credentials: dir.join("absent-credentials.json"),
            token: dir.join("absent-token.json"),
            input: Some(dir.join("rows.json")),
            output: Some(dir.join("out")),
        }
    }

    fn row(cells: &[(usize, &str)]) -> Vec<String> {
        let mut row = vec![String::new(); 16];
        for (index, text) in cells {
            row[*index] = (*text).to_string();
        }
        row
    }

    #[tokio::test]
    async fn test_categories_from_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let rows = serde_json::json!([
            row(&[(0, "Roads"), (1, "Potholes"), (3, "roads@example.org")]),
            row(&[(0, "Roads"), (1, "Gritting"), (3, "Alloy")]),
            ["Short"],
        ]);
        let args = args_in(dir.path(), &rows);

        categories(&args).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("out")).unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!({
                "disabled_message": "Please call us.",
                "groups": {
                    "Roads": [{
                        "category": "Potholes",
                        "email": "roads@example.org",
                        "extra_fields": [{"code": "depth"}]
                    }]
                }
            })
        );
    }

    #[tokio::test]
    async fn test_assets_from_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let rows = serde_json::json!([row(&[
            (0, "Roads"),
            (1, "Potholes"),
            (6, "roads@example.org"),
            (15, "highways:potholes"),
        ])]);
        let args = args_in(dir.path(), &rows);

        assets(&args).await.unwrap();

        let written = fs::read_to_string(dir.path().join("out")).unwrap();
        assert!(written.contains("wfs_feature: \"highways:potholes\""));
        assert!(written.contains("asset_category: \"Potholes\""));
        assert!(written.contains("attributes: {\"asset_id\": \"central_as\"}"));
    }

    #[tokio::test]
    async fn test_empty_sheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_in(dir.path(), &serde_json::json!([]));

        let err = categories(&args).await.unwrap_err();
        assert_eq!(err.to_string(), "No data found.");
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_default_outputs() {
        let args = SheetArgs {
            config: PathBuf::from("config.yml"),
            credentials: PathBuf::from("credentials.json"),
            token: PathBuf::from("token.json"),
            input: None,
            output: None,
        };
        assert_eq!(
            output_path(&args, DEFAULT_LAYERS_OUTPUT),
            PathBuf::from("layers.js")
        );
    }
}
