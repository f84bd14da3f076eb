//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fms-tools", version, about = "FixMyStreet cobrand maintenance tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write categories.json from the category spreadsheet, for import_categories
    Categories(SheetArgs),

    /// Write layers.js mapping categories to WFS asset layers
    Assets(SheetArgs),

    /// Upload the oldest confirmed reports to the Socrata dataset
    SocrataUpload(SocrataArgs),

    /// Rebuild page templates from the council's remote fragments
    BuildTemplates(TemplateArgs),
}

/// Options shared by the spreadsheet commands.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SheetArgs {
    /// Sheet, column and category configuration
    #[arg(long, value_name = "FILE", default_value = "config.yml")]
    pub config: PathBuf,

    /// OAuth client secrets downloaded from the Google Cloud console
    #[arg(long, value_name = "FILE", default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Where the Google access and refresh tokens are kept between runs
    #[arg(long, value_name = "FILE", default_value = "token.json")]
    pub token: PathBuf,

    /// Read rows from a JSON file instead of the Sheets API
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file (defaults to categories.json or layers.js)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SocrataArgs {
    /// Site configuration with database and Socrata credentials
    #[arg(long, value_name = "FILE", default_value = "conf/general.yml")]
    pub config: PathBuf,

    /// Number of reports to upload
    #[arg(long, default_value_t = fms_socrata::DEFAULT_LIMIT)]
    pub limit: i64,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct TemplateArgs {
    /// Directory holding the *.html.template files
    #[arg(long, value_name = "DIR", default_value = "templates/web/eastsussex")]
    pub dir: PathBuf,

    /// YAML template set to use instead of the built-in East Sussex one
    #[arg(long, value_name = "FILE")]
    pub set: Option<PathBuf>,
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
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sheet_defaults() {
        let cli = Cli::try_parse_from(["fms-tools", "categories"]).unwrap();
        let Command::Categories(args) = cli.command else {
            panic!("expected categories");
        };
        assert_eq!(
            args,
            SheetArgs {
                config: PathBuf::from("config.yml"),
                credentials: PathBuf::from("credentials.json"),
                token: PathBuf::from("token.json"),
                input: None,
                output: None,
            }
        );
    }

    #[test]
    fn test_assets_with_input() {
        let cli = Cli::try_parse_from([
            "fms-tools",
            "assets",
            "--input",
            "rows.json",
            "-o",
            "out/layers.js",
        ])
        .unwrap();
        let Command::Assets(args) = cli.command else {
            panic!("expected assets");
        };
        assert_eq!(args.input, Some(PathBuf::from("rows.json")));
        assert_eq!(args.output, Some(PathBuf::from("out/layers.js")));
    }

    #[test]
    fn test_socrata_defaults() {
        let cli = Cli::try_parse_from(["fms-tools", "socrata-upload"]).unwrap();
        let Command::SocrataUpload(args) = cli.command else {
            panic!("expected socrata-upload");
        };
        assert_eq!(args.config, PathBuf::from("conf/general.yml"));
        assert_eq!(args.limit, 5);
    }

    #[test]
    fn test_build_templates_defaults() {
        let cli = Cli::try_parse_from(["fms-tools", "build-templates", "--set", "t.yml"]).unwrap();
        let Command::BuildTemplates(args) = cli.command else {
            panic!("expected build-templates");
        };
        assert_eq!(args.dir, PathBuf::from("templates/web/eastsussex"));
        assert_eq!(args.set, Some(PathBuf::from("t.yml")));
    }

    #[test]
    fn test_unknown_command() {
        assert!(Cli::try_parse_from(["fms-tools", "import"]).is_err());
    }
}
