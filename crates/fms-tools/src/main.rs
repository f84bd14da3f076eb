//! `fms-tools` - `FixMyStreet` cobrand maintenance commands
//!
//! Turns a council's category spreadsheet into `categories.json` and
//! `layers.js`, publishes confirmed reports to Socrata, and rebuilds page
//! templates from remote fragments.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fms_tools=info,fms_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Categories(args) => commands::sheet::categories(&args).await,
        Command::Assets(args) => commands::sheet::assets(&args).await,
        Command::SocrataUpload(args) => commands::socrata::upload(&args).await,
        Command::BuildTemplates(args) => commands::templates::build(&args).await,
    }
}
