//! `build-templates`: renders page templates from remote fragments.

use crate::cli::TemplateArgs;
use anyhow::{Context, Result};
use fms_templates::{TemplateBuilder, TemplateSet};
use tracing::info;

/// Builds every template in the chosen set.
pub async fn build(args: &TemplateArgs) -> Result<()> {
    let set = match &args.set {
        Some(path) => {
            TemplateSet::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => TemplateSet::east_sussex(),
    };

    let builder = TemplateBuilder::new(&args.dir, set)?;
    let written = builder
        .build()
        .await
        .with_context(|| format!("building templates in {}", args.dir.display()))?;

    info!("Built {} templates", written.len());
    Ok(())
}
