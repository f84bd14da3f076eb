//! Renders template files from fetched fragments.

use crate::error::{Error, Result};
use crate::fetch::FragmentFetcher;
use crate::set::{TemplateSet, output_name};
use fms_core::Template;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Builds every template of a [`TemplateSet`] inside one directory.
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    dir: PathBuf,
    set: TemplateSet,
    fetcher: FragmentFetcher,
}

impl TemplateBuilder {
    /// Creates a builder for templates in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template set is invalid.
    pub fn new(dir: impl Into<PathBuf>, set: TemplateSet) -> Result<Self> {
        set.validate()?;
        let fetcher = FragmentFetcher::new(set.url_template()?);
        Ok(Self {
            dir: dir.into(),
            set,
            fetcher,
        })
    }

    /// The directory holding templates and outputs.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fetches, patches and saves every fragment, then renders each template.
    ///
    /// Each fragment is saved as `<name>.html`, and each
    /// `<x>.html.template` is rendered to `<x>.html`. Returns the rendered
    /// template paths.
    ///
    /// # Errors
    ///
    /// Returns an error if a template cannot be read or parsed, a fragment
    /// cannot be fetched, a template refers to a fragment it does not list,
    /// or an output cannot be written.
    pub async fn build(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.set.templates.len());

        for (template_name, fragments) in &self.set.templates {
            let template_path = self.dir.join(template_name);
            let source =
                fs::read_to_string(&template_path).map_err(|e| Error::io(&template_path, e))?;
            let template = parse_named(template_name, &source)?;

            let mut contents = HashMap::with_capacity(fragments.len());
            for spec in fragments {
                let fetched = self.fetcher.fetch(spec.name()).await?;
                let patched = spec.apply(&fetched);
                self.write(&format!("{}.html", spec.name()), &patched)?;
                contents.insert(spec.name(), patched);
            }

            let rendered = template
                .render(|name| contents.get(name))
                .map_err(|source| Error::Template {
                    name: template_name.clone(),
                    source,
                })?;
            written.push(self.write(output_name(template_name)?, &rendered)?);
        }

        Ok(written)
    }

    fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.join(file_name);
        fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}

fn parse_named(name: &str, source: &str) -> Result<Template> {
    Template::parse(source).map_err(|source| Error::Template {
        name: name.to_string(),
        source,
    })
}
