//! Which fragments go into which template.

use crate::error::{Error, Result};
use fms_core::Template;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// East Sussex County Council's remote control endpoint.
pub const EAST_SUSSEX_BASE_URL: &str = "https://www.eastsussex.gov.uk/masterpages/remote/control.aspx?control={fragment}&host=mysociety.org";

/// Suffix of template files; the output file drops it.
const TEMPLATE_SUFFIX: &str = ".template";

/// A literal search and replace applied to a fetched fragment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct Patch {
    /// Text to find (every occurrence).
    pub search: String,
    /// Replacement text.
    pub replacement: String,
}

impl From<(String, String)> for Patch {
    fn from((search, replacement): (String, String)) -> Self {
        Self {
            search,
            replacement,
        }
    }
}

impl Patch {
    /// Creates a patch.
    #[must_use]
    pub fn new(search: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replacement: replacement.into(),
        }
    }
}

/// A remote fragment and the patches applied to it, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FragmentSpec {
    /// Fragment used as fetched.
    Plain(String),
    /// Fragment with patches.
    Patched {
        /// Fragment name.
        name: String,
        /// Patches, applied in order.
        #[serde(default)]
        patches: Vec<Patch>,
    },
}

impl FragmentSpec {
    /// Fragment name, which is also its placeholder in templates.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(name) | Self::Patched { name, .. } => name,
        }
    }

    /// Patches to apply.
    #[must_use]
    pub fn patches(&self) -> &[Patch] {
        match self {
            Self::Plain(_) => &[],
            Self::Patched { patches, .. } => patches,
        }
    }

    /// Applies the patches to fetched content.
    #[must_use]
    pub fn apply(&self, content: &str) -> String {
        self.patches()
            .iter()
            .fold(content.to_string(), |text, patch| {
                text.replace(&patch.search, &patch.replacement)
            })
    }
}

/// Template files, each mapped to the fragments it uses.
///
/// ```yaml
/// base_url: "https://example.gov.uk/remote?control={fragment}"
/// templates:
///   header.html.template:
///     - HtmlTag
///     - name: HeaderDesktop
///       patches:
///         - ["<header>", "<header id=\"site-header\">"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateSet {
    /// URL pattern with a `{fragment}` placeholder.
    pub base_url: String,
    /// Template file name to fragments.
    pub templates: BTreeMap<String, Vec<FragmentSpec>>,
}

impl TemplateSet {
    /// The East Sussex header and footer.
    #[must_use]
    pub fn east_sussex() -> Self {
        let header = vec![
            FragmentSpec::Plain("HtmlTag".to_string()),
            FragmentSpec::Plain("MetadataDesktop".to_string()),
            FragmentSpec::Patched {
                name: "HeaderDesktop".to_string(),
                patches: vec![Patch::new(
                    "<header>",
                    r#"<header id="site-header" class="eastsussex">"#,
                )],
            },
        ];
        let footer = vec![FragmentSpec::Plain("FooterDesktop".to_string())];

        Self {
            base_url: EAST_SUSSEX_BASE_URL.to_string(),
            templates: BTreeMap::from([
                ("header.html.template".to_string(), header),
                ("footer.html.template".to_string(), footer),
            ]),
        }
    }

    /// Parses a template set from YAML and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the set is invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let set: Self = serde_yaml::from_str(yaml)?;
        set.validate()?;
        Ok(set)
    }

    /// Reads a template set file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml_str(&yaml)
    }

    /// The fragment URL pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is malformed or uses a placeholder
    /// other than `{fragment}`.
    pub fn url_template(&self) -> Result<Template> {
        let template = Template::parse(&self.base_url).map_err(|source| Error::Template {
            name: "base_url".to_string(),
            source,
        })?;
        if let Some(other) = template.placeholders().find(|p| *p != "fragment") {
            return Err(Error::Config(format!(
                "base_url may only use {{fragment}}, found {{{other}}}"
            )));
        }
        Ok(template)
    }

    /// Checks the URL pattern and template file names.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.url_template()?;
        for name in self.templates.keys() {
            output_name(name)?;
        }
        Ok(())
    }
}

/// `header.html.template` to `header.html`.
pub(crate) fn output_name(template_name: &str) -> Result<&str> {
    template_name
        .strip_suffix(TEMPLATE_SUFFIX)
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            Error::Config(format!(
                "template file {template_name} must end in {TEMPLATE_SUFFIX}"
            ))
        })
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

    #[test]
    fn test_east_sussex_set() {
        let set = TemplateSet::east_sussex();
        set.validate().unwrap();

        let header: Vec<&str> = set.templates["header.html.template"]
            .iter()
            .map(FragmentSpec::name)
            .collect();
        assert_eq!(header, vec!["HtmlTag", "MetadataDesktop", "HeaderDesktop"]);

        let footer = &set.templates["footer.html.template"];
        assert_eq!(footer.len(), 1);
        assert_eq!(footer[0].name(), "FooterDesktop");
        assert!(footer[0].patches().is_empty());
    }

    #[test]
    fn test_header_patch() {
        let set = TemplateSet::east_sussex();
        let header_desktop = &set.templates["header.html.template"][2];
        assert_eq!(
            header_desktop.apply("<div><header><nav/></header></div>"),
            r#"<div><header id="site-header" class="eastsussex"><nav/></header></div>"#
        );
    }

    #[test]
    fn test_patches_apply_in_order() {
        let spec = FragmentSpec::Patched {
            name: "X".to_string(),
            patches: vec![Patch::new("a", "b"), Patch::new("b", "c")],
        };
        assert_eq!(spec.apply("ab"), "cc");
    }

    #[test]
    fn test_fragment_url() {
        let set = TemplateSet::east_sussex();
        let url = set.url_template().unwrap().fill(|_| "FooterDesktop");
        assert_eq!(
            url,
            "https://www.eastsussex.gov.uk/masterpages/remote/control.aspx?control=FooterDesktop&host=mysociety.org"
        );
    }

    #[test]
    fn test_yaml_set() {
        let set = TemplateSet::from_yaml_str(
            r#"
base_url: "http://example.org/remote/{fragment}"
templates:
  header.html.template:
    - Top
    - name: Banner
      patches:
        - ["<b>", "<strong>"]
"#,
        )
        .unwrap();

        assert_eq!(
            set.templates["header.html.template"],
            vec![
                FragmentSpec::Plain("Top".to_string()),
                FragmentSpec::Patched {
                    name: "Banner".to_string(),
                    patches: vec![Patch::new("<b>", "<strong>")],
                },
            ]
        );
    }

    #[test]
    fn test_invalid_sets() {
        let bad_suffix = "base_url: 'http://x/{fragment}'\ntemplates: {header.html: [A]}\n";
        assert!(matches!(
            TemplateSet::from_yaml_str(bad_suffix),
            Err(Error::Config(_))
        ));

        let bad_placeholder = "base_url: 'http://x/{name}'\ntemplates: {}\n";
        assert!(matches!(
            TemplateSet::from_yaml_str(bad_placeholder),
            Err(Error::Config(_))
        ));

        let unbalanced = "base_url: 'http://x/{fragment'\ntemplates: {}\n";
        assert!(matches!(
            TemplateSet::from_yaml_str(unbalanced),
            Err(Error::Template { .. })
        ));
    }

    #[test]
    fn test_output_name() {
        assert_eq!(output_name("footer.html.template").unwrap(), "footer.html");
        assert!(output_name(".template").is_err());
    }
}
