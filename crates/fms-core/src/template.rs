//! Brace placeholder templates.
//!
//! Templates use `{name}` placeholders; `{{` and `}}` produce literal
//! braces. The same syntax drives the email forwarding alias
//! (`forward+{email}@example.org`) and the static page templates, whose
//! placeholders are remote fragment names.

use std::fmt;

/// Error raised while parsing or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// `{` without a matching `}`.
    #[error("unclosed '{{' at byte {0}")]
    Unclosed(usize),

    /// `}` that is neither doubled nor closing a placeholder.
    #[error("single '}}' at byte {0}")]
    StrayClose(usize),

    /// Placeholder with no value to substitute.
    #[error("unknown placeholder '{0}'")]
    UnknownPlaceholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses a template string.
    ///
    /// # Errors
    ///
    /// Returns an error if a brace is unbalanced.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    if chars.next_if(|&(_, next)| next == '{').is_some() {
                        literal.push('{');
                        continue;
                    }
                    let start = pos + c.len_utf8();
                    let end = chars
                        .by_ref()
                        .find(|&(_, next)| next == '}')
                        .map(|(end, _)| end)
                        .ok_or(TemplateError::Unclosed(pos))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(source[start..end].to_string()));
                }
                '}' => {
                    if chars.next_if(|&(_, next)| next == '}').is_none() {
                        return Err(TemplateError::StrayClose(pos));
                    }
                    literal.push('}');
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Returns the placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Renders the template, looking up each placeholder by name.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownPlaceholder`] when `lookup` has no
    /// value for a placeholder.
    pub fn render<V, F>(&self, mut lookup: F) -> Result<String, TemplateError>
    where
        V: AsRef<str>,
        F: FnMut(&str) -> Option<V>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = lookup(name)
                        .ok_or_else(|| TemplateError::UnknownPlaceholder(name.clone()))?;
                    out.push_str(value.as_ref());
                }
            }
        }
        Ok(out)
    }

    /// Renders the template with a value for every placeholder.
    #[must_use]
    pub fn fill<V, F>(&self, mut value_for: F) -> String
    where
        V: AsRef<str>,
        F: FnMut(&str) -> V,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => out.push_str(value_for(name).as_ref()),
            }
        }
        out
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    write!(f, "{}", text.replace('{', "{{").replace('}', "}}"))?;
                }
                Segment::Placeholder(name) => write!(f, "{{{name}}}")?,
            }
        }
        Ok(())
    }
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
    use std::collections::HashMap;

    #[test]
    fn test_render_named_placeholders() {
        let template = Template::parse("<html>{Header}<main/>{Footer}</html>").unwrap();
        let values = HashMap::from([("Header", "<h1/>"), ("Footer", "<p/>")]);
        let out = template.render(|name| values.get(name)).unwrap();
        assert_eq!(out, "<html><h1/><main/><p/></html>");
    }

    #[test]
    fn test_escaped_braces() {
        let template = Template::parse("body {{ color: red; }} {x}").unwrap();
        assert_eq!(template.fill(|_| "1"), "body { color: red; } 1");
        assert_eq!(template.placeholders().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_unknown_placeholder() {
        let template = Template::parse("{email} {other}").unwrap();
        let err = template
            .render(|name| (name == "email").then_some("a"))
            .unwrap_err();
        assert_eq!(err, TemplateError::UnknownPlaceholder("other".to_string()));
    }

    #[test]
    fn test_unbalanced_braces() {
        assert_eq!(
            Template::parse("abc {email").unwrap_err(),
            TemplateError::Unclosed(4)
        );
        assert_eq!(
            Template::parse("abc } def").unwrap_err(),
            TemplateError::StrayClose(4)
        );
    }

    #[test]
    fn test_display_round_trip() {
        let source = "a {{b}} {c} d";
        let template = Template::parse(source).unwrap();
        assert_eq!(template.to_string(), source);
    }
}
