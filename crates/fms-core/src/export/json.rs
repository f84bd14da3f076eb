//! Single-line JSON with spaced separators.
//!
//! `layers.js` embeds attribute objects as `{"a": 1, "b": [2, 3]}`, the
//! layout the cobrand JS files already use.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

#[derive(Debug, Clone, Copy, Default)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serializes a value on one line with `", "` and `": "` separators.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn to_spaced_string<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut serializer)?;
    // serde_json only emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
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
    use serde_json::json;

    #[test]
    fn test_spaced_object() {
        let value = json!({"b": [1, 2], "a": {"x": null}});
        assert_eq!(
            to_spaced_string(&value).unwrap(),
            r#"{"b": [1, 2], "a": {"x": null}}"#
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(to_spaced_string(&json!({})).unwrap(), "{}");
        assert_eq!(to_spaced_string(&json!([])).unwrap(), "[]");
    }
}
