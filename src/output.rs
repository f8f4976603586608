//! Rendering of response bodies for the command line.
//!
//! Supports pretty and compact JSON, written to any `Write` sink.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

/// Output layout for [`write_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Compact,
}

/// Renders `value` as JSON.
pub fn render<T: Serialize + ?Sized>(value: &T, format: Format) -> Result<String> {
    Ok(match format {
        Format::Pretty => serde_json::to_string_pretty(value)?,
        Format::Compact => serde_json::to_string(value)?,
    })
}

/// Writes `value` as a single JSON document followed by a newline.
pub fn write_json<T, W>(out: &mut W, value: &T, format: Format) -> Result<()>
where
    T: Serialize + ?Sized,
    W: Write,
{
    let rendered = render(value, format)?;
    debug!(bytes = rendered.len(), ?format, "Writing response");
    writeln!(out, "{rendered}")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_compact() {
        let value = json!({"id": 1, "tags": ["a"]});
        assert_eq!(render(&value, Format::Compact).unwrap(), r#"{"id":1,"tags":["a"]}"#);
    }

    #[test]
    fn test_render_pretty_spans_lines() {
        let value = json!({"id": 1, "name": "x"});
        let rendered = render(&value, Format::Pretty).unwrap();
        assert_eq!(rendered.lines().count(), 4);
        assert!(rendered.contains("  \"id\": 1"));
    }

    #[test]
    fn test_write_json_appends_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &json!({}), Format::Compact).unwrap();
        assert_eq!(buf, b"{}\n");
    }
}
