//! Structured stdout for the json and xml output formats.

use serde::Serialize;

use crate::OutputFormat;

/// Prints `value` as pretty JSON, or as XML under a `root` element.
///
/// Text output is laid out by each command, so `Text` falls back to JSON.
pub(crate) fn print_structured<T: Serialize>(value: &T, root: &str, output: OutputFormat) {
    let rendered = match output {
        OutputFormat::Xml => {
            quick_xml::se::to_string_with_root(root, value).map_err(|e| e.to_string())
        }
        OutputFormat::Json | OutputFormat::Text => {
            serde_json::to_string_pretty(value).map_err(|e| e.to_string())
        }
    };
    println!(
        "{}",
        rendered.unwrap_or_else(|e| format!("serialization error: {}", e))
    );
}

/// A single `<error>` element with the message escaped.
pub(crate) fn xml_error(msg: &str) -> String {
    format!("<error>{}</error>", quick_xml::escape::escape(msg))
}
