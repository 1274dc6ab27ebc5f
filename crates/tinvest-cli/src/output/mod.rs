//! JSON rendering of command results.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;
use tinvest_core::UtcDateTime;

use crate::error::CliError;

/// Metadata printed alongside every command result.
///
/// Field order is fixed to keep serialization deterministic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub command: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    pub generated_at: UtcDateTime,
    pub latency_ms: u64,
}

/// Document written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub meta: Meta,
    pub data: Value,
}

pub fn render(document: &Document, pretty: bool) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_document(&mut handle, document, pretty)?;
    handle.flush()?;
    Ok(())
}

fn write_document<W: Write>(writer: &mut W, document: &Document, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, document)?;
    } else {
        serde_json::to_writer(&mut *writer, document)?;
    }
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        Document {
            meta: Meta {
                command: "orders",
                account: None,
                generated_at: UtcDateTime::parse("2020-03-02T07:00:00Z").expect("timestamp"),
                latency_ms: 12,
            },
            data: serde_json::json!({ "orders": [] }),
        }
    }

    #[test]
    fn compact_output_is_one_line() {
        let mut buffer = Vec::new();
        write_document(&mut buffer, &document(), false).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(
            text,
            "{\"meta\":{\"command\":\"orders\",\"generated_at\":\"2020-03-02T07:00:00Z\",\"latency_ms\":12},\"data\":{\"orders\":[]}}\n"
        );
    }

    #[test]
    fn pretty_output_is_indented() {
        let mut buffer = Vec::new();
        write_document(&mut buffer, &document(), true).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        assert!(text.contains("\n  \"meta\": {"));
    }
}
