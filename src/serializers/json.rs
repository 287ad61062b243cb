//! JSON serializer
//!
//! A JSON log file holds a single array of record objects. Since the closing
//! bracket has to stay last, a new record is spliced in front of it and the
//! whole file is rewritten:
//!
//! ```text
//! [
//!   {
//!     "type": "info",
//!     "message": "42",
//!     "timestamp": "2025-01-08T10:30:45.123Z"
//!   }
//! ]
//! ```

use super::ModeSerializer;
use crate::core::{LogMode, LogRecord, LoggerError, Result};
use serde::Serialize;
use std::path::Path;

/// Indentation of records inside the top-level array
const ENTRY_INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

#[derive(Serialize)]
struct JsonRecord<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    message: &'a str,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<&'a [String]>,
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", ENTRY_INDENT, line))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ModeSerializer for JsonSerializer {
    fn mode(&self) -> LogMode {
        LogMode::Json
    }

    /// Pretty-printed record object, two-space indentation
    fn render(&self, record: &LogRecord) -> Result<String> {
        let json = JsonRecord {
            kind: record.severity().as_type(),
            message: record.message(),
            timestamp: record.timestamp_str(),
            stack: record.trace(),
        };
        Ok(serde_json::to_string_pretty(&json)?)
    }

    fn is_append_only(&self) -> bool {
        false
    }

    /// Splice `rendered` in front of the array's closing bracket
    ///
    /// Content that does not end in `]` is rejected rather than rewritten
    /// into something that is no longer JSON.
    fn merge(&self, path: &Path, existing: &str, rendered: &str) -> Result<String> {
        let entry = indent(rendered);

        if existing.trim().is_empty() {
            return Ok(format!("[\n{}\n]\n", entry));
        }

        let body = existing
            .trim_end()
            .strip_suffix(']')
            .ok_or_else(|| LoggerError::malformed(path, "content does not end with ']'"))?
            .trim_end();

        if body.ends_with('[') {
            Ok(format!("{}\n{}\n]\n", body, entry))
        } else {
            Ok(format!("{},\n{}\n]\n", body, entry))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use chrono::{TimeZone, Utc};

    fn record(severity: Severity, message: &str, trace: Option<Vec<String>>) -> LogRecord {
        let timestamp = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(123);
        LogRecord::from_parts(severity, message, timestamp, trace)
    }

    fn path() -> &'static Path {
        Path::new("app.json")
    }

    #[test]
    fn test_render_field_order() {
        let output = JsonSerializer.render(&record(Severity::Info, "42", None)).unwrap();
        assert_eq!(
            output,
            "{\n  \"type\": \"info\",\n  \"message\": \"42\",\n  \"timestamp\": \"2025-01-08T10:30:45.123Z\"\n}"
        );
    }

    #[test]
    fn test_render_with_stack() {
        let trace = vec!["at app::main".to_string()];
        let output = JsonSerializer
            .render(&record(Severity::Error, "boom", Some(trace)))
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["stack"][0], "at app::main");
        assert_eq!(parsed["type"], "error");
    }

    #[test]
    fn test_merge_into_empty_file() {
        let rendered = JsonSerializer.render(&record(Severity::Info, "42", None)).unwrap();
        let merged = JsonSerializer.merge(path(), "", &rendered).unwrap();
        assert_eq!(
            merged,
            "[\n  {\n    \"type\": \"info\",\n    \"message\": \"42\",\n    \"timestamp\": \"2025-01-08T10:30:45.123Z\"\n  }\n]\n"
        );
    }

    #[test]
    fn test_merge_appends_to_existing_array() {
        let first = JsonSerializer.render(&record(Severity::Info, "one", None)).unwrap();
        let second = JsonSerializer.render(&record(Severity::Warn, "two", None)).unwrap();

        let content = JsonSerializer.merge(path(), "", &first).unwrap();
        let content = JsonSerializer.merge(path(), &content, &second).unwrap();

        assert!(content.ends_with("\n]\n"));
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["message"], "one");
        assert_eq!(parsed[1]["message"], "two");
        assert_eq!(parsed[1]["type"], "warn");
    }

    #[test]
    fn test_merge_into_empty_array() {
        let rendered = JsonSerializer.render(&record(Severity::Info, "x", None)).unwrap();
        let merged = JsonSerializer.merge(path(), "[]\n", &rendered).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&merged).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_merge_rejects_malformed_content() {
        let rendered = JsonSerializer.render(&record(Severity::Info, "x", None)).unwrap();
        let err = JsonSerializer
            .merge(path(), "[\n  {\"type\": \"info\"", &rendered)
            .unwrap_err();
        assert!(matches!(err, LoggerError::MalformedLogFile { .. }));
    }

    #[test]
    fn test_multiline_message_stays_on_one_line() {
        let rendered = JsonSerializer
            .render(&record(Severity::Info, "a\nb", None))
            .unwrap();
        assert!(rendered.contains("\"message\": \"a\\nb\""));
    }
}
