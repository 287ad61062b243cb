//! YAML serializer
//!
//! Every record is one item of a top-level sequence, so appending keeps the
//! file a valid YAML document. Scalars never span lines:
//!
//! ```text
//! - type: warn
//!   message: 'it''s done\nnext line'
//!   timestamp: '2025-01-08T10:30:45.123Z'
//! ```

use super::ModeSerializer;
use crate::core::{LogMode, LogRecord, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlSerializer;

/// Single-quoted scalar kept on one line
///
/// Quotes are doubled, `\n` and `\r` are written as two-character escapes,
/// and other YAML line breaks or characters YAML rejects become `\uXXXX`.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if needs_escape(c) => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn needs_escape(c: char) -> bool {
    matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}')
        || (c.is_control() && c != '\t')
}

impl ModeSerializer for YamlSerializer {
    fn mode(&self) -> LogMode {
        LogMode::Yaml
    }

    fn render(&self, record: &LogRecord) -> Result<String> {
        let mut output = format!(
            "- type: {}\n  message: {}\n  timestamp: {}\n",
            record.severity().as_type(),
            quote(record.message()),
            quote(&record.timestamp_str())
        );

        if let Some(trace) = record.trace() {
            output.push_str("  stack:\n");
            for frame in trace {
                output.push_str("    - ");
                output.push_str(&quote(frame));
                output.push('\n');
            }
        }

        Ok(output)
    }
}
