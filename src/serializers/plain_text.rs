//! Plain-text serializer
//!
//! ```text
//! 2025-01-08T10:30:45.123Z (WARN):  line one
//!                                   line two
//!
//! 2025-01-08T10:30:46.001Z (ERROR): boom
//! at app::main (src/main.rs:3:5)
//!
//! ```

use super::ModeSerializer;
use crate::core::{LogMode, LogRecord, Result};

/// Width of the longest possible prefix, `"yyyy-mm-ddThh:mm:ss.mmmZ (ERROR): "`
pub const PADDING_WIDTH: usize = "yyyy-mm-ddThh:mm:ss.mmmZ (ERROR): ".len();

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSerializer;

impl PlainTextSerializer {
    /// Continuation lines are indented to the message column
    fn pad_message(message: &str) -> String {
        let padding = format!("\n{}", " ".repeat(PADDING_WIDTH));
        message.replace('\n', &padding)
    }
}

impl ModeSerializer for PlainTextSerializer {
    fn mode(&self) -> LogMode {
        LogMode::PlainText
    }

    fn render(&self, record: &LogRecord) -> Result<String> {
        let prefix = format!("{} ({}): ", record.timestamp_str(), record.severity());
        let mut output = format!(
            "{:<width$}{}\n",
            prefix,
            Self::pad_message(record.message()),
            width = PADDING_WIDTH
        );

        for frame in record.trace().unwrap_or_default() {
            output.push_str(frame);
            output.push('\n');
        }
        // Blocks are separated by a blank line
        output.push('\n');

        Ok(output)
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

    #[test]
    fn test_padding_width() {
        assert_eq!(PADDING_WIDTH, 34);
    }

    #[test]
    fn test_prefix_alignment() {
        let serializer = PlainTextSerializer;
        assert_eq!(
            serializer.render(&record(Severity::Info, "m", None)).unwrap(),
            "2025-01-08T10:30:45.123Z (INFO):  m\n\n"
        );
        assert_eq!(
            serializer.render(&record(Severity::Warn, "m", None)).unwrap(),
            "2025-01-08T10:30:45.123Z (WARN):  m\n\n"
        );
        assert_eq!(
            serializer.render(&record(Severity::Error, "m", None)).unwrap(),
            "2025-01-08T10:30:45.123Z (ERROR): m\n\n"
        );
    }

    #[test]
    fn test_continuation_lines_are_padded() {
        let output = PlainTextSerializer
            .render(&record(Severity::Warn, "line one\nline two", None))
            .unwrap();
        assert_eq!(
            output,
            format!(
                "2025-01-08T10:30:45.123Z (WARN):  line one\n{}line two\n\n",
                " ".repeat(34)
            )
        );
    }

    #[test]
    fn test_trace_frames_follow_unindented() {
        let trace = vec!["at app::main (src/main.rs:3:5)".to_string(), "at std::rt".to_string()];
        let output = PlainTextSerializer
            .render(&record(Severity::Error, "boom", Some(trace)))
            .unwrap();
        assert_eq!(
            output,
            "2025-01-08T10:30:45.123Z (ERROR): boom\nat app::main (src/main.rs:3:5)\nat std::rt\n\n"
        );
    }

    #[test]
    fn test_merge_appends() {
        let merged = PlainTextSerializer
            .merge(std::path::Path::new("app.txt"), "old\n", "new\n")
            .unwrap();
        assert_eq!(merged, "old\nnew\n");
    }
}
