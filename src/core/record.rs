//! Log record structure

use super::severity::Severity;
use super::value::{format_value, LogValue};
use chrono::{DateTime, Utc};
use std::backtrace::Backtrace;

/// ISO 8601 with milliseconds and a `Z` designator: `2025-01-08T10:30:45.123Z`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Symbol prefix of this crate's own frames
const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// A single log entry
///
/// Fields are fixed at construction; every rendering of the record is a pure
/// function of these values and the active mode.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    severity: Severity,
    message: String,
    timestamp: DateTime<Utc>,
    trace: Option<Vec<String>>,
}

impl LogRecord {
    /// Build a record for `value`, stamped now
    ///
    /// With `include_stack`, the current call stack is captured and the
    /// logger's own frames are dropped, so the first frame is the code that
    /// called the public entry point.
    pub fn build(value: &LogValue, severity: Severity, include_stack: bool) -> Self {
        let timestamp = Utc::now();
        let trace = include_stack.then(capture_trace);

        Self {
            severity,
            message: format_value(value),
            timestamp,
            trace,
        }
    }

    /// Assemble a record from already-known parts
    pub fn from_parts(
        severity: Severity,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
        trace: Option<Vec<String>>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            timestamp,
            trace,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Timestamp rendered with [`TIMESTAMP_FORMAT`]
    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn trace(&self) -> Option<&[String]> {
        self.trace.as_deref()
    }
}

struct Frame {
    symbol: String,
    location: Option<String>,
}

impl Frame {
    fn describe(&self) -> String {
        match &self.location {
            Some(location) => format!("at {} ({})", self.symbol, location),
            None => format!("at {}", self.symbol),
        }
    }

    /// Frames of the capture machinery and of this crate's call chain.
    /// Frames from this crate's own unit tests are callers, not internals.
    fn is_internal(&self) -> bool {
        let symbol = self.symbol.trim_start_matches('<');
        symbol.starts_with("std::backtrace")
            || (symbol.starts_with(CRATE_PREFIX) && !symbol.contains("::tests::"))
    }
}

fn capture_trace() -> Vec<String> {
    let backtrace = Backtrace::force_capture().to_string();
    let frames = parse_frames(&backtrace);

    // Everything up to the outermost internal frame belongs to the logger
    let start = frames
        .iter()
        .rposition(Frame::is_internal)
        .map_or(0, |index| index + 1);

    frames[start..].iter().map(Frame::describe).collect()
}

/// Parse the text form of a std backtrace:
///
/// ```text
///    0: crate::module::function
///              at ./src/module.rs:10:5
///       crate::module::inlined_function
///              at ./src/module.rs:20:9
/// ```
fn parse_frames(text: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                frame.location.get_or_insert_with(|| location.to_string());
            }
            continue;
        }

        let symbol = match line.split_once(": ") {
            Some((index, symbol)) if index.chars().all(|c| c.is_ascii_digit()) => symbol,
            _ => line,
        };
        frames.push(Frame {
            symbol: symbol.to_string(),
            location: None,
        });
    }

    frames
}
