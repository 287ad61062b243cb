//! Console echo of rendered records

use crate::core::Severity;
#[cfg(feature = "console")]
use colored::Colorize;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }

    /// Text as printed, without the block's trailing line breaks
    pub fn format(&self, severity: Severity, rendered: &str, use_colors: bool) -> String {
        let text = rendered.trim_end_matches('\n');
        if use_colors {
            paint(text, severity)
        } else {
            text.to_string()
        }
    }

    /// Info goes to stdout; Warn and Error go to stderr
    pub fn echo(&self, severity: Severity, rendered: &str, use_colors: bool) {
        let output = self.format(severity, rendered, use_colors);
        match severity {
            Severity::Info => println!("{}", output),
            Severity::Warn | Severity::Error => eprintln!("{}", output),
        }
    }
}

#[cfg(feature = "console")]
fn paint(text: &str, severity: Severity) -> String {
    text.color(severity.color_code()).to_string()
}

#[cfg(not(feature = "console"))]
fn paint(text: &str, _severity: Severity) -> String {
    text.to_string()
}
