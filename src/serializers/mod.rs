//! Mode serializers
//!
//! Each serializer renders a [`LogRecord`] for one [`LogMode`] and defines
//! how the rendered text joins an existing log file.

pub mod json;
pub mod plain_text;
pub mod yaml;

pub use json::JsonSerializer;
pub use plain_text::{PlainTextSerializer, PADDING_WIDTH};
pub use yaml::YamlSerializer;

use crate::core::{LogMode, LogRecord, Result};
use std::path::Path;
use std::sync::Arc;

pub trait ModeSerializer: Send + Sync {
    fn mode(&self) -> LogMode;

    /// Render a record; a pure function of the record
    fn render(&self, record: &LogRecord) -> Result<String>;

    /// Whether new text is appended to the file (`true`) or the whole file
    /// is rewritten from [`ModeSerializer::merge`]
    fn is_append_only(&self) -> bool {
        true
    }

    /// Combine the existing file content with newly rendered text.
    /// `path` is only used for error context.
    fn merge(&self, _path: &Path, existing: &str, rendered: &str) -> Result<String> {
        Ok(format!("{}{}", existing, rendered))
    }
}

/// Serializer for `mode`; `None` for [`LogMode::ReturnOnly`], which skips
/// rendering altogether
pub fn serializer_for(mode: LogMode) -> Option<Arc<dyn ModeSerializer>> {
    match mode {
        LogMode::ReturnOnly => None,
        LogMode::Json => Some(Arc::new(JsonSerializer)),
        LogMode::Yaml => Some(Arc::new(YamlSerializer)),
        LogMode::PlainText => Some(Arc::new(PlainTextSerializer)),
    }
}
