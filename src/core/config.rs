//! Logger configuration
//!
//! The configuration is owned by the host application and shared with the
//! logger through a [`SharedConfig`] handle. The logger reads it on every
//! call, so changes to the mode or path take effect on the next record.

use super::error::{LoggerError, Result};
use chrono::Local;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Live configuration handle shared between the host and the logger
pub type SharedConfig = Arc<RwLock<LoggerConfig>>;

/// Path-producing function, evaluated on every log call
pub type PathFn = Arc<dyn Fn() -> PathBuf + Send + Sync>;

/// Serialization mode for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogMode {
    /// Return the built record without rendering or writing it
    #[serde(alias = "return_only")]
    ReturnOnly,
    /// One JSON array per file, rewritten on every record
    Json,
    /// A YAML sequence, appended to
    #[serde(alias = "yml")]
    Yaml,
    /// Column-aligned text blocks, appended to
    #[default]
    #[serde(alias = "plain_text", alias = "text")]
    PlainText,
}

impl LogMode {
    /// File extension used by the default path
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            LogMode::ReturnOnly => None,
            LogMode::Json => Some("json"),
            LogMode::Yaml => Some("yml"),
            LogMode::PlainText => Some("txt"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogMode::ReturnOnly => "return-only",
            LogMode::Json => "json",
            LogMode::Yaml => "yaml",
            LogMode::PlainText => "plain-text",
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogMode {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "return-only" => Ok(LogMode::ReturnOnly),
            "json" => Ok(LogMode::Json),
            "yaml" | "yml" => Ok(LogMode::Yaml),
            "plain-text" | "text" => Ok(LogMode::PlainText),
            _ => Err(LoggerError::config(
                "LogMode",
                format!("unsupported mode '{}'", s),
            )),
        }
    }
}

/// Where log records are written
#[derive(Clone, Default)]
pub enum LogPath {
    /// `logs/<YYYY-MM-DD>.<ext>`, with the extension taken from the mode
    #[default]
    Default,
    Literal(PathBuf),
    /// Re-evaluated per call, e.g. for date-stamped file names
    Dynamic(PathFn),
}

impl LogPath {
    pub fn literal(path: impl Into<PathBuf>) -> Self {
        LogPath::Literal(path.into())
    }

    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn() -> PathBuf + Send + Sync + 'static,
    {
        LogPath::Dynamic(Arc::new(f))
    }

    /// Produce the path for the current call
    pub fn resolve(&self, mode: LogMode) -> Result<PathBuf> {
        match self {
            LogPath::Default => default_path(mode),
            LogPath::Literal(path) => Ok(path.clone()),
            LogPath::Dynamic(f) => Ok(f()),
        }
    }
}

impl fmt::Debug for LogPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogPath::Default => f.write_str("Default"),
            LogPath::Literal(path) => f.debug_tuple("Literal").field(path).finish(),
            LogPath::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl<'de> Deserialize<'de> for LogPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let path = Option::<PathBuf>::deserialize(deserializer)?;
        Ok(path.map_or(LogPath::Default, LogPath::Literal))
    }
}

/// Default log file for `mode`, stamped with today's local date
pub fn default_path(mode: LogMode) -> Result<PathBuf> {
    let extension = mode.extension().ok_or_else(|| {
        LoggerError::config(
            "LogPath",
            format!("mode '{}' has no default log file", mode),
        )
    })?;
    let file_name = format!("{}.{}", Local::now().format("%Y-%m-%d"), extension);
    Ok(Path::new("logs").join(file_name))
}

/// Logger settings
///
/// # Example
///
/// ```
/// use rust_app_logger::core::{LogMode, LoggerConfig};
///
/// let config = LoggerConfig::from_json_str(r#"{"mode": "json", "path": "app.json"}"#).unwrap();
/// assert_eq!(config.mode, LogMode::Json);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub mode: LogMode,
    pub path: LogPath,
    /// Capture the caller's stack with every record
    pub include_stack: bool,
    /// Base for relative paths; the working directory when unset
    pub root_dir: Option<PathBuf>,
    /// Echo rendered records to stdout/stderr on non-dry calls
    pub console: bool,
    /// Colour the console echo by severity
    pub colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            mode: LogMode::default(),
            path: LogPath::default(),
            include_stack: false,
            root_dir: None,
            console: true,
            colors: true,
        }
    }
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LoggerError::io_operation("reading config", path, e))?;
        Self::from_json_str(&json)
    }

    /// Resolve the target file for the current call, joined against the
    /// root directory when relative
    pub fn resolve_path(&self) -> Result<PathBuf> {
        let path = self.path.resolve(self.mode)?;
        if path.is_absolute() {
            return Ok(path);
        }

        let root = match &self.root_dir {
            Some(root) => root.clone(),
            None => std::env::current_dir()
                .map_err(|e| LoggerError::io_operation("resolving working directory", ".", e))?,
        };
        Ok(root.join(path))
    }

    pub fn into_shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("JSON".parse::<LogMode>().unwrap(), LogMode::Json);
        assert_eq!("plain_text".parse::<LogMode>().unwrap(), LogMode::PlainText);
        assert_eq!("yml".parse::<LogMode>().unwrap(), LogMode::Yaml);
        assert_eq!("return-only".parse::<LogMode>().unwrap(), LogMode::ReturnOnly);

        let err = "xml".parse::<LogMode>().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_mode_extension() {
        assert_eq!(LogMode::Json.extension(), Some("json"));
        assert_eq!(LogMode::Yaml.extension(), Some("yml"));
        assert_eq!(LogMode::PlainText.extension(), Some("txt"));
        assert_eq!(LogMode::ReturnOnly.extension(), None);
    }

    #[test]
    fn test_default_path_uses_mode_extension() {
        let path = default_path(LogMode::Yaml).unwrap();
        assert!(path.starts_with("logs"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("yml"));

        let today = Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(path.file_stem().and_then(|s| s.to_str()), Some(today.as_str()));
    }

    #[test]
    fn test_default_path_rejects_return_only() {
        let err = default_path(LogMode::ReturnOnly).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_dynamic_path_is_evaluated_per_call() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        let path = LogPath::dynamic(move || {
            let n = counter_clone.fetch_add(1, Ordering::SeqCst);
            PathBuf::from(format!("log-{}.txt", n))
        });

        assert_eq!(path.resolve(LogMode::PlainText).unwrap(), PathBuf::from("log-0.txt"));
        assert_eq!(path.resolve(LogMode::PlainText).unwrap(), PathBuf::from("log-1.txt"));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_resolve_path_joins_root() {
        let config = LoggerConfig {
            path: LogPath::literal("app.txt"),
            root_dir: Some(PathBuf::from("/srv/app")),
            ..LoggerConfig::default()
        };
        assert_eq!(config.resolve_path().unwrap(), PathBuf::from("/srv/app/app.txt"));
    }

    #[test]
    fn test_resolve_path_keeps_absolute() {
        let config = LoggerConfig {
            path: LogPath::literal("/var/log/app.txt"),
            root_dir: Some(PathBuf::from("/srv/app")),
            ..LoggerConfig::default()
        };
        assert_eq!(config.resolve_path().unwrap(), PathBuf::from("/var/log/app.txt"));
    }

    #[test]
    fn test_from_json_str() {
        let config = LoggerConfig::from_json_str(
            r#"{"mode": "yaml", "path": "logs/app.yml", "include_stack": true, "console": false}"#,
        )
        .unwrap();
        assert_eq!(config.mode, LogMode::Yaml);
        assert!(matches!(config.path, LogPath::Literal(ref p) if p == Path::new("logs/app.yml")));
        assert!(config.include_stack);
        assert!(!config.console);
        assert!(config.colors);
    }

    #[test]
    fn test_from_json_str_defaults() {
        let config = LoggerConfig::from_json_str("{}").unwrap();
        assert_eq!(config.mode, LogMode::PlainText);
        assert!(matches!(config.path, LogPath::Default));
        assert!(!config.include_stack);
    }

    #[test]
    fn test_from_json_str_rejects_unknown_mode() {
        let err = LoggerConfig::from_json_str(r#"{"mode": "xml"}"#).unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }
}
