//! Logger façade
//!
//! [`Logger::info`], [`Logger::warn`] and [`Logger::error`] build a record,
//! render it for the configured mode and hand it to the sink. The `_dry`
//! variants render without writing.

use super::{
    config::{LogMode, LogPath, LoggerConfig, SharedConfig},
    error::Result,
    metrics::LoggerMetrics,
    record::LogRecord,
    severity::Severity,
    value::LogValue,
};
use crate::serializers::serializer_for;
use crate::sink::{ConsoleSink, FileSink, Sink};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Result of a logging call
#[derive(Debug, Clone, PartialEq)]
pub enum LogOutput {
    /// Text rendered for the active mode, exactly as written to the sink
    Rendered(String),
    /// The record itself, in [`LogMode::ReturnOnly`]
    Record(LogRecord),
}

impl LogOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LogOutput::Rendered(text) => Some(text),
            LogOutput::Record(_) => None,
        }
    }

    pub fn into_record(self) -> Option<LogRecord> {
        match self {
            LogOutput::Record(record) => Some(record),
            LogOutput::Rendered(_) => None,
        }
    }
}

pub struct Logger {
    /// Live configuration, read on every call
    config: SharedConfig,
    sink: Arc<dyn Sink>,
    console: ConsoleSink,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_shared_config(config.into_shared())
    }

    /// Create a logger that follows a configuration owned by the host
    #[must_use]
    pub fn with_shared_config(config: SharedConfig) -> Self {
        Self {
            config,
            sink: Arc::new(FileSink::new()),
            console: ConsoleSink::new(),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// Handle to the live configuration; changes apply to the next call
    pub fn config(&self) -> SharedConfig {
        Arc::clone(&self.config)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub async fn info(&self, value: impl Into<LogValue>) -> Result<LogOutput> {
        self.log(Severity::Info, value.into(), false).await
    }

    pub async fn warn(&self, value: impl Into<LogValue>) -> Result<LogOutput> {
        self.log(Severity::Warn, value.into(), false).await
    }

    pub async fn error(&self, value: impl Into<LogValue>) -> Result<LogOutput> {
        self.log(Severity::Error, value.into(), false).await
    }

    pub async fn info_dry(&self, value: impl Into<LogValue>) -> Result<LogOutput> {
        self.log(Severity::Info, value.into(), true).await
    }

    pub async fn warn_dry(&self, value: impl Into<LogValue>) -> Result<LogOutput> {
        self.log(Severity::Warn, value.into(), true).await
    }

    pub async fn error_dry(&self, value: impl Into<LogValue>) -> Result<LogOutput> {
        self.log(Severity::Error, value.into(), true).await
    }

    /// Build, render and (unless `dry`) persist one record
    ///
    /// The rendered text is returned whether or not it was written, so the
    /// caller can route it elsewhere. Write failures are returned as errors;
    /// there is no retry or fallback destination.
    pub async fn log(&self, severity: Severity, value: LogValue, dry: bool) -> Result<LogOutput> {
        // Snapshot per call; the guard must not be held across the write
        let config = self.config.read().clone();

        let record = LogRecord::build(&value, severity, config.include_stack);

        let Some(serializer) = serializer_for(config.mode) else {
            return Ok(LogOutput::Record(record));
        };
        let rendered = serializer.render(&record)?;

        if dry {
            self.metrics.record_dry_call();
            return Ok(LogOutput::Rendered(rendered));
        }

        if config.console {
            self.console.echo(severity, &rendered, config.colors);
        }

        let written = match config.resolve_path() {
            Ok(path) => self.sink.write(&path, serializer, &rendered).await,
            Err(e) => Err(e),
        };
        match written {
            Ok(()) => {
                self.metrics.record_written();
                Ok(LogOutput::Rendered(rendered))
            }
            Err(e) => {
                self.metrics.record_failed();
                Err(e)
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &*self.config.read())
            .field("sink", &self.sink.name())
            .field("metrics", &self.metrics)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_app_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .mode(LogMode::Json)
///     .path("logs/app.json")
///     .include_stack(true)
///     .console(false)
///     .build();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<Arc<dyn Sink>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sink: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn mode(mut self, mode: LogMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Write to a fixed path
    #[must_use = "builder methods return a new value"]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = LogPath::literal(path);
        self
    }

    /// Compute the path on every call, e.g. to stamp it with the date
    #[must_use = "builder methods return a new value"]
    pub fn path_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> PathBuf + Send + Sync + 'static,
    {
        self.config.path = LogPath::dynamic(f);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn include_stack(mut self, include_stack: bool) -> Self {
        self.config.include_stack = include_stack;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn root_dir(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root_dir = Some(root.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, console: bool) -> Self {
        self.config.console = console;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, colors: bool) -> Self {
        self.config.colors = colors;
        self
    }

    /// Replace the default [`FileSink`]
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn build(self) -> Logger {
        let mut logger = Logger::new(self.config);
        if let Some(sink) = self.sink {
            logger.sink = sink;
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;
    use crate::serializers::ModeSerializer;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::Path;
    use tempfile::tempdir;

    /// Keeps every write in memory
    #[derive(Default)]
    struct MemorySink {
        writes: Arc<Mutex<Vec<(PathBuf, String)>>>,
    }

    #[async_trait]
    impl Sink for MemorySink {
        async fn write(
            &self,
            path: &Path,
            _serializer: Arc<dyn ModeSerializer>,
            rendered: &str,
        ) -> Result<()> {
            self.writes.lock().push((path.to_path_buf(), rendered.to_string()));
            Ok(())
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    struct FailingSink;

    #[async_trait]
    impl Sink for FailingSink {
        async fn write(
            &self,
            path: &Path,
            _serializer: Arc<dyn ModeSerializer>,
            _rendered: &str,
        ) -> Result<()> {
            let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
            Err(LoggerError::io_operation("appending to", path, err))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn memory_logger(mode: LogMode) -> (Logger, Arc<Mutex<Vec<(PathBuf, String)>>>) {
        let sink = MemorySink::default();
        let writes = Arc::clone(&sink.writes);
        let logger = Logger::builder()
            .mode(mode)
            .path("/tmp/app.log")
            .console(false)
            .sink(sink)
            .build();
        (logger, writes)
    }

    #[test]
    fn test_builder_default() {
        let logger = Logger::builder().build();
        let config = logger.config();
        let config = config.read();
        assert_eq!(config.mode, LogMode::PlainText);
        assert!(!config.include_stack);
        assert_eq!(logger.metrics().written_count(), 0);
    }

    #[test]
    fn test_debug_names_the_sink() {
        let logger = Logger::builder().mode(LogMode::Json).path("/tmp/app.json").build();
        let debug = format!("{:?}", logger);
        assert!(debug.contains("sink: \"file\""));
        assert!(debug.contains("mode: Json"));

        let (logger, _) = memory_logger(LogMode::Yaml);
        assert!(format!("{:?}", logger).contains("sink: \"memory\""));
    }

    #[tokio::test]
    async fn test_return_only_yields_record_without_writing() {
        let (logger, writes) = memory_logger(LogMode::ReturnOnly);

        let output = logger.warn(LogValue::Null).await.unwrap();
        let record = output.into_record().expect("record");
        assert_eq!(record.message(), "null");
        assert_eq!(record.severity(), Severity::Warn);
        assert!(writes.lock().is_empty());
        assert_eq!(logger.metrics().written_count(), 0);
    }

    #[test]
    fn test_return_only_from_sync_context() {
        let logger = Logger::builder().mode(LogMode::ReturnOnly).build();
        let output = tokio_test::block_on(logger.info(vec![1, 2, 3])).unwrap();
        assert_eq!(output.into_record().unwrap().message(), "[ 1, 2, 3 ]");
    }

    #[tokio::test]
    async fn test_write_returns_rendered_text() {
        let (logger, writes) = memory_logger(LogMode::PlainText);

        let output = logger.error("boom").await.unwrap();
        let text = output.as_text().expect("rendered text").to_string();
        assert!(text.contains("(ERROR): boom"));

        let writes = writes.lock();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, PathBuf::from("/tmp/app.log"));
        assert_eq!(writes[0].1, text);
        assert_eq!(logger.metrics().written_count(), 1);
    }

    #[tokio::test]
    async fn test_dry_call_skips_sink() {
        let (logger, writes) = memory_logger(LogMode::Yaml);

        let output = logger.info_dry("dry run").await.unwrap();
        assert!(output.as_text().unwrap().starts_with("- type: info\n"));
        assert!(writes.lock().is_empty());
        assert_eq!(logger.metrics().dry_call_count(), 1);
    }

    #[tokio::test]
    async fn test_config_is_read_on_every_call() {
        let (logger, writes) = memory_logger(LogMode::PlainText);

        logger.info("first").await.unwrap();
        {
            let config = logger.config();
            let mut config = config.write();
            config.mode = LogMode::Json;
            config.path = LogPath::literal("/tmp/app.json");
        }
        logger.info("second").await.unwrap();

        let writes = writes.lock();
        assert_eq!(writes[1].0, PathBuf::from("/tmp/app.json"));
        let parsed: serde_json::Value = serde_json::from_str(&writes[1].1).unwrap();
        assert_eq!(parsed["message"], "second");
    }

    #[tokio::test]
    async fn test_sink_failure_propagates() {
        let logger = Logger::builder()
            .path("/tmp/app.txt")
            .console(false)
            .sink(FailingSink)
            .build();

        let err = logger.info("lost").await.unwrap_err();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert_eq!(logger.metrics().failed_count(), 1);
    }

    #[tokio::test]
    async fn test_default_path_follows_mode() {
        let dir = tempdir().expect("Failed to create temp dir");
        let sink = MemorySink::default();
        let writes = Arc::clone(&sink.writes);
        let logger = Logger::builder()
            .mode(LogMode::Yaml)
            .root_dir(dir.path())
            .console(false)
            .sink(sink)
            .build();

        logger.info("x").await.unwrap();

        let writes = writes.lock();
        assert!(writes[0].0.starts_with(dir.path().join("logs")));
        assert_eq!(writes[0].0.extension().and_then(|e| e.to_str()), Some("yml"));
    }
}
