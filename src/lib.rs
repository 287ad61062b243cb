//! # Rust App Logger
//!
//! A small application logger: it accepts arbitrary values, renders them
//! into a record and merges the record into a log file.
//!
//! ## Features
//!
//! - **Any Value**: Strings, primitives and nested containers, including
//!   containers that reference themselves
//! - **Three File Formats**: A JSON array, a YAML sequence, or aligned plain text
//! - **Live Configuration**: Mode and path are read on every call
//! - **Dry Runs**: Render a record without writing it
//!
//! ## Example
//!
//! ```no_run
//! use rust_app_logger::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let logger = Logger::builder()
//!     .mode(LogMode::Json)
//!     .path("logs/app.json")
//!     .build();
//!
//! logger.info("Server started").await?;
//! logger.warn(LogValue::object([("port", 8080)])).await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod macros;
pub mod serializers;
pub mod sink;

pub mod prelude {
    pub use crate::core::{
        LogMode, LogOutput, LogPath, LogRecord, LogValue, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, Result, Severity, SharedConfig,
    };
    pub use crate::serializers::ModeSerializer;
    pub use crate::sink::{ConsoleSink, FileSink, Sink};
}

pub use core::{
    format_value, LogMode, LogOutput, LogPath, LogRecord, LogValue, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, LoggerMetrics, Result, Severity, SharedConfig,
};
pub use serializers::{serializer_for, ModeSerializer};
pub use sink::{ConsoleSink, FileSink, Sink};
