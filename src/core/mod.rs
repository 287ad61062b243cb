//! Core logger types and traits

pub mod config;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod severity;
pub mod value;

pub use config::{default_path, LogMode, LogPath, LoggerConfig, PathFn, SharedConfig};
pub use error::{LoggerError, Result};
pub use logger::{LogOutput, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use record::{LogRecord, TIMESTAMP_FORMAT};
pub use severity::Severity;
pub use value::{format_value, inspect, LogValue, SharedArray, SharedObject};
