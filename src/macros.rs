//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their arguments like `format!` and pass the string
//! to the matching logger method. They evaluate to the method's future, so
//! the result has to be awaited.
//!
//! # Examples
//!
//! ```no_run
//! use rust_app_logger::prelude::*;
//! use rust_app_logger::info;
//!
//! # async fn run() -> Result<()> {
//! let logger = Logger::default();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).await?;
//! # Ok(())
//! # }
//! ```

/// Log a formatted message at the given severity.
///
/// # Examples
///
/// ```no_run
/// # use rust_app_logger::prelude::*;
/// # async fn run(logger: Logger) -> Result<()> {
/// use rust_app_logger::log;
/// log!(logger, Severity::Info, "Simple message").await?;
/// log!(logger, Severity::Error, "Error code: {}", 500).await?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, $crate::LogValue::from(format!($($arg)+)), false)
    };
}

/// Log an info message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning message.
///
/// # Examples
///
/// ```no_run
/// # use rust_app_logger::prelude::*;
/// # async fn run(logger: Logger) -> Result<()> {
/// use rust_app_logger::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5).await?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warn, $($arg)+)
    };
}

/// Log an error message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogMode, Logger, Severity};

    fn logger() -> Logger {
        Logger::builder().mode(LogMode::ReturnOnly).build()
    }

    #[tokio::test]
    async fn test_log_macro() {
        let logger = logger();
        let output = log!(logger, Severity::Info, "Formatted: {}", 42).await.unwrap();
        assert_eq!(output.into_record().unwrap().message(), "Formatted: 42");
    }

    #[tokio::test]
    async fn test_severity_macros() {
        let logger = logger();

        let record = info!(logger, "Items: {}", 100).await.unwrap().into_record().unwrap();
        assert_eq!(record.severity(), Severity::Info);

        let record = warn!(logger, "Retry {} of {}", 1, 3).await.unwrap().into_record().unwrap();
        assert_eq!(record.severity(), Severity::Warn);
        assert_eq!(record.message(), "Retry 1 of 3");

        let record = error!(logger, "Code: {}", 500).await.unwrap().into_record().unwrap();
        assert_eq!(record.severity(), Severity::Error);
    }
}
