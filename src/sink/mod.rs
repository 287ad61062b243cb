//! Durable destinations for rendered records

pub mod console;
pub mod file;

pub use console::ConsoleSink;
pub use file::FileSink;

use crate::core::Result;
use crate::serializers::ModeSerializer;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Destination that persists rendered records
///
/// # Example
///
/// ```no_run
/// use rust_app_logger::core::Result;
/// use rust_app_logger::serializers::ModeSerializer;
/// use rust_app_logger::sink::Sink;
/// use async_trait::async_trait;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// struct DiscardSink;
///
/// #[async_trait]
/// impl Sink for DiscardSink {
///     async fn write(
///         &self,
///         _path: &Path,
///         _serializer: Arc<dyn ModeSerializer>,
///         _rendered: &str,
///     ) -> Result<()> {
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "discard"
///     }
/// }
/// ```
#[async_trait]
pub trait Sink: Send + Sync {
    /// Persist `rendered` at `path` using the serializer's merge protocol
    async fn write(
        &self,
        path: &Path,
        serializer: Arc<dyn ModeSerializer>,
        rendered: &str,
    ) -> Result<()>;

    fn name(&self) -> &str;
}
