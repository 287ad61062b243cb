//! File sink
//!
//! Append-only modes use a plain append through `tokio::fs`. Modes that
//! rewrite the file (JSON) read the whole file, merge the new record into it
//! and write everything back, on a blocking task.
//!
//! # Concurrency
//!
//! The rewrite is a read-modify-write sequence. The merged content is written
//! to a temporary file in the same directory and renamed over the log file,
//! so a failed write leaves the previous content in place. With the
//! `file-lock` feature (default) the sequence runs under an exclusive
//! advisory lock on a `<file>.lock` sidecar, which serialises writers that go
//! through this sink, in this or any other process. Writers that bypass the
//! lock can still interleave with it, and without the feature two concurrent
//! calls on the same JSON file may lose records. Appends are not locked.

use super::Sink;
use crate::core::{LoggerError, Result};
use crate::serializers::ModeSerializer;
use async_trait::async_trait;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSink;

impl FileSink {
    pub fn new() -> Self {
        Self
    }

    async fn append(path: &Path, text: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LoggerError::io_operation("creating directory", parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| LoggerError::io_operation("opening", path, e))?;

        file.write_all(text.as_bytes())
            .await
            .map_err(|e| LoggerError::io_operation("appending to", path, e))?;
        file.flush()
            .await
            .map_err(|e| LoggerError::io_operation("flushing", path, e))?;

        Ok(())
    }

    async fn rewrite(
        path: PathBuf,
        serializer: Arc<dyn ModeSerializer>,
        rendered: String,
    ) -> Result<()> {
        tokio::task::spawn_blocking(move || Self::rewrite_blocking(&path, &*serializer, &rendered))
            .await?
    }

    fn rewrite_blocking(path: &Path, serializer: &dyn ModeSerializer, rendered: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| LoggerError::io_operation("creating directory", parent, e))?;
        }

        #[cfg(feature = "file-lock")]
        let lock = Self::lock(path)?;

        let result = Self::merge_into(path, serializer, rendered, Self::write_synced);

        #[cfg(feature = "file-lock")]
        let _ = fs2::FileExt::unlock(&lock);

        result
    }

    /// Take the exclusive lock guarding `path`
    ///
    /// The log file itself is replaced on every rewrite, so the lock lives on
    /// a `<file>.lock` sidecar that stays put.
    #[cfg(feature = "file-lock")]
    fn lock(path: &Path) -> Result<File> {
        let lock_path = Self::lock_path(path);
        let lock = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LoggerError::io_operation("opening", &lock_path, e))?;
        fs2::FileExt::lock_exclusive(&lock)
            .map_err(|e| LoggerError::io_operation("locking", &lock_path, e))?;
        Ok(lock)
    }

    #[cfg(feature = "file-lock")]
    fn lock_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Merge `rendered` into the current content of `path` and replace the
    /// file with the result. An absent file reads as empty.
    fn merge_into<W>(
        path: &Path,
        serializer: &dyn ModeSerializer,
        rendered: &str,
        write: W,
    ) -> Result<()>
    where
        W: FnOnce(&mut File, &[u8]) -> io::Result<()>,
    {
        let existing = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(LoggerError::io_operation("reading", path, e)),
        };

        let merged = serializer.merge(path, &existing, rendered)?;
        Self::replace(path, merged.as_bytes(), write)
    }

    /// Write `contents` to a temporary file next to `path`, then rename it
    /// over `path`. On failure the temporary file is removed and `path` keeps
    /// its previous content.
    fn replace<W>(path: &Path, contents: &[u8], write: W) -> Result<()>
    where
        W: FnOnce(&mut File, &[u8]) -> io::Result<()>,
    {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| LoggerError::io_operation("staging", path, e))?;
        if let Ok(metadata) = std::fs::metadata(path) {
            let _ = staged.as_file().set_permissions(metadata.permissions());
        }
        write(staged.as_file_mut(), contents)
            .map_err(|e| LoggerError::io_operation("rewriting", path, e))?;
        staged
            .persist(path)
            .map_err(|e| LoggerError::io_operation("replacing", path, e.error))?;

        Ok(())
    }

    fn write_synced(file: &mut File, contents: &[u8]) -> io::Result<()> {
        file.write_all(contents)?;
        file.sync_all()
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn write(
        &self,
        path: &Path,
        serializer: Arc<dyn ModeSerializer>,
        rendered: &str,
    ) -> Result<()> {
        if serializer.is_append_only() {
            Self::append(path, rendered).await
        } else {
            Self::rewrite(path.to_path_buf(), serializer, rendered.to_string()).await
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}
