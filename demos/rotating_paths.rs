//! Dynamic path example
//!
//! The path function runs on every call, so records move to a new file as
//! soon as the function returns a different path. Here each batch of three
//! records lands in its own file.
//!
//! Run with: cargo run --example rotating_paths

use rust_app_logger::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust App Logger - Rotating Paths Example ===\n");

    let log_dir = std::env::temp_dir().join("rust_app_logger_rotating");
    let _ = std::fs::remove_dir_all(&log_dir);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let dir = log_dir.clone();

    let logger = Logger::builder()
        .mode(LogMode::Json)
        .path_fn(move || {
            let batch = counter.fetch_add(1, Ordering::Relaxed) / 3;
            dir.join(format!("batch-{}.json", batch))
        })
        .console(false)
        .build();

    for i in 0..9 {
        logger.info(format!("record {}", i)).await?;
    }

    println!("Path function evaluated {} times", calls.load(Ordering::Relaxed));
    for batch in 0..3 {
        let path = log_dir.join(format!("batch-{}.json", batch));
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| LoggerError::io_operation("reading", &path, e))?;
        let records: Vec<serde_json::Value> = serde_json::from_str(&content)?;
        println!("{}: {} records", path.display(), records.len());
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
