//! File logging example
//!
//! Writes the same records in each file mode and prints the results.
//!
//! Run with: cargo run --example file_logging

use rust_app_logger::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust App Logger - File Logging Example ===\n");

    let log_dir = std::env::temp_dir().join("rust_app_logger_files");

    for (mode, file) in [
        (LogMode::Json, "app.json"),
        (LogMode::Yaml, "app.yml"),
        (LogMode::PlainText, "app.txt"),
    ] {
        let path = log_dir.join(file);
        let _ = std::fs::remove_file(&path);

        let logger = Logger::builder()
            .mode(mode)
            .path(&path)
            .include_stack(mode == LogMode::Yaml)
            .console(false)
            .build();

        logger.info("Application started").await?;
        logger.warn("Disk usage at 85%\nCleanup scheduled").await?;
        logger
            .error(LogValue::object([("code", 500), ("retries", 3)]))
            .await?;

        println!("--- {} ({}) ---", path.display(), mode);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| LoggerError::io_operation("reading", &path, e))?;
        println!("{}", content);
    }

    println!("=== Example completed successfully! ===");
    Ok(())
}
