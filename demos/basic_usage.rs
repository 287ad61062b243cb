//! Basic logger usage example
//!
//! Demonstrates the three severities, dry calls and return-only mode.
//!
//! Run with: cargo run --example basic_usage

use rust_app_logger::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust App Logger - Basic Usage Example ===\n");

    let temp_dir = std::env::temp_dir().join("rust_app_logger_basic");
    let logger = Logger::builder()
        .mode(LogMode::PlainText)
        .path(temp_dir.join("basic.txt"))
        .build();

    println!("1. Logging at each severity:");
    logger.info("This is an info message").await?;
    logger.warn("This is a warning message").await?;
    logger.error("This is an error message").await?;

    println!("\n2. Logging structured values:");
    let request = LogValue::object([
        ("method", LogValue::from("GET")),
        ("path", LogValue::from("/health")),
        ("status", LogValue::from(200)),
    ]);
    logger.info(request).await?;

    let node = LogValue::object([("name", "node")]);
    node.insert("parent", node.clone());
    logger.info(node).await?;

    println!("\n3. Dry call, rendered but not written:");
    let output = logger.warn_dry("Preview only").await?;
    print!("   {}", output.as_text().unwrap_or_default());

    println!("\n4. Return-only mode:");
    logger.config().write().mode = LogMode::ReturnOnly;
    if let Some(record) = logger.error("Not rendered").await?.into_record() {
        println!("   {} {} {}", record.timestamp_str(), record.severity(), record.message());
    }

    println!("\n=== Example completed successfully! ===");
    println!("Log written to {}", temp_dir.join("basic.txt").display());

    Ok(())
}
