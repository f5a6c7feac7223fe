//! End-to-end assistant demo: code review, history-aware query, daily
//! summary, then the log stats.

use std::path::Path;

use anyhow::Result;
use claude_client::Client;
use claude_demos::assistant::truncate_chars;
use claude_demos::{init_tracing, Assistant, DemoConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = DemoConfig::from_env();
    let client = Client::from_env()?;
    let assistant = Assistant::open(client, config)?;

    println!("Assistant integration demo");
    println!("{}", "=".repeat(60));

    println!("\n1. Analyzing a source file:");
    println!("{}", "-".repeat(40));
    let analysis = assistant.analyze_file(Path::new(file!())).await?;
    let preview = truncate_chars(&analysis, 500);
    if preview.len() < analysis.len() {
        println!("{preview}...");
    } else {
        println!("{analysis}");
    }

    println!("\n\n2. Query with historical context:");
    println!("{}", "-".repeat(40));
    let answer = assistant
        .intelligent_query("What are best practices for Rust error handling?")
        .await?;
    println!("{answer}");

    println!("\n\n3. Daily summary:");
    println!("{}", "-".repeat(40));
    println!("{}", assistant.daily_summary().await?);

    println!(
        "\n\nTotal interactions stored: {}",
        assistant.store().interaction_count()?
    );
    println!(
        "Database location: {}",
        assistant.store().db_path().display()
    );
    Ok(())
}
