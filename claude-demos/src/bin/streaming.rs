//! Streaming demo: print fragments as they arrive.

use std::io::Write;

use anyhow::Result;
use claude_client::{Client, Message, MessageRequest};
use claude_demos::{init_tracing, DemoConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = DemoConfig::from_env();
    let client = Client::from_env()?;

    println!("Asking Claude to write a story (streaming)...");
    println!("{}", "-".repeat(50));

    let request = MessageRequest::new(
        &config.model,
        vec![Message::user(
            "Write a short story about a robot learning to paint",
        )],
    )
    .with_max_tokens(500);

    let mut stream = client.stream(&request).await?;
    let mut stdout = std::io::stdout();
    while let Some(fragment) = stream.next().await? {
        print!("{fragment}");
        stdout.flush()?;
    }

    println!();
    println!("{}", "-".repeat(50));
    println!("Stream complete!");
    Ok(())
}
