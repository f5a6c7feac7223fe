//! Minimal message-creation demo: one request, print the reply.

use anyhow::Result;
use claude_client::{Client, Message, MessageRequest};
use claude_demos::{init_tracing, DemoConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = DemoConfig::from_env();
    let client = Client::from_env()?;

    let request = MessageRequest::new(
        &config.model,
        vec![Message::user("Tell me a short joke about programming")],
    )
    .with_max_tokens(config.max_tokens);

    let response = client.messages(&request).await?;

    println!("Claude's response:");
    println!("{}", response.text());
    Ok(())
}
