//! Verify the API credential with a cheap round trip.
//!
//! Exits 0 when the credential works, 1 otherwise.

use std::process::ExitCode;

use claude_client::{Client, ClientConfig, Message, MessageRequest};
use claude_demos::{init_tracing, DemoConfig};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    println!("Claude API check");
    println!("================");

    match run().await {
        Ok(()) => {
            println!("\nNext steps:");
            println!("1. Try the demos: cargo run --bin basic");
            println!("2. Build something with the client crate");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("\nAPI check failed: {err}");
            eprintln!("\nPossible issues:");
            eprintln!("1. Invalid API key");
            eprintln!("2. No credits on the account");
            eprintln!("3. Network connection problems");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // Configuration problems surface here, before any network call.
    let config = ClientConfig::from_env()?;
    println!("Key found: {}", config.redacted_key());

    let client = Client::new(config)?;
    let demo = DemoConfig::from_env();

    println!("\nTesting the API connection...");
    // Haiku keeps the verification call cheap.
    let request = MessageRequest::new(
        &demo.haiku_model,
        vec![Message::user(
            "Say 'Hello, API is working!' in exactly 5 words.",
        )],
    )
    .with_max_tokens(50);

    let response = client.messages(&request).await?;
    println!("\nAPI response: {}", response.text());
    println!("\nEverything is working. The client is ready to use.");
    Ok(())
}
