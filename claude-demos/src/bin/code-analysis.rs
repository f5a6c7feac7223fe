//! Ask for a review of a code snippet, or of a file given as the only
//! argument.

use anyhow::Result;
use claude_client::{Client, Message, MessageRequest};
use claude_demos::{init_tracing, prompts, DemoConfig};

const SAMPLE_CODE: &str = r#"def fibonacci(n):
    if n <= 1:
        return n
    else:
        return fibonacci(n-1) + fibonacci(n-2)

# Calculate first 10 fibonacci numbers
for i in range(10):
    print(f"F({i}) = {fibonacci(i)}")
"#;

fn language_of(path: &str) -> &'static str {
    match std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some("rs") => "rust",
        Some("py") => "python",
        Some("js") => "javascript",
        Some("ts") => "typescript",
        Some("go") => "go",
        _ => "text",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = DemoConfig::from_env();
    let client = Client::from_env()?;

    let (code, language) = match std::env::args().nth(1) {
        Some(path) => (std::fs::read_to_string(&path)?, language_of(&path)),
        None => (SAMPLE_CODE.to_string(), "python"),
    };

    println!("Analyzing code sample...");
    println!("{}", "=".repeat(60));

    let user = prompts::render(
        prompts::SNIPPET_ANALYSIS_USER,
        &[("language", language), ("code", code.as_str())],
    );
    let request = MessageRequest::new(&config.model, vec![Message::user(user)])
        .with_max_tokens(2048)
        .with_system(prompts::CODE_REVIEW_SYSTEM);

    let response = client.messages(&request).await?;
    println!("{}", response.text());
    Ok(())
}
