//! Assess a GitHub repository: fetch metadata via the `gh` CLI, then ask the
//! model for an analysis.
//!
//! Exits non-zero when `gh` is missing or unauthenticated.

use std::process::Command;

use anyhow::{anyhow, bail, Context, Result};
use claude_client::{Client, Message, MessageRequest};
use claude_demos::{init_tracing, DemoConfig};

const DEFAULT_REPO: &str = "anthropics/anthropic-sdk-python";

fn gh(args: &[&str]) -> Result<String> {
    let output = Command::new("gh")
        .args(args)
        .output()
        .map_err(|e| anyhow!("failed to run gh (is the GitHub CLI installed?): {e}"))?;
    if !output.status.success() {
        bail!(
            "gh {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// `owner/repo` from the common GitHub reference shapes.
fn parse_repo(input: &str) -> Option<(String, String)> {
    let trimmed = input
        .strip_prefix("https://github.com/")
        .or_else(|| input.strip_prefix("git@github.com:"))
        .unwrap_or(input)
        .trim_end_matches('/')
        .trim_end_matches(".git");
    let (owner, repo) = trimmed.split_once('/')?;
    (!owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
        .then(|| (owner.to_string(), repo.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = DemoConfig::from_env();
    let client = Client::from_env()?;

    // The companion tool must be present and signed in before anything else.
    gh(&["auth", "status"]).context("GitHub CLI is not authenticated (run `gh auth login`)")?;

    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_REPO.to_string());
    let (owner, repo) =
        parse_repo(&target).ok_or_else(|| anyhow!("invalid repository reference: {target}"))?;

    println!("Fetching repository data for {owner}/{repo}...");
    let repo_data: serde_json::Value =
        serde_json::from_str(&gh(&["api", &format!("repos/{owner}/{repo}")])?)?;
    let commits: serde_json::Value =
        serde_json::from_str(&gh(&["api", &format!("repos/{owner}/{repo}/commits?per_page=10")])?)?;
    let languages: serde_json::Value =
        serde_json::from_str(&gh(&["api", &format!("repos/{owner}/{repo}/languages")])?)?;

    let mut context = format!(
        "Repository: {}\nDescription: {}\nStars: {}\nForks: {}\nPrimary language: {}\nAll languages: {}\nCreated: {}\nLast updated: {}\n\nRecent commits:\n",
        repo_data["full_name"].as_str().unwrap_or(""),
        repo_data["description"].as_str().unwrap_or("No description"),
        repo_data["stargazers_count"],
        repo_data["forks_count"],
        repo_data["language"].as_str().unwrap_or("Not specified"),
        languages
            .as_object()
            .map(|m| m.keys().cloned().collect::<Vec<_>>().join(", "))
            .unwrap_or_default(),
        repo_data["created_at"].as_str().unwrap_or(""),
        repo_data["updated_at"].as_str().unwrap_or(""),
    );
    if let Some(list) = commits.as_array() {
        for (i, commit) in list.iter().take(5).enumerate() {
            let message = commit["commit"]["message"]
                .as_str()
                .unwrap_or("")
                .lines()
                .next()
                .unwrap_or("");
            let author = commit["commit"]["author"]["name"]
                .as_str()
                .unwrap_or("unknown");
            context.push_str(&format!("{}. {message} by {author}\n", i + 1));
        }
    }

    let prompt = format!(
        "Based on this repository data, provide:\n\
         1. A brief assessment of the project's health and activity\n\
         2. What the recent commits suggest about current development focus\n\
         3. Anything notable a prospective contributor should know\n\n\
         {context}"
    );
    let request = MessageRequest::new(&config.model, vec![Message::user(prompt)])
        .with_max_tokens(config.max_tokens);

    println!("\nAnalysis:");
    println!("{}", "=".repeat(60));
    let response = client.messages(&request).await?;
    println!("{}", response.text());
    Ok(())
}
