//! History-aware assistant tying the client to the interaction log.
//!
//! Mirrors the control flow of every demo: build a prompt, make one call,
//! consume the result — with the log providing context from past queries and
//! receiving a record of each new one. A failed log write is reported and
//! does not invalidate the completed inference call.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use claude_client::{Client, Message, MessageRequest};
use claude_store::InteractionStore;
use tracing::warn;

use crate::config::DemoConfig;
use crate::prompts;

/// Local assistant: one client, one open interaction log.
pub struct Assistant {
    client: Client,
    store: InteractionStore,
    config: DemoConfig,
}

impl Assistant {
    /// Open the interaction log at the configured path (creating parent
    /// directories as needed) and wrap it with the client.
    ///
    /// # Errors
    ///
    /// Fails when the log directory cannot be created or the database
    /// cannot be opened.
    pub fn open(client: Client, config: DemoConfig) -> Result<Self> {
        let db_path = config.resolved_db_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let store = InteractionStore::open(&db_path)?;
        Ok(Self {
            client,
            store,
            config,
        })
    }

    /// The underlying interaction log.
    #[must_use]
    pub fn store(&self) -> &InteractionStore {
        &self.store
    }

    /// Answer a query, feeding related past interactions in as context and
    /// recording the new pair afterwards.
    ///
    /// # Errors
    ///
    /// Returns the client's error when the call itself fails. Log failures
    /// are reported via `warn!` and swallowed — the completed response is
    /// still returned.
    pub async fn intelligent_query(&self, query: &str) -> Result<String> {
        let context = self.historical_context(query);
        let prompt = if context.is_empty() {
            query.to_string()
        } else {
            prompts::render(
                prompts::HISTORY_CONTEXT_USER,
                &[("context", context.as_str()), ("query", query)],
            )
        };

        let request = MessageRequest::new(&self.config.model, vec![Message::user(prompt.as_str())])
            .with_max_tokens(self.config.max_tokens);
        let response = self.client.messages(&request).await?;
        let text = response.text();

        let estimate = estimate_tokens(&prompt) + estimate_tokens(&text);
        let stored_context = (!context.is_empty()).then_some(context.as_str());
        if let Err(err) = self
            .store
            .record_interaction(query, &text, stored_context, estimate)
        {
            warn!(error = %err, "failed to record interaction");
        }

        Ok(text)
    }

    /// Read a source file and ask for a review; the result is appended to
    /// the code-review log with any parseable quality score.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or the call fails.
    pub async fn analyze_file(&self, path: &Path) -> Result<String> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let display = path.display().to_string();

        let user = prompts::render(
            prompts::FILE_ANALYSIS_USER,
            &[("file_path", display.as_str()), ("content", content.as_str())],
        );
        let request = MessageRequest::new(&self.config.model, vec![Message::user(user)])
            .with_max_tokens(2048)
            .with_system(prompts::CODE_REVIEW_SYSTEM);

        let response = self.client.messages(&request).await?;
        let analysis = response.text();

        let score = parse_score(&analysis);
        if let Err(err) = self.store.record_code_review(&display, &analysis, "", score) {
            warn!(error = %err, "failed to record code review");
        }

        Ok(analysis)
    }

    /// Summarize today's logged activity through the model.
    ///
    /// # Errors
    ///
    /// Fails when the log cannot be read or the call fails.
    pub async fn daily_summary(&self) -> Result<String> {
        let summary = self.store.summarize(Utc::now().date_naive())?;
        let average = summary
            .average_score
            .map_or_else(|| "n/a".to_string(), |s| format!("{s:.1}"));
        let recent = summary
            .recent_queries
            .iter()
            .take(5)
            .map(|q| format!("- {}", truncate_chars(q, 80)))
            .collect::<Vec<_>>()
            .join("\n");

        let data = format!(
            "Today's activity:\n\
             - Total interactions: {}\n\
             - Tokens used: {}\n\
             - Code reviews: {}\n\
             - Average code score: {average}\n\n\
             Recent queries:\n{recent}",
            summary.interactions, summary.tokens_used, summary.reviews,
        );

        let user = prompts::render(prompts::DAILY_SUMMARY_USER, &[("activity_data", data.as_str())]);
        let request = MessageRequest::new(&self.config.model, vec![Message::user(user)])
            .with_max_tokens(512)
            .with_temperature(0.7);

        let response = self.client.messages(&request).await?;
        Ok(response.text())
    }

    /// Format related past interactions as a context block, or an empty
    /// string when there is no usable history.
    fn historical_context(&self, query: &str) -> String {
        let history = match self.store.find_related(query, self.config.history_limit) {
            Ok(history) => history,
            Err(err) => {
                warn!(error = %err, "history lookup failed");
                return String::new();
            }
        };
        if history.is_empty() {
            return String::new();
        }

        let mut context = String::from("Previous related queries:\n");
        for record in &history {
            context.push_str(&format!("Q: {}...\n", truncate_chars(&record.query, 100)));
            context.push_str(&format!("A: {}...\n\n", truncate_chars(&record.response, 200)));
        }
        context
    }
}

/// Whitespace token estimate — the same accounting the log has always held.
#[must_use]
pub fn estimate_tokens(text: &str) -> i64 {
    text.split_whitespace().count() as i64
}

/// First `limit` characters of `text` (whole characters, not bytes).
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Extract an `N/10` quality score from a free-text analysis.
///
/// Returns `None` when nothing parseable is present: an unscorable analysis
/// stores no score rather than a fake zero, so daily averages only cover
/// real assessments.
#[must_use]
pub fn parse_score(analysis: &str) -> Option<i64> {
    for (idx, _) in analysis.match_indices("/10") {
        let digits: String = analysis[..idx]
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .chars()
            .rev()
            .collect();
        if digits.is_empty() {
            continue;
        }
        if let Ok(score) = digits.parse::<i64>() {
            if (0..=10).contains(&score) {
                return Some(score);
            }
        }
    }
    None
}
