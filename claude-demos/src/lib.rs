//! # claude-demos — standalone demonstration binaries
//!
//! Each binary under `src/bin/` is a self-contained example against the
//! messages API:
//!   - `basic` — one request, print the reply
//!   - `streaming` — consume a streamed completion fragment by fragment
//!   - `api-check` — verify the credential with a cheap round trip
//!   - `code-analysis` — review a code snippet or file
//!   - `assistant` — history-aware queries backed by the interaction log
//!   - `repo-report` — assess a GitHub repository via the `gh` CLI
//!
//! The binaries take no flags; behavior is controlled by environment
//! variables and the defaults in [`config::DemoConfig`]. Shared pieces live
//! here: the configuration, the prompt templates, and the assistant that
//! ties the client to the interaction log.

pub mod assistant;
pub mod config;
pub mod prompts;

pub use assistant::Assistant;
pub use config::DemoConfig;

/// Install the tracing subscriber for the demo binaries.
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
