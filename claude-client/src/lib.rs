//! # claude-client — Anthropic messages API facade
//!
//! A thin, explicit client for the `/v1/messages` endpoint:
//!   - **Single-shot completions** via [`Client::messages`]
//!   - **Streamed completions** via [`Client::stream`] — a lazy, pull-based
//!     sequence of text fragments
//!   - **Explicit configuration** — the credential and endpoint live in a
//!     [`ClientConfig`] passed to the client, never in process-wide state
//!
//! The facade performs exactly one outbound call per operation. There is no
//! retry, no backoff, and no state retained between calls; callers that want
//! those wrap the client themselves.

pub mod client;
pub mod config;
pub mod error;
pub mod stream;
pub mod types;

pub use client::Client;
pub use config::ClientConfig;
pub use error::ApiError;
pub use stream::MessageStream;
pub use types::{ContentBlock, Message, MessageRequest, MessagesResponse, Role, Usage};
