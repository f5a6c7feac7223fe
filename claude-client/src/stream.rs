//! Lazy, pull-based consumption of streamed responses.
//!
//! The service delivers streamed completions as server-sent events: blocks of
//! `event:` / `data:` lines separated by a blank line. [`MessageStream`]
//! exposes them as a single-pass sequence of text fragments — the consumer
//! drives progress by awaiting [`MessageStream::next`], and the call suspends
//! until a fragment arrives or the service signals completion.

use serde::Deserialize;

use crate::error::{classify_wire_error, ApiError, Result};

/// A lazy sequence of text fragments from a streamed completion.
///
/// Single-pass and non-restartable. The sequence ends when the service sends
/// its stop event; a failure mid-stream surfaces from [`MessageStream::next`]
/// at the point of retrieval, with the same error kinds as a single-shot
/// call. Dropping the value — including dropping it early, before the stream
/// is exhausted — closes the underlying connection; no cancel signal is sent
/// to the service.
pub struct MessageStream {
    response: Option<reqwest::Response>,
    buffer: Vec<u8>,
    done: bool,
}

impl std::fmt::Debug for MessageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageStream")
            .field("done", &self.done)
            .field("buffered_bytes", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

impl MessageStream {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self {
            response: Some(response),
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Pull the next text fragment.
    ///
    /// Returns `Ok(None)` once the stream is exhausted; every call after
    /// that returns `Ok(None)` as well.
    ///
    /// # Errors
    ///
    /// [`ApiError::Network`] if the connection drops mid-stream,
    /// [`ApiError::Parse`] for an undecodable event payload, and the mapped
    /// taxonomy error when the service emits an `error` event. After an
    /// error the stream is finished.
    pub async fn next(&mut self) -> Result<Option<String>> {
        loop {
            if self.done {
                return Ok(None);
            }

            while let Some(block) = take_event_block(&mut self.buffer) {
                match interpret(&parse_event(&block)) {
                    Parsed::Fragment(text) => return Ok(Some(text)),
                    Parsed::Stop => {
                        self.finish();
                        return Ok(None);
                    }
                    Parsed::Failed(err) => {
                        self.finish();
                        return Err(err);
                    }
                    Parsed::Skip => {}
                }
            }

            let Some(response) = self.response.as_mut() else {
                return Ok(None);
            };
            match response.chunk().await {
                Ok(Some(bytes)) => self.buffer.extend_from_slice(&bytes),
                // EOF without a stop event: the service closed the stream.
                Ok(None) => {
                    self.finish();
                    return Ok(None);
                }
                Err(err) => {
                    self.finish();
                    return Err(err.into());
                }
            }
        }
    }

    /// Mark the stream finished and release the connection.
    fn finish(&mut self) {
        self.done = true;
        self.response = None;
    }
}

/// One parsed server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SseEvent {
    name: String,
    data: String,
}

/// What an event means for the consumer.
#[derive(Debug)]
enum Parsed {
    /// Yield this text fragment.
    Fragment(String),
    /// End of stream.
    Stop,
    /// Structural or keep-alive event; keep pulling.
    Skip,
    /// The service reported an error mid-stream.
    Failed(ApiError),
}

/// Split one complete event block (terminated by a blank line) off the front
/// of `buffer`. Returns `None` while the block is still incomplete.
///
/// Both LF and CRLF framing are accepted, per the SSE grammar.
fn take_event_block(buffer: &mut Vec<u8>) -> Option<String> {
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|p| (p, 2));
    let crlf = buffer
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|p| (p, 4));
    let (pos, len) = match (lf, crlf) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    let block: Vec<u8> = buffer.drain(..pos + len).collect();
    Some(String::from_utf8_lossy(&block).into_owned())
}

/// Parse the `event:` and `data:` lines of a block. Multiple data lines are
/// joined with newlines, per the SSE framing rules.
fn parse_event(block: &str) -> SseEvent {
    let mut name = String::new();
    let mut data_lines: Vec<&str> = Vec::new();

    for line in block.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(value) = line.strip_prefix("event:") {
            name = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("data:") {
            data_lines.push(value.strip_prefix(' ').unwrap_or(value));
        }
    }

    SseEvent {
        name,
        data: data_lines.join("\n"),
    }
}

/// Payload of a `content_block_delta` event.
#[derive(Debug, Deserialize)]
struct DeltaEvent {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Payload of an `error` event.
#[derive(Debug, Deserialize)]
struct StreamErrorEvent {
    error: StreamErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StreamErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

fn interpret(event: &SseEvent) -> Parsed {
    match event.name.as_str() {
        "content_block_delta" => {
            let parsed: DeltaEvent = match serde_json::from_str(&event.data) {
                Ok(parsed) => parsed,
                Err(err) => return Parsed::Failed(ApiError::Parse(err.to_string())),
            };
            if parsed.delta.kind == "text_delta" {
                Parsed::Fragment(parsed.delta.text.unwrap_or_default())
            } else {
                Parsed::Skip
            }
        }
        "message_stop" => Parsed::Stop,
        "error" => match serde_json::from_str::<StreamErrorEvent>(&event.data) {
            Ok(parsed) => Parsed::Failed(classify_wire_error(
                &parsed.error.kind,
                parsed.error.message,
            )),
            Err(err) => Parsed::Failed(ApiError::Parse(err.to_string())),
        },
        // message_start, content_block_start/stop, message_delta, ping, …
        _ => Parsed::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_splitting_waits_for_terminator() {
        let mut buffer = b"event: ping\ndata: {\"type\":\"ping\"}".to_vec();
        assert!(take_event_block(&mut buffer).is_none());

        buffer.extend_from_slice(b"\n\nevent: next");
        let block = take_event_block(&mut buffer).expect("complete block");
        assert!(block.starts_with("event: ping"));
        assert_eq!(buffer, b"event: next");
    }

    #[test]
    fn crlf_framed_blocks_split() {
        let mut buffer = b"event: message_stop\r\ndata: {}\r\n\r\nrest".to_vec();
        let block = take_event_block(&mut buffer).expect("complete block");
        assert!(block.starts_with("event: message_stop"));
        assert_eq!(buffer, b"rest");
    }

    #[test]
    fn event_lines_parse() {
        let event = parse_event("event: content_block_delta\ndata: {\"x\":1}\n\n");
        assert_eq!(event.name, "content_block_delta");
        assert_eq!(event.data, "{\"x\":1}");
    }

    #[test]
    fn crlf_lines_parse() {
        let event = parse_event("event: message_stop\r\ndata: {\"type\":\"message_stop\"}\r\n\r\n");
        assert_eq!(event.name, "message_stop");
    }

    #[test]
    fn text_delta_yields_fragment() {
        let event = SseEvent {
            name: "content_block_delta".to_string(),
            data: r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hello"}}"#
                .to_string(),
        };
        match interpret(&event) {
            Parsed::Fragment(text) => assert_eq!(text, "Hello"),
            other => panic!("expected fragment, got {other:?}"),
        }
    }

    #[test]
    fn non_text_delta_is_skipped() {
        let event = SseEvent {
            name: "content_block_delta".to_string(),
            data: r#"{"delta":{"type":"input_json_delta","partial_json":"{"}}"#.to_string(),
        };
        assert!(matches!(interpret(&event), Parsed::Skip));
    }

    #[test]
    fn structural_events_are_skipped() {
        for name in ["message_start", "content_block_start", "content_block_stop", "message_delta", "ping"] {
            let event = SseEvent {
                name: name.to_string(),
                data: "{}".to_string(),
            };
            assert!(matches!(interpret(&event), Parsed::Skip), "{name}");
        }
    }

    #[test]
    fn stop_event_ends_the_stream() {
        let event = SseEvent {
            name: "message_stop".to_string(),
            data: r#"{"type":"message_stop"}"#.to_string(),
        };
        assert!(matches!(interpret(&event), Parsed::Stop));
    }

    #[test]
    fn error_event_maps_to_taxonomy() {
        let event = SseEvent {
            name: "error".to_string(),
            data: r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#
                .to_string(),
        };
        match interpret(&event) {
            Parsed::Failed(ApiError::Service { status, message }) => {
                assert_eq!(status, 529);
                assert_eq!(message, "Overloaded");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }
}
