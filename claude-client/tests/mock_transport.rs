//! Integration tests against a canned-response mock transport.
//!
//! A local TCP listener plays the role of the inference service, so these
//! tests exercise the real request path (serialization, headers, status
//! mapping, SSE framing) without a credential or network access.

use claude_client::{ApiError, Client, ClientConfig, Message, MessageRequest};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Spawn a listener that serves one canned response per accepted connection.
async fn spawn_mock(responses: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        for response in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            read_request(&mut socket).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.flush().await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}")
}

/// Read one HTTP request (headers plus content-length body) off the socket.
async fn read_request(socket: &mut TcpStream) {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
        if let Some(header_end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&data[..header_end]);
            let content_length = headers
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }
}

fn json_response(status_line: &str, extra_headers: &[(&str, &str)], body: &str) -> String {
    let mut response = format!(
        "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
        body.len()
    );
    for (name, value) in extra_headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str("\r\n");
    response.push_str(body);
    response
}

fn sse_response(events: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{events}",
        events.len()
    )
}

fn test_client(base_url: &str) -> Client {
    let config = ClientConfig::new("sk-ant-test-0123456789abcd").with_base_url(base_url);
    Client::new(config).expect("client")
}

const HELLO_TEXT: &str = "Hello, API is working!";

fn hello_body() -> String {
    format!(
        r#"{{"id":"msg_01","type":"message","role":"assistant","model":"claude-3-haiku-20240307","content":[{{"type":"text","text":"{HELLO_TEXT}"}}],"stop_reason":"end_turn","usage":{{"input_tokens":20,"output_tokens":8}}}}"#
    )
}

fn hello_stream_events() -> String {
    [
        (
            "message_start",
            r#"{"type":"message_start","message":{"id":"msg_02","type":"message","role":"assistant","model":"claude-3-haiku-20240307","content":[],"usage":{"input_tokens":20,"output_tokens":1}}}"#.to_string(),
        ),
        (
            "content_block_start",
            r#"{"type":"content_block_start","index":0,"content_block":{"type":"text","text":""}}"#.to_string(),
        ),
        (
            "content_block_delta",
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hello, "}}"#.to_string(),
        ),
        (
            "content_block_delta",
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"API is "}}"#.to_string(),
        ),
        (
            "content_block_delta",
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"working!"}}"#.to_string(),
        ),
        (
            "content_block_stop",
            r#"{"type":"content_block_stop","index":0}"#.to_string(),
        ),
        (
            "message_delta",
            r#"{"type":"message_delta","delta":{"stop_reason":"end_turn"},"usage":{"output_tokens":8}}"#.to_string(),
        ),
        ("message_stop", r#"{"type":"message_stop"}"#.to_string()),
    ]
    .iter()
    .map(|(name, data)| format!("event: {name}\ndata: {data}\n\n"))
    .collect()
}

fn hello_request() -> MessageRequest {
    MessageRequest::new(
        "claude-3-haiku-20240307",
        vec![Message::user(
            "Say 'Hello, API is working!' in exactly 5 words.",
        )],
    )
    .with_max_tokens(50)
}

#[tokio::test]
async fn hello_world_end_to_end() {
    let base = spawn_mock(vec![json_response("200 OK", &[], &hello_body())]).await;
    let client = test_client(&base);

    let response = client.messages(&hello_request()).await.expect("complete");
    assert_eq!(response.text(), HELLO_TEXT);
    assert!(!response.text().is_empty());
    assert_eq!(response.model, "claude-3-haiku-20240307");
    assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
}

#[tokio::test]
async fn unauthorized_maps_to_authentication() {
    let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
    let base = spawn_mock(vec![json_response("401 Unauthorized", &[], body)]).await;
    let client = test_client(&base);

    let err = client
        .messages(&hello_request())
        .await
        .expect_err("401 must fail");
    match err {
        ApiError::Authentication(message) => assert!(message.contains("invalid x-api-key")),
        other => panic!("expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_carries_retry_after() {
    let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"Number of requests has exceeded your rate limit"}}"#;
    let base = spawn_mock(vec![json_response(
        "429 Too Many Requests",
        &[("retry-after", "60")],
        body,
    )])
    .await;
    let client = test_client(&base);

    let err = client
        .messages(&hello_request())
        .await
        .expect_err("429 must fail");
    assert!(matches!(
        err,
        ApiError::RateLimit {
            retry_after: Some(60)
        }
    ));
}

#[tokio::test]
async fn overloaded_maps_to_service() {
    let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
    let base = spawn_mock(vec![json_response("529 Overloaded", &[], body)]).await;
    let client = test_client(&base);

    let err = client
        .messages(&hello_request())
        .await
        .expect_err("529 must fail");
    match err {
        ApiError::Service { status, message } => {
            assert_eq!(status, 529);
            assert_eq!(message, "Overloaded");
        }
        other => panic!("expected Service, got {other:?}"),
    }
}

#[tokio::test]
async fn streaming_matches_single_shot() {
    let stream_base = spawn_mock(vec![sse_response(&hello_stream_events())]).await;
    let single_base = spawn_mock(vec![json_response("200 OK", &[], &hello_body())]).await;

    let mut stream = test_client(&stream_base)
        .stream(&hello_request())
        .await
        .expect("stream");
    let mut streamed = String::new();
    while let Some(fragment) = stream.next().await.expect("fragment") {
        streamed.push_str(&fragment);
    }
    // Exhausted streams keep reporting the end.
    assert!(stream.next().await.expect("after end").is_none());

    let single = test_client(&single_base)
        .messages(&hello_request())
        .await
        .expect("complete");
    assert_eq!(streamed, single.text());
}

#[tokio::test]
async fn dropping_stream_early_releases_connection() {
    let base = spawn_mock(vec![sse_response(&hello_stream_events())]).await;
    let client = test_client(&base);

    let mut stream = client.stream(&hello_request()).await.expect("stream");
    let first = stream.next().await.expect("first fragment");
    assert_eq!(first.as_deref(), Some("Hello, "));
    // Stop pulling: dropping the stream closes the connection.
    drop(stream);
}

#[tokio::test]
async fn mid_stream_error_surfaces_at_retrieval() {
    let events = format!(
        "event: content_block_delta\ndata: {}\n\nevent: error\ndata: {}\n\n",
        r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"partial"}}"#,
        r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
    );
    let base = spawn_mock(vec![sse_response(&events)]).await;
    let client = test_client(&base);

    let mut stream = client.stream(&hello_request()).await.expect("stream");
    assert_eq!(
        stream.next().await.expect("first").as_deref(),
        Some("partial")
    );
    let err = stream.next().await.expect_err("error event must surface");
    assert!(matches!(err, ApiError::Service { status: 529, .. }));
    // A failed stream is finished.
    assert!(stream.next().await.expect("after error").is_none());
}
