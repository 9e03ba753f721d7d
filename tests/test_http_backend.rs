//! HttpPredictor against a canned local HTTP server.

use std::time::Duration;

use ghost_edit::config::defaults::default_settings;
use ghost_edit::config::{BackendSettings, ResolvedSettings};
use ghost_edit::diff::DiffOperation;
use ghost_edit::error::PredictionError;
use ghost_edit::prediction::{EditorState, HttpPredictor, Predictor};
use ghost_edit::text::{CURSOR_MARKER, Selection};
use serde_json::{Value, json};
use serial_test::serial;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A request as seen by the fake server.
struct Captured {
    head: String,
    body: Value,
}

async fn read_request(stream: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().unwrap())
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body");
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = serde_json::from_slice(&buf[header_end..header_end + content_length]).unwrap();
    Captured { head, body }
}

/// Serve one request with the given status line and body.
async fn serve_once(status: &'static str, body: String) -> (Url, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        captured
    });

    (Url::parse(&format!("http://{addr}/v1")).unwrap(), handle)
}

fn settings(base_url: Url, api_key_env: Option<&str>) -> BackendSettings {
    BackendSettings {
        base_url,
        api_key_env: api_key_env.map(str::to_string),
        ..ResolvedSettings::try_from(default_settings()).unwrap().backend
    }
}

fn completion(text: &str) -> String {
    json!({"output": {"content": [{"text": text}]}}).to_string()
}

#[tokio::test]
async fn successful_completion_becomes_prediction() {
    let raw = format!("<|INTENT|> close the call <|EDIT_START|>\nfoo({CURSOR_MARKER});\n<|EDIT_END|>");
    let (base_url, server) = serve_once("200 OK", completion(&raw)).await;
    let predictor = HttpPredictor::new(settings(base_url, None)).unwrap();

    let state = EditorState::new("foo", Selection::cursor(3), 7);
    let prediction = predictor
        .predict(&state, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(prediction.intent.as_deref(), Some("close the call"));
    assert_eq!(prediction.old_text, format!("foo{CURSOR_MARKER}"));
    assert_eq!(prediction.new_text, format!("foo({CURSOR_MARKER});"));
    assert_eq!((prediction.from, prediction.to, prediction.version), (0, 3, 7));
    assert_eq!(
        prediction.operation(),
        DiffOperation::Add {
            position: 3,
            text: "();".to_string(),
        }
    );

    let request = server.await.unwrap();
    assert!(request.head.starts_with("POST /v1/completions "));
    assert!(!request.head.to_ascii_lowercase().contains("authorization:"));
    assert_eq!(request.body["model"], "zeta");
    assert_eq!(request.body["messages"][0]["role"], "user");
    let content = request.body["messages"][0]["content"].as_str().unwrap();
    assert!(content.contains(&format!("foo{CURSOR_MARKER}")));
}

#[tokio::test]
#[serial(api_key_env)]
async fn api_key_is_sent_as_bearer_token() {
    const VAR: &str = "GHOST_EDIT_TEST_API_KEY";
    // SAFETY: serialized with other tests touching this variable
    unsafe {
        std::env::set_var(VAR, "secret-token");
    }

    let (base_url, server) = serve_once("200 OK", completion("x")).await;
    let predictor = HttpPredictor::new(settings(base_url, Some(VAR))).unwrap();
    predictor
        .predict(
            &EditorState::new("x", Selection::cursor(0), 1),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    // SAFETY: same as above
    unsafe {
        std::env::remove_var(VAR);
    }

    let request = server.await.unwrap();
    assert!(
        request
            .head
            .to_ascii_lowercase()
            .contains("authorization: bearer secret-token")
    );
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let (base_url, _server) = serve_once("500 Internal Server Error", "boom".to_string()).await;
    let predictor = HttpPredictor::new(settings(base_url, None)).unwrap();

    let err = predictor
        .predict(
            &EditorState::new("x", Selection::cursor(0), 1),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        PredictionError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn body_without_completion_text_is_malformed() {
    let (base_url, _server) = serve_once("200 OK", json!({"output": {}}).to_string()).await;
    let predictor = HttpPredictor::new(settings(base_url, None)).unwrap();

    let err = predictor
        .predict(
            &EditorState::new("x", Selection::cursor(0), 1),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PredictionError::MalformedResponse { .. }));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let (base_url, _server) = serve_once("200 OK", "<html>".to_string()).await;
    let predictor = HttpPredictor::new(settings(base_url, None)).unwrap();

    let err = predictor
        .predict(
            &EditorState::new("x", Selection::cursor(0), 1),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PredictionError::MalformedResponse { .. }));
}

#[tokio::test]
async fn cancellation_aborts_a_hanging_request() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept and read, but never answer
    let _server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = read_request(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(60)).await;
    });

    let base_url = Url::parse(&format!("http://{addr}/v1")).unwrap();
    let predictor = HttpPredictor::new(settings(base_url, None)).unwrap();
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let err = predictor
        .predict(&EditorState::new("x", Selection::cursor(0), 1), &cancel)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
}
