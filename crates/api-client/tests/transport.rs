use api_client::auth::sign_payload;
use api_client::{ApiClient, ApiError, BinanceClient, FUTURES_ACCOUNT_PATH};
use configuration::HttpConfig;
use core_types::QueryParams;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const KEY: &str = "KEY123";
const SECRET: &str = "SECRET456";

/// A request as the local server saw it.
#[derive(Debug, Clone)]
struct SeenRequest {
    method: String,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl SeenRequest {
    fn parse(head: &str) -> Self {
        let mut lines = head.split("\r\n");
        let mut request_line = lines.next().unwrap_or_default().split(' ');
        let method = request_line.next().unwrap_or_default().to_string();
        let target = request_line.next().unwrap_or_default();
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();
        Self {
            method,
            path: path.to_string(),
            query,
            headers,
        }
    }

    fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// Serves one scripted `(status, body)` per connection, then stops accepting.
async fn serve(script: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<SeenRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        for (status, body) in script {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            log.lock()
                .unwrap()
                .push(SeenRequest::parse(&String::from_utf8_lossy(&buf)));

            let response = format!(
                "HTTP/1.1 {} Scripted\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (base_url, seen)
}

fn client(max_retries: u32) -> BinanceClient {
    BinanceClient::new(&HttpConfig {
        timeout_secs: 5,
        max_retries,
        retry_backoff_ms: 20,
    })
    .unwrap()
}

async fn get(client: &BinanceClient, base_url: &str) -> Result<serde_json::Value, ApiError> {
    client
        .get_signed(base_url, FUTURES_ACCOUNT_PATH, QueryParams::new(), KEY, SECRET)
        .await
}

#[tokio::test]
async fn api_key_travels_in_header_and_query_is_signed() {
    let (base_url, seen) = serve(vec![(200, r#"{"ok":1}"#)]).await;

    let body = get(&client(0), &base_url).await.unwrap();
    assert_eq!(body, json!({"ok": 1}));

    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, FUTURES_ACCOUNT_PATH);
    assert_eq!(request.header("x-mbx-apikey"), Some(KEY));

    let keys: Vec<_> = request.query.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["timestamp", "signature"]);
    assert!(request.query.iter().all(|(_, v)| v != KEY));

    let timestamp = request.query_value("timestamp").unwrap();
    assert_eq!(
        request.query_value("signature").unwrap(),
        sign_payload(SECRET, &format!("timestamp={}", timestamp))
    );
}

#[tokio::test]
async fn server_error_is_retried_with_fresh_signature() {
    let (base_url, seen) = serve(vec![
        (500, r#"{"code":-1000,"msg":"An unknown error occurred"}"#),
        (200, r#"{"ok":1}"#),
    ])
    .await;

    let body = get(&client(2), &base_url).await.unwrap();
    assert_eq!(body, json!({"ok": 1}));

    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert_ne!(
        requests[0].query_value("timestamp"),
        requests[1].query_value("timestamp")
    );
    assert_ne!(
        requests[0].query_value("signature"),
        requests[1].query_value("signature")
    );
    assert!(requests.iter().all(|r| r.header("x-mbx-apikey") == Some(KEY)));
}

#[tokio::test]
async fn rate_limit_is_retried() {
    let (base_url, seen) = serve(vec![
        (429, r#"{"code":-1003,"msg":"Too many requests"}"#),
        (200, "[]"),
    ])
    .await;

    let body = get(&client(1), &base_url).await.unwrap();
    assert_eq!(body, json!([]));
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn client_error_maps_to_status_without_retry() {
    let (base_url, seen) = serve(vec![
        (401, r#"{"code":-2015,"msg":"Invalid API-key, IP, or permissions for action."}"#),
        (200, r#"{"ok":1}"#),
    ])
    .await;

    let err = get(&client(2), &base_url).await.unwrap_err();
    match err {
        ApiError::Status {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 401);
            assert_eq!(code, Some(-2015));
            assert!(message.contains("Invalid API-key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn retries_stop_at_the_configured_bound() {
    let (base_url, seen) = serve(vec![(503, "unavailable"), (503, "unavailable"), (200, "{}")]).await;

    let err = get(&client(1), &base_url).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, code: None, .. }));
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn non_json_success_body_is_a_deserialization_error() {
    let (base_url, seen) = serve(vec![(200, "<html>maintenance</html>")]).await;

    let err = get(&client(2), &base_url).await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialization(_)));
    assert_eq!(seen.lock().unwrap().len(), 1);
}
