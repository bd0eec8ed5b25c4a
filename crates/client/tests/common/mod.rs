//! A minimal mock HTTP server built on tokio that returns canned responses
//! and hands back what it received.

#![allow(dead_code)]

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use vitrine_client::{MemoryStorage, RejectionPolicy, VitrineClient};

/// One request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Captured {
    /// Header lookup, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

pub struct MockServer {
    listener: TcpListener,
    pub base_url: String,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{port}");
        Self { listener, base_url }
    }

    /// Answer the given responses in order, one connection each, then stop.
    pub fn respond(self, responses: Vec<(u16, String)>) -> JoinHandle<Vec<Captured>> {
        tokio::spawn(async move {
            let mut captured = Vec::with_capacity(responses.len());
            for (status, body) in responses {
                let (mut stream, _) = self.listener.accept().await.unwrap();
                captured.push(read_request(&mut stream).await);

                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {len}\r\n\
                     Connection: close\r\n\
                     \r\n\
                     {body}",
                    reason = reason(status),
                    len = body.len(),
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            captured
        })
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Status",
    }
}

async fn read_request(stream: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split(' ');
    let method = parts.next().unwrap_or_default().to_owned();
    let path = parts.next().unwrap_or_default().to_owned();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok());
    let chunked = headers
        .iter()
        .any(|(k, v)| k.eq_ignore_ascii_case("transfer-encoding") && v.contains("chunked"));

    let mut body = buf[header_end..].to_vec();
    if let Some(len) = content_length {
        while body.len() < len {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }
    } else if chunked {
        while find(&body, b"0\r\n\r\n").is_none() {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }
    }

    Captured {
        method,
        path,
        headers,
        body,
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

pub const LOGIN_OK: &str = r#"{"success":true,"message":"Login successful","data":{"id":"1","name":"A","email":"a@b.com","role":"admin","token":"tok123"}}"#;

pub const IDENTITY_JSON: &str =
    r#"{"id":"1","name":"A","email":"a@b.com","role":"admin","token":"tok123"}"#;

pub fn ok(data: &serde_json::Value) -> String {
    serde_json::json!({"success": true, "data": data}).to_string()
}

/// A client against `base_url` backed by `storage`, already restored.
pub fn client(base_url: &str, storage: Arc<MemoryStorage>) -> VitrineClient {
    client_with_policy(base_url, storage, RejectionPolicy::default())
}

pub fn client_with_policy(
    base_url: &str,
    storage: Arc<MemoryStorage>,
    policy: RejectionPolicy,
) -> VitrineClient {
    let client = VitrineClient::builder(base_url)
        .storage(storage)
        .rejection_policy(policy)
        .build()
        .expect("client builds");
    client.session().restore();
    client
}

/// Storage that already holds the `tok123` session.
pub fn logged_in_storage() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::with_entries([
        (vitrine_client::storage::TOKEN_KEY, "tok123"),
        (vitrine_client::storage::IDENTITY_KEY, IDENTITY_JSON),
    ]))
}
