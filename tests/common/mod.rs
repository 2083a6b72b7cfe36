//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use talent_client::config::AppConfig;

/// What the programmable backend does with a request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with a status and a JSON body.
    Json(u16, String),
    /// Wait before responding.
    Delayed(Duration, u16, String),
    /// Close the connection without answering.
    Drop,
}

impl Reply {
    pub fn ok(body: serde_json::Value) -> Self {
        Reply::Json(200, body.to_string())
    }

    pub fn status(status: u16, body: serde_json::Value) -> Self {
        Reply::Json(status, body.to_string())
    }

    pub fn not_found() -> Self {
        Reply::Json(404, String::new())
    }
}

/// `METHOD /path` of every request the backend has seen, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

impl RequestLog {
    fn push(&self, line: String) {
        self.0.lock().unwrap().push(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// Start a mock backend on an ephemeral port. `handler` maps
/// `(method, path)` to a [`Reply`].
pub async fn start_programmable_backend<F>(handler: F) -> (SocketAddr, RequestLog)
where
    F: Fn(&str, &str) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = RequestLog::default();
    let handler = Arc::new(handler);

    let seen = log.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let handler = handler.clone();
            let seen = seen.clone();
            tokio::spawn(async move {
                let Some((method, path)) = read_request(&mut socket).await else {
                    return;
                };
                seen.push(format!("{method} {path}"));
                match handler(&method, &path) {
                    Reply::Json(status, body) => write_response(&mut socket, status, &body).await,
                    Reply::Delayed(wait, status, body) => {
                        tokio::time::sleep(wait).await;
                        write_response(&mut socket, status, &body).await;
                    }
                    Reply::Drop => {}
                }
            });
        }
    });

    (addr, log)
}

async fn read_request(socket: &mut TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut request_line = head.lines().next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some((method, path))
}

async fn write_response(socket: &mut TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Client config pointed at `addr` with fast retries.
pub fn fast_config(addr: SocketAddr) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.base_url = format!("http://{addr}/api");
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 100;
    config.retries.base_timeout_ms = 2_000;
    config.retries.timeout_step_ms = 0;
    config
}
