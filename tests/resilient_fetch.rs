//! Retry, timeout and error classification of the resilient fetch.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use talent_client::api::fetch::{ensure_success, read_json, HttpFetcher};
use talent_client::error::{ClientError, ErrorClass};

mod common;
use common::{fast_config, start_programmable_backend, Reply};

fn get(fetcher: &HttpFetcher, url: &str) -> reqwest::Request {
    fetcher.client().request(Method::GET, url).build().unwrap()
}

#[tokio::test]
async fn test_retries_dropped_connections_then_succeeds() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let (addr, log) = start_programmable_backend(move |_, _| {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            Reply::Drop
        } else {
            Reply::ok(json!({"ok": true}))
        }
    })
    .await;

    let config = fast_config(addr);
    let fetcher = HttpFetcher::new(&config.retries).unwrap();
    let url = format!("http://{addr}/api/health");

    let response = fetcher.execute(get(&fetcher, &url)).await.unwrap();
    let body = read_json(&url, response, "Request failed").await.unwrap();

    assert_eq!(body["ok"], true);
    assert_eq!(log.len(), 3, "two dropped attempts then success");
}

#[tokio::test]
async fn test_gives_up_after_max_retries() {
    let (addr, log) = start_programmable_backend(|_, _| Reply::Drop).await;

    let mut config = fast_config(addr);
    config.retries.max_retries = 2;
    let fetcher = HttpFetcher::new(&config.retries).unwrap();
    let url = format!("http://{addr}/api/health");

    let err = fetcher.execute(get(&fetcher, &url)).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Network);
    assert_eq!(log.len(), 3);
}

#[tokio::test]
async fn test_http_errors_are_not_retried() {
    let (addr, log) =
        start_programmable_backend(|_, _| Reply::status(500, json!({"message": "Database down"})))
            .await;

    let config = fast_config(addr);
    let fetcher = HttpFetcher::new(&config.retries).unwrap();
    let url = format!("http://{addr}/api/health");

    let response = fetcher.execute(get(&fetcher, &url)).await.unwrap();
    let err = read_json(&url, response, "Request failed").await.unwrap_err();

    assert!(matches!(
        &err,
        ClientError::Status { status: 500, message } if message == "Database down"
    ));
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn test_fallback_message_without_backend_message() {
    let (addr, _log) = start_programmable_backend(|_, _| Reply::Json(400, String::new())).await;

    let config = fast_config(addr);
    let fetcher = HttpFetcher::new(&config.retries).unwrap();
    let url = format!("http://{addr}/api/player/register");

    let response = fetcher.execute(get(&fetcher, &url)).await.unwrap();
    let err = ensure_success(&url, response, "Failed to create account")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "HTTP 400: Failed to create account");
}

#[tokio::test]
async fn test_empty_success_body_is_parse_error() {
    let (addr, _log) = start_programmable_backend(|_, _| Reply::Json(200, String::new())).await;

    let config = fast_config(addr);
    let fetcher = HttpFetcher::new(&config.retries).unwrap();
    let url = format!("http://{addr}/api/coach/login");

    let response = fetcher.execute(get(&fetcher, &url)).await.unwrap();
    let err = read_json(&url, response, "Failed to login").await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Parse);
}

#[tokio::test]
async fn test_slow_backend_times_out_each_attempt() {
    let (addr, log) = start_programmable_backend(|_, _| {
        Reply::Delayed(std::time::Duration::from_secs(5), 200, "{}".to_string())
    })
    .await;

    let mut config = fast_config(addr);
    config.retries.max_retries = 1;
    config.retries.base_timeout_ms = 150;
    let fetcher = HttpFetcher::new(&config.retries).unwrap();
    let url = format!("http://{addr}/api/health");

    let err = fetcher.execute(get(&fetcher, &url)).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout { .. }), "{err:?}");
    assert_eq!(
        err.to_string(),
        "Request timeout - the server might be starting up. Please try again."
    );
    assert_eq!(log.len(), 2);
}

#[tokio::test]
async fn test_idempotent_only_sends_post_once() {
    let (addr, log) = start_programmable_backend(|_, _| Reply::Drop).await;

    let mut config = fast_config(addr);
    config.retries.idempotent_only = true;
    let fetcher = HttpFetcher::new(&config.retries).unwrap();
    let url = format!("http://{addr}/api/player/login");

    let request = fetcher
        .client()
        .post(&url)
        .json(&json!({"email": "a@b.co"}))
        .build()
        .unwrap();
    let err = fetcher.execute(request).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Network);
    assert_eq!(log.len(), 1);
}
