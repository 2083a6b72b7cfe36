//! Resilient HTTP fetch.
//!
//! # Responsibilities
//! - Send a request under a growing per-attempt deadline
//! - Retry transport failures with exponential backoff
//! - Turn responses into JSON or a classified [`ClientError`]

use reqwest::{Client, Method, Request, Response};
use serde_json::Value;

use crate::config::RetryConfig;
use crate::error::{ClientError, Result};
use crate::observability::metrics;
use crate::resilience::{retry_with_backoff, with_timeout, RetryPolicy};

/// HTTP executor with timeout and retry.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
    idempotent_only: bool,
}

impl HttpFetcher {
    pub fn new(config: &RetryConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("talent-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &RetryConfig) -> Self {
        Self {
            client,
            policy: RetryPolicy::from_config(config),
            idempotent_only: config.idempotent_only,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Schedule used for `method`.
    pub fn policy_for(&self, method: &Method) -> RetryPolicy {
        if self.idempotent_only && !is_idempotent(method) {
            self.policy.single_attempt()
        } else {
            self.policy.clone()
        }
    }

    /// Send `request`, retrying transport failures.
    ///
    /// Any HTTP response is returned as-is, whatever its status.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let method = request.method().clone();
        let url = request.url().to_string();
        let label = format!("{method} {url}");
        let policy = self.policy_for(&method);

        retry_with_backoff(&policy, &label, |attempt| {
            let client = self.client.clone();
            let url = url.clone();
            let method = method.clone();
            let cloned = request.try_clone();
            async move {
                let req = cloned.ok_or_else(|| {
                    ClientError::Request(format!("{method} {url}: body cannot be resent"))
                })?;
                tracing::debug!(
                    method = %method,
                    url = %url,
                    attempt = attempt.index + 1,
                    timeout_ms = attempt.timeout.as_millis() as u64,
                    "Sending request"
                );
                let result = with_timeout(attempt.timeout, &url, client.execute(req)).await;
                let outcome = match &result {
                    Ok(_) => "response",
                    Err(ClientError::Timeout { .. }) => "timeout",
                    Err(_) => "error",
                };
                metrics::record_fetch_attempt(method.as_str(), outcome);
                result
            }
        })
        .await
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS
    )
}

/// Read a JSON body from `response`.
///
/// Non-2xx becomes [`ClientError::Status`] carrying the backend's `message`
/// field, or `fallback` when there is none. An empty or non-JSON 2xx body is
/// a [`ClientError::Parse`].
pub async fn read_json(url: &str, response: Response, fallback: &str) -> Result<Value> {
    let text = read_body(url, response, fallback).await?;

    if text.trim().is_empty() {
        return Err(ClientError::Parse {
            url: url.to_string(),
            reason: "empty response body".to_string(),
        });
    }

    serde_json::from_str(&text).map_err(|e| ClientError::Parse {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Like [`read_json`] for calls whose 2xx body is ignored.
pub async fn ensure_success(url: &str, response: Response, fallback: &str) -> Result<()> {
    read_body(url, response, fallback).await.map(|_| ())
}

async fn read_body(url: &str, response: Response, fallback: &str) -> Result<String> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ClientError::from_reqwest(url, e))?;

    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            message: backend_message(&text).unwrap_or_else(|| fallback.to_string()),
        });
    }
    Ok(text)
}

/// The `message` field of a JSON error body.
pub fn backend_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
