//! Timeout enforcement.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::error::{ClientError, Result};

/// Run an HTTP future under a deadline.
///
/// Elapsed deadlines become [`ClientError::Timeout`]; transport errors become
/// [`ClientError::Network`].
pub async fn with_timeout<T, F>(limit: Duration, url: &str, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, reqwest::Error>>,
{
    match timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) if e.is_timeout() => Err(ClientError::Timeout {
            url: url.to_string(),
            after: limit,
        }),
        Ok(Err(e)) => Err(ClientError::from_reqwest(url, e)),
        Err(_) => {
            tracing::warn!(url = %url, timeout_ms = limit.as_millis() as u64, "Request timed out");
            Err(ClientError::Timeout {
                url: url.to_string(),
                after: limit,
            })
        }
    }
}
