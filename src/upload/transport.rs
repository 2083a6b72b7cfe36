//! Multipart upload transport.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use crate::api::fetch::read_json;
use crate::config::UploadConfig;
use crate::error::{ClientError, Result};
use crate::resilience::with_timeout;
use crate::upload::progress::progress_body;
use crate::upload::validate::ImageFile;

/// Response keys a picture URL may come back under.
pub const PICTURE_URL_KEYS: &[&str] = &["url", "profilePictureUrl", "imageUrl"];

/// Sends one file per request as `multipart/form-data`.
///
/// Upload bodies are streamed and cannot be replayed, so there is a single
/// attempt under `upload.timeout_secs`.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
    chunk_size: usize,
    timeout: Duration,
}

impl Uploader {
    pub fn new(client: Client, config: &UploadConfig) -> Self {
        Self {
            client,
            chunk_size: config.chunk_size,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// POST `file` under form field `field` and return the JSON reply.
    pub async fn send<P>(
        &self,
        endpoint: &str,
        field: &'static str,
        file: &ImageFile,
        token: Option<&str>,
        on_progress: P,
    ) -> Result<Value>
    where
        P: Fn(u8) + Send + 'static,
    {
        let body = progress_body(file, self.chunk_size, on_progress);
        let part = Part::stream_with_length(body, file.size())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ClientError::Request(e.to_string()))?;
        let form = Form::new().part(field, part);

        let mut request = self.client.post(endpoint).multipart(form);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(endpoint = %endpoint, file = %file.name, bytes = file.size(), "Uploading file");
        let response = with_timeout(self.timeout, endpoint, request.send()).await?;
        read_json(endpoint, response, "Upload failed").await
    }
}

/// First non-empty string under any of `keys`.
pub fn extract_url(reply: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| reply.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_url_order() {
        let reply = json!({"imageUrl": "/c.png", "profilePictureUrl": "/b.png"});
        assert_eq!(extract_url(&reply, PICTURE_URL_KEYS).as_deref(), Some("/b.png"));

        let reply = json!({"url": "", "imageUrl": "/c.png"});
        assert_eq!(extract_url(&reply, PICTURE_URL_KEYS).as_deref(), Some("/c.png"));

        assert_eq!(extract_url(&json!({"ok": true}), PICTURE_URL_KEYS), None);
    }
}
