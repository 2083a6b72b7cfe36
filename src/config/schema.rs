//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client,
//! the CLI and the development backend. All types derive Serde traits for
//! deserialization from a TOML file, and every section has defaults so an
//! empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Backend API location.
    pub api: ApiConfig,

    /// Retry, backoff and timeout settings for the resilient fetch.
    pub retries: RetryConfig,

    /// Candidate URL templates for profile read/update.
    pub endpoints: EndpointConfig,

    /// Upload limits.
    pub upload: UploadConfig,

    /// Where the session is persisted.
    pub session: SessionConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Development backend settings.
    pub backend: BackendConfig,

    /// Fabricate successful results when the backend is unreachable.
    pub demo_mode: bool,
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every `{role}/{action}` path is appended to.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api".to_string(),
        }
    }
}

/// Retry configuration.
///
/// Attempt `n` (0-based) gets `base_timeout_ms + n * timeout_step_ms`, and the
/// wait after a failed attempt `n` is `base_delay_ms * 2^n`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt (total attempts = max_retries + 1).
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Timeout of the first attempt in milliseconds.
    pub base_timeout_ms: u64,

    /// Timeout increase per retry in milliseconds.
    pub timeout_step_ms: u64,

    /// Random extra delay as a fraction of each backoff delay (0.0 - 1.0).
    pub jitter_ratio: f64,

    /// Only retry idempotent methods (GET, HEAD, PUT, DELETE, OPTIONS).
    pub idempotent_only: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            base_timeout_ms: 10_000,
            timeout_step_ms: 5_000,
            jitter_ratio: 0.0,
            idempotent_only: false,
        }
    }
}

/// Profile endpoint candidates.
///
/// Templates may use `{base}`, `{role}` and `{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub profile_read: Vec<String>,
    pub profile_update: Vec<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            profile_read: vec![
                "{base}/{role}/profile".to_string(),
                "{base}/{role}/profile/{id}".to_string(),
                "{base}/{role}s/{id}".to_string(),
                "{base}/users/{id}".to_string(),
            ],
            profile_update: vec![
                "{base}/{role}/profile".to_string(),
                "{base}/{role}/profile/{id}".to_string(),
                "{base}/{role}/update-profile".to_string(),
            ],
        }
    }
}

/// Upload limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum files in one bulk selection.
    pub max_files: usize,

    /// Maximum size per bulk file in megabytes.
    pub max_size_mb: u64,

    /// MIME types accepted by bulk upload.
    pub accepted_types: Vec<String>,

    /// Maximum profile picture size in megabytes.
    pub picture_max_size_mb: u64,

    /// Size of the body chunks progress is reported on.
    pub chunk_size: usize,

    /// Per-upload timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_size_mb: 5,
            accepted_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
            ],
            picture_max_size_mb: 5,
            chunk_size: 64 * 1024,
            timeout_secs: 60,
        }
    }
}

/// Session persistence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// JSON file holding the persisted session keys.
    pub path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: ".talent/session.json".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
        }
    }
}

/// Development backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Prometheus exporter address; no exporter when unset.
    pub metrics_address: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            request_timeout_secs: 30,
            max_body_size: 12 * 1024 * 1024, // 12MB
            metrics_address: None,
        }
    }
}
