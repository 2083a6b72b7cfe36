//! Client error types.
//!
//! Every failure the client can surface is one [`ClientError`]. Callers that
//! only care about the broad category use [`ClientError::class`].

use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::session::store::StoreError;
use crate::upload::validate::UploadRejection;

/// Broad error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transport failure or timeout. Retryable.
    Network,
    /// The backend answered with a non-2xx status.
    Http,
    /// The backend answered 2xx but the body was empty or not the expected JSON.
    Parse,
    /// Rejected locally before any request was made.
    Client,
}

/// Errors that can occur while talking to the marketplace backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not complete within its per-attempt deadline.
    #[error("Request timeout - the server might be starting up. Please try again.")]
    Timeout { url: String, after: Duration },

    /// Connection refused, reset, DNS failure and similar.
    #[error("Network error calling {url}: {reason}")]
    Network { url: String, reason: String },

    /// Non-2xx response. `message` is the backend's `message` field when present.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Empty or malformed response body.
    #[error("Invalid response from {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Form validation failure, already worded for the user.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Upload(#[from] UploadRejection),

    #[error("No endpoint candidates configured for {0}")]
    NoCandidates(&'static str),

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build request: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Category of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            ClientError::Timeout { .. } | ClientError::Network { .. } => ErrorClass::Network,
            ClientError::Status { .. } => ErrorClass::Http,
            ClientError::Parse { .. } => ErrorClass::Parse,
            _ => ErrorClass::Client,
        }
    }

    /// Whether the retry loop may try again after this error.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Network
    }

    /// HTTP status for [`ClientError::Status`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_builder() {
            return ClientError::Request(err.to_string());
        }
        ClientError::Network {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
