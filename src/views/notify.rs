//! Transient user notifications.

use std::fmt;

use crate::error::{ClientError, ErrorClass};

pub const NETWORK_ERROR: &str = "Network error. Please try again.";
pub const INVALID_RESPONSE: &str = "Invalid server response";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Info,
    Success,
    Destructive,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, ToastVariant::Info)
    }

    pub fn success(description: impl Into<String>) -> Self {
        Self::new("Success", description, ToastVariant::Success)
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new("Error", description, ToastVariant::Destructive)
    }

    fn new(title: impl Into<String>, description: impl Into<String>, variant: ToastVariant) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.variant {
            ToastVariant::Info => "info",
            ToastVariant::Success => "ok",
            ToastVariant::Destructive => "error",
        };
        write!(f, "[{marker}] {}: {}", self.title, self.description)
    }
}

impl From<&ClientError> for Toast {
    fn from(err: &ClientError) -> Self {
        match (err.class(), err) {
            (ErrorClass::Network, _) => Toast::error(NETWORK_ERROR),
            (ErrorClass::Http, ClientError::Status { message, .. }) => Toast::error(message.clone()),
            (ErrorClass::Parse, _) => Toast::error(INVALID_RESPONSE),
            (_, ClientError::Upload(rejection)) => Toast::new(
                rejection.title(),
                rejection.to_string(),
                ToastVariant::Destructive,
            ),
            (_, ClientError::NotAuthenticated) => Toast::error("Please log in to continue"),
            _ => Toast::error(err.to_string()),
        }
    }
}
