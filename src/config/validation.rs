//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and URL shapes.
//! Returns every problem found, not just the first.

use std::fmt;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.api.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "api.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("api.base_url", e.to_string())),
    }

    let retries = &config.retries;
    if retries.max_retries > 10 {
        errors.push(ValidationError::new("retries.max_retries", "must be at most 10"));
    }
    if retries.base_timeout_ms == 0 {
        errors.push(ValidationError::new("retries.base_timeout_ms", "must be greater than 0"));
    }
    if retries.max_delay_ms < retries.base_delay_ms {
        errors.push(ValidationError::new(
            "retries.max_delay_ms",
            "must not be smaller than base_delay_ms",
        ));
    }
    if !(0.0..=1.0).contains(&retries.jitter_ratio) {
        errors.push(ValidationError::new("retries.jitter_ratio", "must be between 0.0 and 1.0"));
    }

    check_templates("endpoints.profile_read", &config.endpoints.profile_read, &mut errors);
    check_templates("endpoints.profile_update", &config.endpoints.profile_update, &mut errors);

    let upload = &config.upload;
    if upload.max_files == 0 {
        errors.push(ValidationError::new("upload.max_files", "must be greater than 0"));
    }
    if upload.max_size_mb == 0 || upload.picture_max_size_mb == 0 {
        errors.push(ValidationError::new("upload.max_size_mb", "size limits must be greater than 0"));
    }
    if upload.chunk_size == 0 {
        errors.push(ValidationError::new("upload.chunk_size", "must be greater than 0"));
    }
    for ty in &upload.accepted_types {
        if !ty.starts_with("image/") {
            errors.push(ValidationError::new(
                "upload.accepted_types",
                format!("'{}' is not an image type", ty),
            ));
        }
    }

    if config.session.path.trim().is_empty() {
        errors.push(ValidationError::new("session.path", "must not be empty"));
    }

    if config.backend.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new("backend.bind_address", "must be host:port"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_templates(field: &'static str, templates: &[String], errors: &mut Vec<ValidationError>) {
    if templates.is_empty() {
        errors.push(ValidationError::new(field, "needs at least one candidate"));
    }
    for template in templates {
        if !template.starts_with("{base}") && !template.starts_with("http") {
            errors.push(ValidationError::new(
                field,
                format!("'{}' must start with {{base}} or an absolute URL", template),
            ));
        }
    }
}
