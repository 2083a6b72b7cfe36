//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! talent.toml (optional)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc with the client and the dev backend
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so a missing or partial file is fine
//! - Environment variables override the file (TALENT_API_URL, ...)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::AppConfig;
pub use schema::{
    ApiConfig, BackendConfig, EndpointConfig, ObservabilityConfig, RetryConfig, SessionConfig,
    UploadConfig,
};
