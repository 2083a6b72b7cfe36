//! Client SDK for the football talent marketplace.
//!
//! # Architecture Overview
//!
//! ```text
//!   talent CLI / embedding app
//!        │
//!        ▼
//!   ┌─────────┐   ┌─────────┐   ┌──────────────────────────────┐
//!   │  views  │◀──│  auth   │◀──│ session (token, user, role)  │
//!   │ (pages) │   │ (guard) │   │   MemoryStore / FileStore    │
//!   └─────────┘   └─────────┘   └──────────────▲───────────────┘
//!                                              │
//!   ┌─────────┐   ┌──────────────────────────┐ │
//!   │  forms  │──▶│ api::TalentClient        │─┘
//!   └─────────┘   │  probe → fetch → retry   │──────▶ Backend REST API
//!                 │  upload (multipart)      │        (or backend:: stub)
//!                 └──────────────────────────┘
//!
//!   Cross-cutting: config, error, observability, resilience, lifecycle
//! ```

// Client
pub mod api;
pub mod auth;
pub mod forms;
pub mod session;
pub mod upload;
pub mod views;

// Development backend
pub mod backend;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use api::TalentClient;
pub use auth::{Role, Route};
pub use config::AppConfig;
pub use error::{ClientError, ErrorClass, Result};
pub use lifecycle::Shutdown;
pub use session::{Session, User};
