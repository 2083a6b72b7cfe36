//! Backend API subsystem.
//!
//! # Data Flow
//! ```text
//! TalentClient operation (login, load_profile, ...)
//!     → probe.rs (profile calls: expand candidate URLs, try in order)
//!     → fetch.rs (timeout + retry via resilience/)
//!     → read_json (status, backend message, body parse)
//!     → session/ (persist token, user, merged profile)
//! ```
//!
//! # Design Decisions
//! - HTTP errors carry the backend's `message` so callers can show it
//! - Profile reads degrade to cached data; writes never do
//! - Demo fallbacks only run when `demo_mode` is on

pub mod client;
pub mod demo;
pub mod fetch;
pub mod probe;
pub mod types;

pub use client::TalentClient;
pub use demo::DemoUser;
pub use fetch::{read_json, HttpFetcher};
pub use probe::{expand_templates, probe_json};
pub use types::{LoadedProfile, PictureOutcome, ProfileSource, RegisterOutcome};
