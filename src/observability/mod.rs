//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stderr (human or JSON lines)
//!     → Prometheus scrape (dev backend only, opt-in)
//! ```
//!
//! # Design Decisions
//! - Errors are logged, never persisted; the user sees a toast
//! - Tokens and passwords are never logged

pub mod logging;
pub mod metrics;
