//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → retries.rs (attempt loop, growing deadline per attempt)
//!     → timeouts.rs (enforce the attempt's deadline)
//!     → On transport failure: backoff.rs (wait 1s, 2s, 4s, ...) and retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every backend call has a deadline
//! - Only transport failures are retried; any HTTP response is final
//! - All verbs are retried unless `retries.idempotent_only` is set

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use retries::{retry_with_backoff, Attempt, RetryPolicy};
pub use timeouts::with_timeout;
