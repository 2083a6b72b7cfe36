//! Lifecycle management for the development backend.
//!
//! # Data Flow
//! ```text
//! Ctrl+C or test teardown → Shutdown::trigger
//!     → axum graceful shutdown (stop accepting, finish in-flight requests)
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
