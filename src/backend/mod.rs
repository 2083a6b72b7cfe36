//! Development backend.
//!
//! A small in-memory implementation of the marketplace API so the client can
//! be run and tested without the real service. It is not a persistence design.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → server.rs (request ID, trace, timeout, body limit, metrics)
//!     → handlers.rs (role path check, bearer auth, JSON / multipart)
//!     → state.rs (DashMap account, token and file tables)
//! ```

pub mod handlers;
pub mod server;
pub mod state;

pub use server::{spawn, BackendServer, RunningBackend};
pub use state::BackendState;
