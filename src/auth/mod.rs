//! Authentication and authorization subsystem.
//!
//! # Data Flow
//! ```text
//! path ("/dashboard/coach")
//!     → routes.rs (Route::parse, raw role segment kept)
//!     → guard.rs (token present? stored role matches?)
//!     → Allow, or Redirect(/login | /dashboard/{own role})
//! ```
//!
//! # Design Decisions
//! - Guard failure is a redirect value, never an error
//! - The guard reads only the session; it never calls the backend

pub mod guard;
pub mod role;
pub mod routes;

pub use guard::{check_access, GuardDecision};
pub use role::Role;
pub use routes::Route;
