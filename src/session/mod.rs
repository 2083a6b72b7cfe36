//! Client session subsystem.
//!
//! # Data Flow
//! ```text
//! login response
//!     → state.rs (write token, user JSON, userRole)
//!     → store.rs (MemoryStore or FileStore write-through)
//! profile update / picture upload
//!     → user.rs (merge, keep profilePicture unless replaced)
//!     → state.rs (persist merged user)
//! ```
//!
//! # Design Decisions
//! - Authenticated means "a token is stored"; expiry is the backend's concern
//! - An unreadable cached user ends the session instead of failing callers

pub mod state;
pub mod store;
pub mod user;

pub use state::{Session, DEMO_USER_KEY, ROLE_KEY, TOKEN_KEY, USER_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use user::User;
