//! Text views: pages, dashboards, profiles, notifications.
//!
//! # Data Flow
//! ```text
//! path → pages.rs (parse, guard, role check) → Page
//!     → dashboard.rs / profile.rs / form listing → rendered text
//! ClientError → notify.rs → Toast (stderr)
//! ```

pub mod dashboard;
pub mod notify;
pub mod pages;
pub mod profile;

pub use dashboard::{render_dashboard, Dashboard, StatCard};
pub use notify::{Toast, ToastVariant};
pub use pages::{resolve, Page, Resolution};
pub use profile::{render_profile, ProfileView};

/// Fallback body for an unknown role segment.
pub const INVALID_ROLE: &str = "Invalid role";
