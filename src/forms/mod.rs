//! Form input and validation.
//!
//! Validation failures are [`crate::error::ClientError::Validation`] values
//! whose text is shown to the user unchanged.

pub mod auth;
pub mod profile;

pub use auth::{is_valid_email, LoginForm, SignupForm};
pub use profile::{fields_for, FieldKind, FieldSpec, ProfileForm};
