//! Request and response bodies.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::Role;
use crate::session::User;

pub const REGISTERED_MESSAGE: &str = "Account created successfully! Please login.";
pub const DEMO_REGISTERED_MESSAGE: &str = "Backend not available. Created demo account successfully!";

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterOutcome {
    pub message: String,
    /// The backend was unreachable and a local demo account was made instead.
    pub demo: bool,
}

/// Where a loaded profile came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    Remote { url: String },
    /// The backend could not be read; the cached user is shown.
    Cached { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProfile {
    pub user: User,
    pub source: ProfileSource,
}

impl LoadedProfile {
    pub fn is_cached(&self) -> bool {
        matches!(self.source, ProfileSource::Cached { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureOutcome {
    pub url: String,
    /// Upload failed and an inline data URL was stored instead.
    pub demo: bool,
}

/// The profile object inside a backend reply.
///
/// Replies may wrap it as `{user: ...}`, `{profile: ...}` or `{data: ...}`;
/// a bare object is used as is, minus any `message`.
pub fn profile_payload(reply: Value) -> Value {
    let Value::Object(mut map) = reply else {
        return Value::Object(Map::new());
    };
    for key in ["user", "profile", "data"] {
        if let Some(Value::Object(inner)) = map.remove(key) {
            return Value::Object(inner);
        }
    }
    map.remove("message");
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_payload_unwraps() {
        assert_eq!(
            profile_payload(json!({"message": "ok", "user": {"bio": "x"}})),
            json!({"bio": "x"})
        );
        assert_eq!(profile_payload(json!({"data": {"age": 17}})), json!({"age": 17}));
        assert_eq!(
            profile_payload(json!({"message": "Updated", "bio": "y"})),
            json!({"bio": "y"})
        );
        assert_eq!(profile_payload(json!([1, 2])), json!({}));
    }

    #[test]
    fn test_register_body_shape() {
        let body = RegisterRequest {
            email: "a@b.co",
            password: "secret123",
            role: Role::Scout,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"email": "a@b.co", "password": "secret123", "role": "scout"})
        );
    }
}
