//! Offline fallbacks used when demo mode is on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::error::{ClientError, Result};
use crate::session::{Session, DEMO_USER_KEY};

/// Local stand-in account created when registration cannot reach the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DemoUser {
    pub fn new(email: &str, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis().to_string(),
            email: email.to_string(),
            role,
            name: email.split('@').next().unwrap_or_default().to_string(),
            profile_picture: None,
            created_at: now,
        }
    }
}

/// Create and persist a demo account under `demoUser`.
pub fn store_demo_user(session: &Session, email: &str, role: Role) -> Result<DemoUser> {
    let demo = DemoUser::new(email, role);
    let json = serde_json::to_string(&demo).map_err(|e| ClientError::Parse {
        url: DEMO_USER_KEY.to_string(),
        reason: e.to_string(),
    })?;
    session.store().set(DEMO_USER_KEY, &json)?;
    tracing::warn!(email = %email, role = %role, "Backend unreachable, stored demo account");
    Ok(demo)
}

/// The stored demo account, if any.
pub fn demo_user(session: &Session) -> Option<DemoUser> {
    session
        .store()
        .get(DEMO_USER_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_user_shape() {
        let session = Session::in_memory();
        let demo = store_demo_user(&session, "young.star@club.org", Role::Player).unwrap();
        assert_eq!(demo.name, "young.star");
        assert!(demo.profile_picture.is_none());

        let raw: serde_json::Value =
            serde_json::from_str(&session.store().get(DEMO_USER_KEY).unwrap()).unwrap();
        assert_eq!(raw["role"], "player");
        assert!(raw["profilePicture"].is_null());
        assert!(raw["createdAt"].is_string());

        assert_eq!(demo_user(&session), Some(demo));
        // a demo account is not a login
        assert!(!session.is_authenticated());
    }
}
