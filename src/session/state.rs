//! The signed-in session.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::auth::Role;
use crate::error::{ClientError, Result};
use crate::session::store::{FileStore, KeyValueStore, MemoryStore, StoreError};
use crate::session::user::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const ROLE_KEY: &str = "userRole";
pub const DEMO_USER_KEY: &str = "demoUser";

/// Token plus cached user over a [`KeyValueStore`].
///
/// Cloning shares the underlying store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("role", &self.role())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn open_file(path: impl AsRef<Path>) -> std::result::Result<Self, StoreError> {
        Ok(Self::new(Arc::new(FileStore::open(path)?)))
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// True iff a token is stored. Tokens are never checked for expiry.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The cached user, present only alongside a token.
    ///
    /// A stored user that no longer parses logs the session out.
    pub fn user(&self) -> Option<User> {
        self.token()?;
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Stored user is unreadable, clearing session");
                if let Err(e) = self.store.clear(&[TOKEN_KEY, USER_KEY]) {
                    tracing::warn!(error = %e, "Failed to clear unreadable session");
                }
                None
            }
        }
    }

    /// The stored role, falling back to the cached user's role.
    pub fn role(&self) -> Option<Role> {
        self.store
            .get(ROLE_KEY)
            .and_then(|r| r.parse().ok())
            .or_else(|| self.user().map(|u| u.role))
    }

    /// Persist a fresh login.
    pub fn login(&self, user: &User, token: &str) -> Result<()> {
        let json = serde_json::to_string(user).map_err(|e| ClientError::Parse {
            url: USER_KEY.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &json)?;
        self.store.set(ROLE_KEY, user.role.as_str())?;
        tracing::info!(role = %user.role, user_id = %user.id, "Session started");
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.store.clear(&[TOKEN_KEY, USER_KEY, ROLE_KEY])?;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// Merge a profile update into the cached user and persist it.
    pub fn update_user(&self, update: &Value) -> Result<User> {
        let current = self.user().ok_or(ClientError::NotAuthenticated)?;
        let merged = current.merged_with(update).map_err(|e| ClientError::Parse {
            url: USER_KEY.to_string(),
            reason: e.to_string(),
        })?;
        self.save_user(&merged)?;
        Ok(merged)
    }

    pub fn set_profile_picture(&self, url: &str) -> Result<User> {
        self.update_user(&serde_json::json!({ "profilePicture": url }))
    }

    fn save_user(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user).map_err(|e| ClientError::Parse {
            url: USER_KEY.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(USER_KEY, &json)?;
        Ok(())
    }
}
