//! In-memory account, token and upload tables for the development backend.

use std::sync::Arc;

use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::auth::Role;

const TOKEN_LEN: usize = 40;

/// A registered account.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub role: Role,
    /// Plain text; accounts never leave process memory.
    pub password: String,
    /// Everything the user has saved beyond the core fields.
    pub profile: Map<String, Value>,
}

impl Account {
    /// Public JSON representation; never includes the password.
    pub fn to_json(&self) -> Value {
        let mut map = self.profile.clone();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        map.insert("email".to_string(), Value::String(self.email.clone()));
        map.insert("role".to_string(), Value::String(self.role.as_str().to_string()));
        Value::Object(map)
    }
}

/// A stored file.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("User already exists")]
    AlreadyExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
}

/// Shared backend state. Cloning shares the tables.
#[derive(Debug, Clone, Default)]
pub struct BackendState {
    inner: Arc<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    accounts: DashMap<String, Account>,
    by_email: DashMap<(Role, String), String>,
    tokens: DashMap<String, String>,
    files: DashMap<String, StoredFile>,
}

impl BackendState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, role: Role, email: &str, password: &str) -> Result<Account, AccountError> {
        let key = (role, email.to_ascii_lowercase());
        let id = Uuid::new_v4().to_string();

        match self.inner.by_email.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => return Err(AccountError::AlreadyExists),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        let account = Account {
            id: id.clone(),
            email: email.to_string(),
            role,
            password: password.to_string(),
            profile: Map::new(),
        };
        self.inner.accounts.insert(id, account.clone());
        Ok(account)
    }

    /// Check credentials and issue a bearer token.
    pub fn login(&self, role: Role, email: &str, password: &str) -> Result<(String, Account), AccountError> {
        let id = self
            .inner
            .by_email
            .get(&(role, email.to_ascii_lowercase()))
            .map(|r| r.value().clone())
            .ok_or(AccountError::InvalidCredentials)?;
        let account = self.account(&id).ok_or(AccountError::InvalidCredentials)?;
        if account.password != password {
            return Err(AccountError::InvalidCredentials);
        }

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        self.inner.tokens.insert(token.clone(), id);
        Ok((token, account))
    }

    /// Account owning `token`.
    pub fn authenticate(&self, token: &str) -> Option<Account> {
        let id = self.inner.tokens.get(token)?.value().clone();
        self.account(&id)
    }

    pub fn account(&self, id: &str) -> Option<Account> {
        self.inner.accounts.get(id).map(|r| r.value().clone())
    }

    /// Merge `fields` into the account's profile. Core fields stay fixed.
    pub fn update_profile(&self, id: &str, fields: Map<String, Value>) -> Result<Account, AccountError> {
        let mut entry = self.inner.accounts.get_mut(id).ok_or(AccountError::NotFound)?;
        for (key, value) in fields {
            if matches!(key.as_str(), "id" | "role" | "password") {
                continue;
            }
            if key == "email" {
                if let Some(email) = value.as_str().filter(|e| !e.is_empty()) {
                    let old_key = (entry.role, entry.email.to_ascii_lowercase());
                    let new_key = (entry.role, email.to_ascii_lowercase());
                    // an address taken by another account is ignored
                    if old_key != new_key && !self.inner.by_email.contains_key(&new_key) {
                        self.inner.by_email.remove(&old_key);
                        self.inner.by_email.insert(new_key, entry.id.clone());
                        entry.email = email.to_string();
                    }
                }
                continue;
            }
            entry.profile.insert(key, value);
        }
        Ok(entry.clone())
    }

    /// Keep a file and return the path it is served under.
    pub fn store_file(&self, file_name: Option<&str>, file: StoredFile) -> String {
        let name = match file_name.and_then(safe_name) {
            Some(name) => format!("{}-{}", Uuid::new_v4(), name),
            None => Uuid::new_v4().to_string(),
        };
        self.inner.files.insert(name.clone(), file);
        format!("/uploads/{name}")
    }

    pub fn file(&self, name: &str) -> Option<StoredFile> {
        self.inner.files.get(name).map(|r| r.value().clone())
    }

    pub fn account_count(&self) -> usize {
        self.inner.accounts.len()
    }
}

fn safe_name(name: &str) -> Option<String> {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_login_authenticate() {
        let state = BackendState::new();
        let account = state.register(Role::Coach, "Boss@FC.com", "password1").unwrap();
        assert_eq!(
            state.register(Role::Coach, "boss@fc.com", "other").unwrap_err(),
            AccountError::AlreadyExists
        );
        // same email, other role is a separate account
        assert!(state.register(Role::Scout, "boss@fc.com", "password1").is_ok());

        assert_eq!(
            state.login(Role::Coach, "boss@fc.com", "wrong").unwrap_err(),
            AccountError::InvalidCredentials
        );
        let (token, logged_in) = state.login(Role::Coach, "boss@fc.com", "password1").unwrap();
        assert_eq!(token.len(), TOKEN_LEN);
        assert_eq!(logged_in.id, account.id);
        assert_eq!(state.authenticate(&token).unwrap().id, account.id);
        assert!(state.authenticate("nope").is_none());
    }

    #[test]
    fn test_update_profile_protects_core_fields() {
        let state = BackendState::new();
        let account = state.register(Role::Player, "p@x.io", "password1").unwrap();
        let fields = json!({"role": "coach", "id": "hijack", "bio": "fast", "email": "new@x.io"});
        let Value::Object(fields) = fields else { unreachable!() };

        let updated = state.update_profile(&account.id, fields).unwrap();
        let body = updated.to_json();
        assert_eq!(body["role"], "player");
        assert_eq!(body["id"], account.id.as_str());
        assert_eq!(body["bio"], "fast");
        assert_eq!(body["email"], "new@x.io");
        assert!(body.get("password").is_none());
    }

    #[test]
    fn test_store_file_sanitizes_name() {
        let state = BackendState::new();
        let path = state.store_file(
            Some("../../etc/passwd"),
            StoredFile {
                content_type: "image/png".into(),
                bytes: vec![1],
            },
        );
        assert!(path.starts_with("/uploads/"));
        assert!(!path["/uploads/".len()..].contains('/'));
        let name = &path["/uploads/".len()..];
        assert!(state.file(name).is_some());
    }
}
