//! Cached user record.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::Role;

/// The signed-in user as cached in the session.
///
/// Role-specific profile fields (location, position, currentTeam, ...) live in
/// `extra` and round-trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "_id", deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub email: String,

    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// String value of a profile field by its wire name.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "id" => Some(self.id.clone()),
            "firstName" => Some(self.first_name.clone()),
            "lastName" => Some(self.last_name.clone()),
            "email" => Some(self.email.clone()),
            "profilePicture" => self.profile_picture.clone(),
            other => self.extra.get(other).and_then(value_to_string),
        };
        value.filter(|v| !v.is_empty())
    }

    /// First name, falling back to the name fields the profile forms use.
    pub fn display_name(&self) -> String {
        if !self.first_name.is_empty() {
            return self.first_name.clone();
        }
        ["fullName", "name", "userName"]
            .iter()
            .find_map(|key| self.field(key))
            .unwrap_or_else(|| "User".to_string())
    }

    /// Merge a profile update into this user.
    ///
    /// New fields override old ones. `profilePicture` keeps its current value
    /// unless the update carries a non-empty one. The role never changes.
    pub fn merged_with(&self, update: &Value) -> Result<User, serde_json::Error> {
        let mut merged = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        if let Value::Object(fields) = update {
            for (key, value) in fields {
                // `_id` and `id` name the same field
                let key = if key == "_id" { "id" } else { key.as_str() };
                merged.insert(key.to_string(), value.clone());
            }
        }

        let picture = update
            .get("profilePicture")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.profile_picture.clone());
        match picture {
            Some(url) => merged.insert("profilePicture".to_string(), Value::String(url)),
            None => merged.remove("profilePicture"),
        };
        merged.insert("role".to_string(), Value::String(self.role.as_str().to_string()));

        serde_json::from_value(Value::Object(merged))
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!("invalid user id: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn player() -> User {
        serde_json::from_value(json!({
            "id": "u1",
            "firstName": "Ada",
            "email": "ada@club.com",
            "role": "player",
            "profilePicture": "/uploads/ada.png",
            "position": "forward",
            "height": 180
        }))
        .unwrap()
    }

    #[test]
    fn test_numeric_and_underscore_ids() {
        let user: User = serde_json::from_value(json!({"id": 42, "role": "coach"})).unwrap();
        assert_eq!(user.id, "42");
        let user: User = serde_json::from_value(json!({"_id": "abc", "role": "scout"})).unwrap();
        assert_eq!(user.id, "abc");
    }

    #[test]
    fn test_field_lookup() {
        let user = player();
        assert_eq!(user.field("position").as_deref(), Some("forward"));
        assert_eq!(user.field("height").as_deref(), Some("180"));
        assert_eq!(user.field("email").as_deref(), Some("ada@club.com"));
        assert_eq!(user.field("lastName"), None);
        assert_eq!(user.field("bio"), None);
    }

    #[test]
    fn test_merge_keeps_picture_when_update_lacks_it() {
        let merged = player()
            .merged_with(&json!({"location": "Lagos", "profilePicture": ""}))
            .unwrap();
        assert_eq!(merged.profile_picture.as_deref(), Some("/uploads/ada.png"));
        assert_eq!(merged.field("location").as_deref(), Some("Lagos"));
        assert_eq!(merged.field("position").as_deref(), Some("forward"));
    }

    #[test]
    fn test_merge_replaces_picture_and_pins_role() {
        let merged = player()
            .merged_with(&json!({"profilePicture": "/uploads/new.png", "role": "coach"}))
            .unwrap();
        assert_eq!(merged.profile_picture.as_deref(), Some("/uploads/new.png"));
        assert_eq!(merged.role, Role::Player);
    }

    #[test]
    fn test_merge_accepts_underscore_id() {
        let merged = player()
            .merged_with(&json!({"_id": "u1", "bio": "Left-footed"}))
            .unwrap();
        assert_eq!(merged.id, "u1");
        assert_eq!(merged.field("bio").as_deref(), Some("Left-footed"));

        let merged = player().merged_with(&json!({"_id": 77})).unwrap();
        assert_eq!(merged.id, "77");
    }

    #[test]
    fn test_display_name_fallbacks() {
        let user: User =
            serde_json::from_value(json!({"role": "scout", "fullName": "Sam Scout"})).unwrap();
        assert_eq!(user.display_name(), "Sam Scout");
        let user: User = serde_json::from_value(json!({"role": "coach"})).unwrap();
        assert_eq!(user.display_name(), "User");
    }
}
