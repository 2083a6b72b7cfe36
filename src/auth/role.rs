//! Marketplace roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Account role. Selects the UI variant and the API path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Player,
    Scout,
    Coach,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Player, Role::Scout, Role::Coach];

    /// Lowercase name, also the API path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Scout => "scout",
            Role::Coach => "coach",
        }
    }

    /// Capitalized name for headings.
    pub fn title(self) -> &'static str {
        match self {
            Role::Player => "Player",
            Role::Scout => "Scout",
            Role::Coach => "Coach",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(Role::Player),
            "scout" => Ok(Role::Scout),
            "coach" => Ok(Role::Coach),
            other => Err(ClientError::InvalidRole(other.to_string())),
        }
    }
}
