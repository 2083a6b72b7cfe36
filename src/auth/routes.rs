//! Client route table.
//!
//! # Design Decisions
//! - Role segments stay raw strings so an unknown role still resolves to a
//!   route and the page layer can render the invalid-role fallback
//! - Unknown paths parse to `None`; the caller redirects to `/`

use std::fmt;

use crate::auth::Role;

/// A navigable page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Signup { role: Option<Role> },
    Login,
    Dashboard { role: String },
    Profile { role: String },
    ProfileEdit { role: String },
}

impl Route {
    /// Parse a path such as `/dashboard/coach` or `/signup?role=scout`.
    pub fn parse(raw: &str) -> Option<Route> {
        let (path, query) = match raw.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (raw, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Landing),
            ["login"] => Some(Route::Login),
            ["signup"] => {
                let role = query.and_then(|q| {
                    url::form_urlencoded::parse(q.as_bytes())
                        .find(|(k, _)| k == "role")
                        .and_then(|(_, v)| v.parse().ok())
                });
                Some(Route::Signup { role })
            }
            ["dashboard", role] => Some(Route::Dashboard {
                role: role.to_string(),
            }),
            ["profile", role] => Some(Route::Profile {
                role: role.to_string(),
            }),
            ["profile", role, "edit"] => Some(Route::ProfileEdit {
                role: role.to_string(),
            }),
            _ => None,
        }
    }

    pub fn dashboard(role: Role) -> Route {
        Route::Dashboard {
            role: role.as_str().to_string(),
        }
    }

    pub fn profile(role: Role) -> Route {
        Route::Profile {
            role: role.as_str().to_string(),
        }
    }

    /// Raw role segment of a guarded route.
    pub fn role_segment(&self) -> Option<&str> {
        match self {
            Route::Dashboard { role } | Route::Profile { role } | Route::ProfileEdit { role } => {
                Some(role)
            }
            _ => None,
        }
    }

    pub fn is_guarded(&self) -> bool {
        self.role_segment().is_some()
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Signup { role: None } => "/signup".to_string(),
            Route::Signup { role: Some(r) } => format!("/signup?role={r}"),
            Route::Login => "/login".to_string(),
            Route::Dashboard { role } => format!("/dashboard/{role}"),
            Route::Profile { role } => format!("/profile/{role}"),
            Route::ProfileEdit { role } => format!("/profile/{role}/edit"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
