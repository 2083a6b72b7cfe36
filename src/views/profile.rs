//! Profile pages.

use std::fmt::Write;

use crate::api::ProfileSource;
use crate::auth::Role;
use crate::forms::fields_for;
use crate::session::User;
use crate::views::INVALID_ROLE;

pub const NOT_PROVIDED: &str = "Not provided";

/// A read-only profile listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub role: Role,
    pub rows: Vec<(&'static str, String)>,
    pub picture: Option<String>,
    /// Set when the backend could not be read.
    pub cached_reason: Option<String>,
}

impl ProfileView {
    pub fn from_user(user: &User) -> Self {
        let rows = fields_for(user.role)
            .iter()
            .map(|spec| {
                let value = user
                    .field(spec.name)
                    .unwrap_or_else(|| NOT_PROVIDED.to_string());
                (spec.label, value)
            })
            .collect();
        Self {
            role: user.role,
            rows,
            picture: user.profile_picture.clone(),
            cached_reason: None,
        }
    }

    pub fn with_source(mut self, source: &ProfileSource) -> Self {
        if let ProfileSource::Cached { reason } = source {
            self.cached_reason = Some(reason.clone());
        }
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} Profile", self.role.title());
        if let Some(reason) = &self.cached_reason {
            let _ = writeln!(out, "(showing cached data: {reason})");
        }
        out.push('\n');
        let picture = match &self.picture {
            Some(url) if url.starts_with("data:") => "inline image",
            Some(url) => url.as_str(),
            None => NOT_PROVIDED,
        };
        let _ = writeln!(out, "  {:<22} {}", "Profile Picture", picture);
        for (label, value) in &self.rows {
            let _ = writeln!(out, "  {label:<22} {value}");
        }
        out
    }
}

/// Render the profile of `user` under a raw role segment.
pub fn render_profile(role: &str, user: &User) -> String {
    match role.parse::<Role>() {
        Ok(_) => ProfileView::from_user(user).render(),
        Err(_) => INVALID_ROLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn player() -> User {
        serde_json::from_value(json!({
            "id": "p1",
            "role": "player",
            "fullName": "Kofi Mensah",
            "email": "kofi@academy.gh",
            "position": "midfielder"
        }))
        .unwrap()
    }

    #[test]
    fn test_blank_fields_not_provided() {
        let view = ProfileView::from_user(&player());
        let phone = view.rows.iter().find(|(l, _)| *l == "Phone Number").unwrap();
        assert_eq!(phone.1, NOT_PROVIDED);
        let position = view.rows.iter().find(|(l, _)| *l == "Position").unwrap();
        assert_eq!(position.1, "midfielder");
    }

    #[test]
    fn test_cached_note() {
        let view = ProfileView::from_user(&player()).with_source(&ProfileSource::Cached {
            reason: "HTTP 500: boom".into(),
        });
        assert!(view.render().contains("(showing cached data: HTTP 500: boom)"));
    }

    #[test]
    fn test_invalid_role() {
        assert_eq!(render_profile("fan", &player()), "Invalid role");
        assert!(render_profile("player", &player()).starts_with("Player Profile"));
    }
}
