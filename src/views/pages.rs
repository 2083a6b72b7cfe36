//! Page resolution: path + session → page or redirect.

use crate::auth::{check_access, GuardDecision, Role, Route};
use crate::forms::ProfileForm;
use crate::session::Session;
use crate::views::dashboard::Dashboard;
use crate::views::profile::ProfileView;
use crate::views::INVALID_ROLE;

/// A page ready to show.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Landing,
    Signup { role: Option<Role> },
    Login,
    Dashboard(Dashboard),
    Profile(ProfileView),
    ProfileEdit(ProfileForm),
    InvalidRole,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Render(Page),
    Redirect(Route),
}

/// Resolve `path` for the current session.
///
/// Guarded pages check authentication first, then the role segment, then
/// that the segment matches the signed-in role.
pub fn resolve(path: &str, session: &Session) -> Resolution {
    let Some(route) = Route::parse(path) else {
        return Resolution::Redirect(Route::Landing);
    };

    let segment = match &route {
        Route::Landing => return Resolution::Render(Page::Landing),
        Route::Login => return Resolution::Render(Page::Login),
        Route::Signup { role } => return Resolution::Render(Page::Signup { role: *role }),
        Route::Dashboard { role } | Route::Profile { role } | Route::ProfileEdit { role } => role,
    };

    if !session.is_authenticated() {
        return Resolution::Redirect(Route::Login);
    }

    let Ok(role) = segment.parse::<Role>() else {
        return Resolution::Render(Page::InvalidRole);
    };

    if let GuardDecision::Redirect(to) = check_access(session, Some(role)) {
        return Resolution::Redirect(to);
    }

    let user = session.user();
    let page = match (&route, user) {
        (Route::Dashboard { .. }, user) => Page::Dashboard(Dashboard::new(role, user.as_ref())),
        (Route::Profile { .. }, Some(user)) => Page::Profile(ProfileView::from_user(&user)),
        (Route::ProfileEdit { .. }, Some(user)) => Page::ProfileEdit(ProfileForm::for_user(&user)),
        // token without a cached user
        _ => return Resolution::Redirect(Route::Login),
    };
    Resolution::Render(page)
}

impl Page {
    pub fn render(&self) -> String {
        match self {
            Page::Landing => [
                "Football Talent Platform",
                "",
                "  Players:  /signup?role=player",
                "  Scouts:   /signup?role=scout",
                "  Coaches:  /signup?role=coach",
                "  Sign in:  /login",
                "",
            ]
            .join("\n"),
            Page::Signup { role } => {
                let preset = role.map(|r| format!(" --role {r}")).unwrap_or_default();
                format!("Create your account\n\n  talent signup --email <email>{preset}\n")
            }
            Page::Login => "Sign in\n\n  talent login --email <email> --role <role>\n".to_string(),
            Page::Dashboard(dashboard) => dashboard.render(),
            Page::Profile(view) => view.render(),
            Page::ProfileEdit(form) => {
                let mut out = format!("Edit {} Profile\n\n", form.role().title());
                for spec in crate::forms::fields_for(form.role()) {
                    let value = form.get(spec.name).unwrap_or("");
                    let marker = if spec.required { "*" } else { " " };
                    out.push_str(&format!("  {}{:<20} {:<22} {}\n", marker, spec.name, spec.label, value));
                }
                out.push_str("\n  talent profile edit --set <field>=<value>\n");
                out
            }
            Page::InvalidRole => INVALID_ROLE.to_string(),
        }
    }
}
