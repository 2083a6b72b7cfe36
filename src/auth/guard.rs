//! Route guard.

use crate::auth::{Role, Route};
use crate::session::Session;

/// Outcome of a guard check. Denial is a redirect, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Decide whether the session may view a page requiring `required`.
///
/// No token redirects to `/login`. A role mismatch redirects to the user's
/// own dashboard, or to `/login` when no role is stored.
pub fn check_access(session: &Session, required: Option<Role>) -> GuardDecision {
    if !session.is_authenticated() {
        tracing::debug!("No token, redirecting to login");
        return GuardDecision::Redirect(Route::Login);
    }

    let Some(required) = required else {
        return GuardDecision::Allow;
    };

    match session.role() {
        Some(actual) if actual == required => GuardDecision::Allow,
        Some(actual) => {
            tracing::debug!(required = %required, actual = %actual, "Role mismatch");
            GuardDecision::Redirect(Route::dashboard(actual))
        }
        None => GuardDecision::Redirect(Route::Login),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ROLE_KEY, User};
    use serde_json::json;

    fn signed_in(role: Role) -> Session {
        let session = Session::in_memory();
        let user: User = serde_json::from_value(json!({"id": "1", "role": role})).unwrap();
        session.login(&user, "tok").unwrap();
        session
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        let session = Session::in_memory();
        assert_eq!(check_access(&session, None), GuardDecision::Redirect(Route::Login));
        assert_eq!(
            check_access(&session, Some(Role::Player)),
            GuardDecision::Redirect(Route::Login)
        );
    }

    #[test]
    fn test_matching_role_allowed() {
        let session = signed_in(Role::Scout);
        assert_eq!(check_access(&session, Some(Role::Scout)), GuardDecision::Allow);
        assert_eq!(check_access(&session, None), GuardDecision::Allow);
    }

    #[test]
    fn test_mismatch_goes_to_own_dashboard() {
        let session = signed_in(Role::Player);
        assert_eq!(
            check_access(&session, Some(Role::Coach)),
            GuardDecision::Redirect(Route::dashboard(Role::Player))
        );
    }

    #[test]
    fn test_missing_role_goes_to_login() {
        let session = Session::in_memory();
        session.store().set("token", "tok").unwrap();
        session.store().remove(ROLE_KEY).unwrap();
        assert_eq!(
            check_access(&session, Some(Role::Coach)),
            GuardDecision::Redirect(Route::Login)
        );
    }
}
