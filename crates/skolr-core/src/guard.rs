// ── Route authorization guard ──
//
// Pure, synchronous decisions: given the session store and a route's
// role allow-list, answer allow / go-sign-in / go-to-your-dashboard.
// The guard never performs I/O and never navigates; callers act on the
// returned decision.

use tracing::debug;

use skolr_api::models::Role;

use crate::session::SessionStore;

/// A navigable destination with its role allow-list.
///
/// An empty allow-list means "any authenticated user".
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub allowed_roles: Vec<Role>,
}

impl Route {
    pub fn new(path: impl Into<String>, allowed_roles: impl Into<Vec<Role>>) -> Self {
        Self {
            path: path.into(),
            allowed_roles: allowed_roles.into(),
        }
    }

    /// A route any signed-in user may visit.
    pub fn authenticated(path: impl Into<String>) -> Self {
        Self::new(path, Vec::new())
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Proceed to the requested route.
    Allow,
    /// Not signed in (or the token expired). `attempted` is the denied
    /// path, also recorded on the store as the post-login target.
    RedirectToLogin { attempted: String },
    /// Signed in but not permitted here; send the user to the dashboard
    /// for their own role instead.
    RedirectToDashboard { role: Role },
}

/// The dashboard path for a role.
pub fn dashboard_path(role: Role) -> String {
    format!("/dashboard/{role}")
}

/// Decide whether the current session may enter `route`.
///
/// Unauthenticated (including expired-token) sessions are sent to login
/// with the attempted path remembered for after sign-in. Authenticated
/// sessions with the wrong role are sent to their own dashboard, never
/// to login.
pub fn authorize(store: &SessionStore, route: &Route) -> GuardDecision {
    if !store.is_authenticated() {
        debug!(path = %route.path, "denied: not authenticated");
        store.set_redirect_target(route.path.clone());
        return GuardDecision::RedirectToLogin {
            attempted: route.path.clone(),
        };
    }

    // `is_authenticated()` just passed, so a user is present; fall back
    // to a login redirect if the session is somehow user-less.
    let Some(user) = store.current_user() else {
        store.set_redirect_target(route.path.clone());
        return GuardDecision::RedirectToLogin {
            attempted: route.path.clone(),
        };
    };

    if route.allowed_roles.is_empty() || route.allowed_roles.contains(&user.role) {
        GuardDecision::Allow
    } else {
        debug!(path = %route.path, role = %user.role, "denied: role not allowed");
        GuardDecision::RedirectToDashboard { role: user.role }
    }
}

/// Guard for the login route itself: an already-authenticated user is
/// bounced to their dashboard instead of seeing the sign-in form again.
pub fn authorize_login(store: &SessionStore) -> GuardDecision {
    match store.current_user() {
        Some(user) if store.is_authenticated() => {
            GuardDecision::RedirectToDashboard { role: user.role }
        }
        _ => GuardDecision::Allow,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use skolr_api::client::ClientConfig;
    use skolr_api::token::Claims;
    use skolr_api::transport::TransportConfig;
    use skolr_api::ApiClient;

    fn signed_in_store(role: Role, exp_offset: Duration) -> (SessionStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            base_url: "https://school.invalid/api".parse().unwrap(),
            transport: TransportConfig::default(),
        };
        let store = SessionStore::with_vault_path(
            ApiClient::new(&config).unwrap(),
            dir.path().join("session.json"),
        );

        let claims = Claims {
            sub: "1".into(),
            username: Some("jdoe".into()),
            role,
            exp: (Utc::now() + exp_offset).timestamp(),
            iat: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap();
        let user: skolr_api::models::User = serde_json::from_value(serde_json::json!({
            "id": 1,
            "username": "jdoe",
            "email": "jdoe@example.edu",
            "role": role,
        }))
        .unwrap();
        std::fs::write(
            dir.path().join("session.json"),
            serde_json::to_vec(&serde_json::json!({ "token": token, "user": user })).unwrap(),
        )
        .unwrap();
        store.restore();
        (store, dir)
    }

    fn signed_out_store() -> (SessionStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            base_url: "https://school.invalid/api".parse().unwrap(),
            transport: TransportConfig::default(),
        };
        let store = SessionStore::with_vault_path(
            ApiClient::new(&config).unwrap(),
            dir.path().join("session.json"),
        );
        (store, dir)
    }

    #[tokio::test]
    async fn unauthenticated_is_sent_to_login_with_attempted_path() {
        let (store, _dir) = signed_out_store();
        let route = Route::new("/students", [Role::Admin]);

        let decision = authorize(&store, &route);

        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                attempted: "/students".into()
            }
        );
        // The attempted path is remembered for after sign-in.
        assert_eq!(store.take_redirect_target().as_deref(), Some("/students"));
    }

    #[tokio::test]
    async fn expired_token_counts_as_unauthenticated() {
        let (store, _dir) = signed_in_store(Role::Admin, Duration::minutes(-5));
        let route = Route::new("/students", [Role::Admin]);

        assert!(matches!(
            authorize(&store, &route),
            GuardDecision::RedirectToLogin { .. }
        ));
    }

    #[tokio::test]
    async fn wrong_role_goes_to_own_dashboard_not_login() {
        let (store, _dir) = signed_in_store(Role::Student, Duration::hours(1));
        let route = Route::new("/students", [Role::Admin, Role::Teacher]);

        assert_eq!(
            authorize(&store, &route),
            GuardDecision::RedirectToDashboard {
                role: Role::Student
            }
        );
        // No login redirect was recorded for an authorization (not
        // authentication) failure.
        assert!(store.take_redirect_target().is_none());
    }

    #[tokio::test]
    async fn matching_role_is_allowed() {
        let (store, _dir) = signed_in_store(Role::Teacher, Duration::hours(1));
        let route = Route::new("/grades", [Role::Admin, Role::Teacher]);
        assert_eq!(authorize(&store, &route), GuardDecision::Allow);
    }

    #[tokio::test]
    async fn empty_allow_list_admits_any_authenticated_user() {
        let (store, _dir) = signed_in_store(Role::Student, Duration::hours(1));
        let route = Route::authenticated("/profile");
        assert_eq!(authorize(&store, &route), GuardDecision::Allow);
    }

    #[tokio::test]
    async fn login_route_bounces_authenticated_users_to_dashboard() {
        let (store, _dir) = signed_in_store(Role::Teacher, Duration::hours(1));
        assert_eq!(
            authorize_login(&store),
            GuardDecision::RedirectToDashboard {
                role: Role::Teacher
            }
        );
    }

    #[tokio::test]
    async fn login_route_is_open_when_signed_out() {
        let (store, _dir) = signed_out_store();
        assert_eq!(authorize_login(&store), GuardDecision::Allow);
    }

    #[test]
    fn dashboard_paths_are_role_scoped() {
        assert_eq!(dashboard_path(Role::Admin), "/dashboard/admin");
        assert_eq!(dashboard_path(Role::Student), "/dashboard/student");
    }
}
