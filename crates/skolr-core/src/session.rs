// ── Session store ──
//
// The single authenticated session for the process. State lives behind a
// `watch` channel so consumers can observe authentication changes; the
// token and user are additionally persisted to a session file so a CLI
// invocation can reuse the previous login.
//
// Validity is never cached as a derived boolean: `is_authenticated()`
// recomputes from the token's expiry claim every time, and pushes a
// correction through the channel when the token has expired since the
// last observation.

use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use skolr_api::models::{Role, User};
use skolr_api::token::{Claims, decode_claims};
use skolr_api::ApiClient;

use crate::error::CoreError;

// ── Session state ───────────────────────────────────────────────────

/// Observable session state. At most one authenticated session exists.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<SecretString>,
    pub authenticated: bool,
}

impl Session {
    fn authenticated(user: User, token: SecretString) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            authenticated: true,
        }
    }

    /// Whether the held token is present and unexpired at `now`.
    /// Malformed tokens count as absent (fail closed).
    fn token_valid_now(&self) -> bool {
        self.token
            .as_ref()
            .and_then(|t| decode_claims(t.expose_secret()).ok())
            .is_some_and(|claims| !claims.is_expired(Utc::now()))
    }
}

// ── Persistence (the local-storage equivalent) ──────────────────────

#[derive(Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    user: User,
}

/// On-disk session persistence under the platform data dir.
struct SessionVault {
    path: PathBuf,
}

impl SessionVault {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "skolr", "skolr").map_or_else(
            || PathBuf::from(".skolr-session.json"),
            |dirs| dirs.data_dir().join("session.json"),
        )
    }

    fn load(&self) -> Option<PersistedSession> {
        let bytes = std::fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn save(&self, session: &PersistedSession) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::Storage {
                message: e.to_string(),
            })?;
        }
        let json = serde_json::to_vec_pretty(session).map_err(|e| CoreError::Storage {
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, json).map_err(|e| CoreError::Storage {
            message: e.to_string(),
        })
    }

    fn clear(&self) {
        // Removal failure (file absent, permissions) is not actionable here.
        let _ = std::fs::remove_file(&self.path);
    }
}

// ── Store ───────────────────────────────────────────────────────────

/// Owns the session lifecycle: login, logout, restore, profile refresh,
/// and role predicates.
///
/// Constructed once per process and passed by reference -- see
/// [`AppContext`](crate::AppContext).
pub struct SessionStore {
    api: ApiClient,
    state: watch::Sender<Session>,
    vault: SessionVault,
    /// Post-login navigation target, recorded by the guard when an
    /// unauthenticated navigation is denied. Process-lifetime only.
    redirect_target: RwLock<Option<String>>,
}

impl SessionStore {
    /// Create a store using the platform-default session file location.
    pub fn new(api: ApiClient) -> Self {
        Self::with_vault_path(api, SessionVault::default_path())
    }

    /// Create a store with an explicit session file path.
    pub fn with_vault_path(api: ApiClient, path: PathBuf) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            api,
            state,
            vault: SessionVault::new(path),
            redirect_target: RwLock::new(None),
        }
    }

    // ── Restore ──────────────────────────────────────────────────────

    /// Restore a persisted session, if one exists and its token is still
    /// valid. An expired or malformed persisted token is discarded
    /// silently -- the user simply isn't signed in.
    pub fn restore(&self) {
        let Some(persisted) = self.vault.load() else {
            return;
        };

        match decode_claims(&persisted.token) {
            Ok(claims) if !claims.is_expired(Utc::now()) => {
                debug!(user = %persisted.user.username, "restored session");
                let token = SecretString::from(persisted.token);
                self.api.set_token(token.clone());
                let _ = self
                    .state
                    .send(Session::authenticated(persisted.user, token));
            }
            _ => {
                debug!("persisted session invalid or expired, discarding");
                self.vault.clear();
            }
        }
    }

    // ── Authentication lifecycle ─────────────────────────────────────

    /// Exchange credentials for a session.
    ///
    /// On success the token and user are stored atomically (one state
    /// push), the bearer token is installed on the API client, and the
    /// session is persisted. On failure the observable state is left
    /// untouched and the error surfaces to the caller.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<User, CoreError> {
        let resp = self.api.login(username, password).await?;

        if let Err(e) = self.vault.save(&PersistedSession {
            token: resp.token.clone(),
            user: resp.user.clone(),
        }) {
            // Persistence is a convenience; the in-memory session works.
            warn!(error = %e, "failed to persist session");
        }

        let token = SecretString::from(resp.token);
        self.api.set_token(token.clone());
        let _ = self
            .state
            .send(Session::authenticated(resp.user.clone(), token));

        debug!(user = %resp.user.username, role = %resp.user.role, "signed in");
        Ok(resp.user)
    }

    /// End the session unconditionally: revoke the token server-side
    /// (best-effort), then clear persisted and in-memory state.
    /// Navigation back to the login route belongs to the caller.
    pub async fn logout(&self) {
        if self.api.has_token() {
            if let Err(e) = self.api.logout().await {
                warn!(error = %e, "server-side logout failed (non-fatal)");
            }
        }
        self.clear_local();
    }

    /// Drop local session state without the network call. Used when the
    /// server has already told us the session is dead (HTTP 401).
    pub fn force_logout(&self) {
        debug!("forcing logout");
        self.clear_local();
    }

    fn clear_local(&self) {
        self.vault.clear();
        self.api.clear_token();
        let _ = self.state.send(Session::default());
    }

    /// Replace the cached user wholesale from `GET /auth/me`.
    pub async fn refresh_user(&self) -> Result<User, CoreError> {
        if !self.is_authenticated() {
            return Err(CoreError::NotAuthenticated);
        }
        let user = self.api.current_user().await?;

        self.state.send_modify(|s| s.user = Some(user.clone()));
        if let Some(token) = self.state.borrow().token.clone() {
            if let Err(e) = self.vault.save(&PersistedSession {
                token: token.expose_secret().to_owned(),
                user: user.clone(),
            }) {
                warn!(error = %e, "failed to persist refreshed profile");
            }
        }
        Ok(user)
    }

    // ── Validity & role predicates ───────────────────────────────────

    /// `true` iff a token is held AND its expiry claim is strictly in the
    /// future. Recomputed on every call; when the token has expired since
    /// the last push, the observable state is corrected to signed-out.
    pub fn is_authenticated(&self) -> bool {
        let valid = self.state.borrow().token_valid_now();
        if !valid && self.state.borrow().authenticated {
            debug!("token expired since last check, clearing session");
            self.clear_local();
        }
        valid
    }

    /// The cached user's role matches `role`. No server round-trip: this
    /// reflects the token's staleness window, not live permissions.
    pub fn has_role(&self, role: Role) -> bool {
        self.is_authenticated()
            && self
                .state
                .borrow()
                .user
                .as_ref()
                .is_some_and(|u| u.role == role)
    }

    /// The cached user's role is any of `roles`.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.is_authenticated()
            && self
                .state
                .borrow()
                .user
                .as_ref()
                .is_some_and(|u| roles.contains(&u.role))
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Point-in-time copy of the session state.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Subscribe to session changes (the `is_authenticated$` observable).
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// The cached user, if signed in.
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Decoded claims of the held token, if any.
    pub fn claims(&self) -> Option<Claims> {
        self.state
            .borrow()
            .token
            .as_ref()
            .and_then(|t| decode_claims(t.expose_secret()).ok())
    }

    // ── Post-login redirect (the session-storage equivalent) ─────────

    /// Record where to go after the next successful login.
    pub fn set_redirect_target(&self, target: impl Into<String>) {
        *self
            .redirect_target
            .write()
            .expect("redirect lock poisoned") = Some(target.into());
    }

    /// Take (and clear) the recorded post-login target.
    pub fn take_redirect_target(&self) -> Option<String> {
        self.redirect_target
            .write()
            .expect("redirect lock poisoned")
            .take()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use skolr_api::client::ClientConfig;
    use skolr_api::transport::TransportConfig;

    fn offline_api() -> ApiClient {
        let config = ClientConfig {
            base_url: "https://school.invalid/api".parse().unwrap(),
            transport: TransportConfig::default(),
        };
        ApiClient::new(&config).unwrap()
    }

    fn store_with_tempdir() -> (SessionStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_vault_path(offline_api(), dir.path().join("session.json"));
        (store, dir)
    }

    fn mint_token(role: Role, exp_offset: Duration) -> String {
        let claims = Claims {
            sub: "1".into(),
            username: Some("jdoe".into()),
            role,
            exp: (Utc::now() + exp_offset).timestamp(),
            iat: Some(Utc::now().timestamp()),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap()
    }

    fn sample_user(role: Role) -> User {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "username": "jdoe",
            "email": "jdoe@example.edu",
            "role": role,
        }))
        .unwrap()
    }

    fn persist(store: &SessionStore, token: &str, role: Role) {
        store
            .vault
            .save(&PersistedSession {
                token: token.to_owned(),
                user: sample_user(role),
            })
            .unwrap();
    }

    #[tokio::test]
    async fn fresh_store_is_unauthenticated() {
        let (store, _dir) = store_with_tempdir();
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn restore_accepts_unexpired_token() {
        let (store, _dir) = store_with_tempdir();
        persist(&store, &mint_token(Role::Admin, Duration::hours(1)), Role::Admin);

        store.restore();

        assert!(store.is_authenticated());
        assert!(store.has_role(Role::Admin));
        assert!(!store.has_role(Role::Student));
    }

    #[tokio::test]
    async fn restore_discards_expired_token() {
        let (store, _dir) = store_with_tempdir();
        persist(
            &store,
            &mint_token(Role::Admin, Duration::minutes(-5)),
            Role::Admin,
        );

        store.restore();

        assert!(!store.is_authenticated());
        // The dead session file is cleaned up.
        assert!(store.vault.load().is_none());
    }

    #[tokio::test]
    async fn restore_discards_malformed_token_without_panicking() {
        let (store, _dir) = store_with_tempdir();
        persist(&store, "definitely-not-a-jwt", Role::Admin);

        store.restore();
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn expiry_mid_session_flips_observable_to_false() {
        let (store, _dir) = store_with_tempdir();
        // A token that is valid for one second.
        persist(&store, &mint_token(Role::Teacher, Duration::seconds(1)), Role::Teacher);
        store.restore();
        assert!(store.is_authenticated());

        let mut rx = store.subscribe();
        rx.mark_unchanged();

        // Simulate the clock passing the expiry: overwrite the in-memory
        // token with an already-expired one.
        store.state.send_modify(|s| {
            s.token = Some(SecretString::from(mint_token(
                Role::Teacher,
                Duration::seconds(-1),
            )));
        });
        rx.mark_unchanged();

        assert!(!store.is_authenticated());
        // The correction was pushed to subscribers.
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow().authenticated);
    }

    #[tokio::test]
    async fn role_predicates_cover_any_of() {
        let (store, _dir) = store_with_tempdir();
        persist(&store, &mint_token(Role::Teacher, Duration::hours(1)), Role::Teacher);
        store.restore();

        assert!(store.has_any_role(&[Role::Admin, Role::Teacher]));
        assert!(!store.has_any_role(&[Role::Admin]));
        assert!(!store.has_any_role(&[]));
    }

    #[tokio::test]
    async fn redirect_target_is_taken_once() {
        let (store, _dir) = store_with_tempdir();
        store.set_redirect_target("/grades");
        assert_eq!(store.take_redirect_target().as_deref(), Some("/grades"));
        assert!(store.take_redirect_target().is_none());
    }

    #[tokio::test]
    async fn force_logout_clears_everything() {
        let (store, _dir) = store_with_tempdir();
        persist(&store, &mint_token(Role::Admin, Duration::hours(1)), Role::Admin);
        store.restore();
        assert!(store.is_authenticated());

        store.force_logout();

        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
        assert!(store.vault.load().is_none());
    }
}
