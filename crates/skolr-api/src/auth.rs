// Authentication endpoints.
//
// Token-based login/logout. A successful login returns a bearer token and
// the account profile; installing the token on the client is the caller's
// decision (the session store does it atomically with its own state).

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginRequest, LoginResponse, User};

impl ApiClient {
    /// Exchange credentials for a bearer token and user profile.
    ///
    /// `POST /auth/login`. A 401 from this endpoint means the credentials
    /// were rejected, not that a session expired -- it is remapped to
    /// [`Error::Authentication`] so callers can distinguish the two.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        debug!(username, "logging in");
        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };
        match self.post("auth/login", &body).await {
            Ok(resp) => {
                debug!(username, "login successful");
                Ok(resp)
            }
            Err(Error::SessionExpired) => Err(Error::Authentication {
                message: "invalid username or password".into(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Invalidate the current token server-side.
    ///
    /// `POST /auth/logout`. Best-effort: the caller clears local state
    /// regardless of the outcome.
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        self.post_empty("auth/logout").await
    }

    /// Fetch the authenticated account's profile.
    ///
    /// `GET /auth/me` -- used for profile refresh; the returned user
    /// replaces the cached one wholesale.
    pub async fn current_user(&self) -> Result<User, Error> {
        self.get("auth/me").await
    }
}
