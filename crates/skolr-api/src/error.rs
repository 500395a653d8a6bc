// Error taxonomy for the skolr-api crate.
//
// Every resource method funnels non-2xx responses through
// `Error::from_status` — one shared normalization point instead of a
// per-resource status switch. `skolr-core` maps these into user-facing
// domain errors.

use serde::Deserialize;
use thiserror::Error;

/// A single field-level validation failure reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Top-level error type for the `skolr-api` crate.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication / authorization ──────────────────────────────
    /// Login rejected (wrong credentials, account disabled, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Bearer token rejected or expired (HTTP 401 on an API call).
    #[error("Session expired -- please sign in again")]
    SessionExpired,

    /// Authenticated but not allowed (HTTP 403).
    #[error("You do not have permission to perform this action")]
    Forbidden,

    /// Stored token is malformed or not a JWT.
    #[error("Invalid session token")]
    InvalidToken,

    // ── Resource errors ─────────────────────────────────────────────
    /// HTTP 404.
    #[error("The requested resource was not found")]
    NotFound,

    /// HTTP 409 -- duplicate key, concurrent edit, etc.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// HTTP 422 with field-level detail extracted from the body.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    /// HTTP 5xx.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Any other unexpected status code.
    #[error("Unexpected response (HTTP {status}): {message}")]
    UnexpectedStatus { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

/// Error body shape the server uses for 4xx responses:
/// `{"message": "...", "errors": {"field": ["msg", ...]}}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: std::collections::HashMap<String, Vec<String>>,
}

impl Error {
    /// Normalize a non-2xx HTTP status + body into a typed error.
    ///
    /// This is the single mapping point for the whole API surface:
    /// 401 session-expired, 403 forbidden, 404 not-found, 409 conflict,
    /// 422 validation (with field detail), 5xx server fault.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|b| b.message.clone())
            .unwrap_or_else(|| preview(body));

        match status.as_u16() {
            401 => Self::SessionExpired,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict { message },
            422 => {
                let fields = parsed
                    .map(|b| {
                        let mut fields: Vec<FieldError> = b
                            .errors
                            .into_iter()
                            .flat_map(|(field, messages)| {
                                messages.into_iter().map(move |message| FieldError {
                                    field: field.clone(),
                                    message,
                                })
                            })
                            .collect();
                        // HashMap iteration order is unstable; sort for
                        // deterministic display.
                        fields.sort_by(|a, b| a.field.cmp(&b.field));
                        fields
                    })
                    .unwrap_or_default();
                Self::Validation { message, fields }
            }
            s if status.is_server_error() => Self::Server { status: s, message },
            s => Self::UnexpectedStatus { status: s, message },
        }
    }

    /// Returns `true` if this error means the session is no longer valid
    /// and the caller should force a logout.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::InvalidToken)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if the server could not be reached at all
    /// (connection refused, DNS failure, timeout).
    pub fn is_network_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

/// First ~200 bytes of a response body for display, truncated on a char
/// boundary so multibyte text (HTML error pages, proxy messages) never
/// splits mid-character.
pub(crate) fn preview(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_owned();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn status_401_maps_to_session_expired() {
        let err = Error::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, Error::SessionExpired));
        assert!(err.is_auth_expired());
    }

    #[test]
    fn status_403_maps_to_forbidden() {
        assert!(matches!(
            Error::from_status(StatusCode::FORBIDDEN, "{}"),
            Error::Forbidden
        ));
    }

    #[test]
    fn status_404_maps_to_not_found() {
        let err = Error::from_status(StatusCode::NOT_FOUND, "");
        assert!(err.is_not_found());
    }

    #[test]
    fn status_409_carries_server_message() {
        let err = Error::from_status(
            StatusCode::CONFLICT,
            r#"{"message": "student number already in use"}"#,
        );
        match err {
            Error::Conflict { message } => assert_eq!(message, "student number already in use"),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn status_422_extracts_field_errors_sorted() {
        let body = r#"{
            "message": "validation failed",
            "errors": {
                "grade": ["must be between 1 and 10"],
                "email": ["is required", "must be a valid address"]
            }
        }"#;
        let err = Error::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        match err {
            Error::Validation { message, fields } => {
                assert_eq!(message, "validation failed");
                assert_eq!(fields.len(), 3);
                assert_eq!(fields[0].field, "email");
                assert_eq!(fields[2].field, "grade");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn status_5xx_maps_to_server_fault() {
        let err = Error::from_status(StatusCode::BAD_GATEWAY, "upstream down");
        match err {
            Error::Server { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected Server, got {other:?}"),
        }
    }

    #[test]
    fn long_multibyte_body_is_previewed_on_a_char_boundary() {
        // Byte 200 lands inside the first 'é'; the preview must back up
        // to the boundary instead of panicking.
        let body = format!("{}ééééé", "a".repeat(199));
        let err = Error::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            Error::Server { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "a".repeat(199));
            }
            other => panic!("expected Server, got {other:?}"),
        }
    }

    #[test]
    fn multibyte_body_within_the_preview_cap_is_kept_whole() {
        let err = Error::from_status(StatusCode::CONFLICT, "élève déjà inscrit");
        match err {
            Error::Conflict { message } => assert_eq!(message, "élève déjà inscrit"),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn unexpected_status_is_preserved() {
        let err = Error::from_status(StatusCode::IM_A_TEAPOT, "");
        assert!(matches!(err, Error::UnexpectedStatus { status: 418, .. }));
    }
}
