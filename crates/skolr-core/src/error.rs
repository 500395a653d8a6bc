// ── Core error types ──
//
// User-facing errors from skolr-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<skolr_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Your session has expired -- please sign in again")]
    SessionExpired,

    #[error("Not signed in")]
    NotAuthenticated,

    // ── Authorization ────────────────────────────────────────────────
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: Vec<String>,
    },

    // ── Transport ────────────────────────────────────────────────────
    #[error("Cannot reach the server: {reason}")]
    Network { reason: String },

    #[error("Server error: {message}")]
    Api { message: String },

    // ── Local persistence ────────────────────────────────────────────
    #[error("Session storage error: {message}")]
    Storage { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<skolr_api::Error> for CoreError {
    fn from(err: skolr_api::Error) -> Self {
        match err {
            skolr_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            skolr_api::Error::SessionExpired | skolr_api::Error::InvalidToken => {
                CoreError::SessionExpired
            }
            skolr_api::Error::Forbidden => CoreError::PermissionDenied {
                message: "you do not have permission to perform this action".into(),
            },
            skolr_api::Error::NotFound => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: String::new(),
            },
            skolr_api::Error::Conflict { message } => CoreError::Conflict { message },
            skolr_api::Error::Validation { message, fields } => CoreError::Validation {
                message,
                fields: fields.iter().map(ToString::to_string).collect(),
            },
            skolr_api::Error::Server { status, message } => CoreError::Api {
                message: format!("HTTP {status}: {message}"),
            },
            skolr_api::Error::UnexpectedStatus { status, message } => CoreError::Api {
                message: format!("HTTP {status}: {message}"),
            },
            skolr_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::Network {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                    }
                }
            }
            skolr_api::Error::InvalidUrl(e) => CoreError::Internal(format!("invalid URL: {e}")),
            skolr_api::Error::Tls(msg) => CoreError::Network {
                reason: format!("TLS error: {msg}"),
            },
            skolr_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_401_translates_to_session_expired() {
        let core: CoreError = skolr_api::Error::SessionExpired.into();
        assert!(matches!(core, CoreError::SessionExpired));
    }

    #[test]
    fn malformed_token_also_reads_as_expired_session() {
        let core: CoreError = skolr_api::Error::InvalidToken.into();
        assert!(matches!(core, CoreError::SessionExpired));
    }

    #[test]
    fn validation_fields_become_display_strings() {
        let api = skolr_api::Error::Validation {
            message: "validation failed".into(),
            fields: vec![skolr_api::error::FieldError {
                field: "email".into(),
                message: "is required".into(),
            }],
        };
        match CoreError::from(api) {
            CoreError::Validation { fields, .. } => {
                assert_eq!(fields, vec!["email: is required".to_owned()]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
