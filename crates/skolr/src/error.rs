//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use skolr_config::ConfigError;
use skolr_core::CoreError;

/// Exit codes for scripting.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the server")]
    #[diagnostic(
        code(skolr::connection_failed),
        help(
            "Check that the server is running and the profile's URL is correct.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Sign-in failed")]
    #[diagnostic(
        code(skolr::auth_failed),
        help("Check your username and password, then try: skolr login")
    )]
    AuthFailed { message: String },

    #[error("Your session has expired")]
    #[diagnostic(code(skolr::session_expired), help("Sign in again with: skolr login"))]
    SessionExpired,

    #[error("Not signed in")]
    #[diagnostic(code(skolr::not_signed_in), help("Sign in with: skolr login"))]
    NotSignedIn,

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(skolr::no_credentials),
        help(
            "Store one with: skolr config set-password --profile {profile}\n\
             Or set the SKOLR_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Authorization ────────────────────────────────────────────────

    #[error("Permission denied")]
    #[diagnostic(
        code(skolr::permission_denied),
        help("Your account role does not allow this operation. {message}")
    )]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(skolr::not_found),
        help("Run: skolr {list_command} to see available entries")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Conflict: {message}")]
    #[diagnostic(code(skolr::conflict))]
    Conflict { message: String },

    #[error("Validation failed: {message}")]
    #[diagnostic(code(skolr::validation), help("{detail}"))]
    Validation { message: String, detail: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Server error: {message}")]
    #[diagnostic(code(skolr::api_error))]
    ApiError { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(skolr::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: skolr config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(skolr::no_config),
        help(
            "Create one with: skolr config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(skolr::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(skolr::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(skolr::json), help("Check the file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. }
            | Self::SessionExpired
            | Self::NotSignedIn
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::SessionExpired => CliError::SessionExpired,

            CoreError::NotAuthenticated => CliError::NotSignedIn,

            CoreError::PermissionDenied { message } => CliError::PermissionDenied { message },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Conflict { message } => CliError::Conflict { message },

            CoreError::Validation { message, fields } => CliError::Validation {
                message,
                detail: if fields.is_empty() {
                    "Check the provided values.".into()
                } else {
                    fields.join("\n")
                },
            },

            CoreError::Network { reason } => CliError::ConnectionFailed { reason },

            CoreError::Api { message } | CoreError::Internal(message) => {
                CliError::ApiError { message }
            }

            CoreError::Storage { message } => CliError::ApiError {
                message: format!("session storage: {message}"),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Validation { field, reason } => CliError::Validation {
                message: format!("invalid {field}"),
                detail: reason,
            },
            ConfigError::Serialization(e) => CliError::ApiError {
                message: format!("config serialization: {e}"),
            },
        }
    }
}

impl From<skolr_api::Error> for CliError {
    fn from(err: skolr_api::Error) -> Self {
        CliError::from(CoreError::from(err))
    }
}
