//! CLI configuration — thin wrapper around `skolr_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--server, --insecure, etc.).

use std::time::Duration;

use skolr_api::client::ClientConfig;
use skolr_api::transport::{TlsMode, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use skolr_config::{
    Config, Profile, config_path, load_config_or_default, resolve_credentials, save_config,
    session_path, store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(profile: &Profile, global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    // 1. Server URL (flag > env > profile)
    let url_str = global.server.as_deref().unwrap_or(&profile.server);
    let base_url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        message: "invalid server".into(),
        detail: format!("invalid URL: {url_str}"),
    })?;

    // 2. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    // 3. Timeout (flag/env wins; clap defaults it to 30)
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(global.timeout));

    Ok(ClientConfig {
        base_url,
        transport: TransportConfig { tls, timeout },
    })
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
///
/// Falls back to `--server` / `SKOLR_SERVER` alone when no profile exists.
pub fn build_client_config(global: &GlobalOpts) -> Result<(String, ClientConfig), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let client = resolve_profile(profile, global)?;
        return Ok((profile_name, client));
    }

    // No profile found -- try CLI flags / env vars alone
    let url_str = global.server.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let base_url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        message: "invalid server".into(),
        detail: format!("invalid URL: {url_str}"),
    })?;

    let tls = if global.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };

    Ok((
        profile_name,
        ClientConfig {
            base_url,
            transport: TransportConfig {
                tls,
                timeout: Duration::from_secs(global.timeout),
            },
        },
    ))
}
