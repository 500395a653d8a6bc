//! Shared configuration for the skolr CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `skolr_api::ClientConfig`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use skolr_api::client::ClientConfig;
use skolr_api::transport::{TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' (and no default configured)")]
    UnknownProfile { profile: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by explicit name, falling back to the
    /// configured default.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .map(ToOwned::to_owned)
            .or_else(|| self.default_profile.clone())
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: "(none)".into(),
            })?;
        let (key, profile) = self
            .profiles
            .get_key_value(&name)
            .ok_or_else(|| ConfigError::UnknownProfile { profile: name })?;
        Ok((key.as_str(), profile))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL including the API prefix,
    /// e.g. "https://school.example.edu/api".
    pub server: String,

    /// Account to sign in as.
    pub username: Option<String>,

    /// Password (plaintext — prefer keyring or SKOLR_PASSWORD).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification (test servers only).
    pub insecure: Option<bool>,

    /// Override request timeout in seconds.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "skolr", "skolr").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("skolr");
    p
}

/// Default session file path, next to the config.
pub fn session_path() -> PathBuf {
    ProjectDirs::from("com", "skolr", "skolr").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("session.json");
            p
        },
        |dirs| dirs.data_dir().join("session.json"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full `Config` from file + environment (`SKOLR_` prefix).
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path; environment still applies.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SKOLR_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML at an explicit path.
pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve sign-in credentials for a profile.
///
/// The password comes from, in order: the `SKOLR_PASSWORD` environment
/// variable, the system keyring (service "skolr", key
/// "`<profile>/password`"), then plaintext in the config file.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("SKOLR_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 1. Env var
    if let Ok(pw) = std::env::var("SKOLR_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new("skolr", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok((username, SecretString::from(pw)));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a password in the system keyring for a profile.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new("skolr", &format!("{profile_name}/password")).map_err(|e| {
        ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        }
    })?;
    entry
        .set_password(password)
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── Client config translation ───────────────────────────────────────

/// Build a `ClientConfig` from a profile.
pub fn profile_to_client_config(profile: &Profile) -> Result<ClientConfig, ConfigError> {
    let base_url: url::Url = profile.server.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {}", profile.server),
    })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    Ok(ClientConfig {
        base_url,
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(profile.timeout.unwrap_or(default_timeout())),
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile(server: &str) -> Profile {
        Profile {
            server: server.into(),
            username: Some("jdoe".into()),
            password: Some("hunter2".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn default_config_names_a_default_profile() {
        let cfg = Config::default();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profile_lookup_falls_back_to_the_default() {
        let mut cfg = Config::default();
        cfg.default_profile = Some("school".into());
        cfg.profiles
            .insert("school".into(), profile("https://s.example.edu/api"));

        let (name, _) = cfg.profile(None).unwrap();
        assert_eq!(name, "school");
        assert!(matches!(
            cfg.profile(Some("missing")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn config_round_trips_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles
            .insert("school".into(), profile("https://s.example.edu/api"));

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profiles["school"].server, "https://s.example.edu/api");
        assert_eq!(loaded.profiles["school"].username.as_deref(), Some("jdoe"));
    }

    #[test]
    fn plaintext_password_resolves_when_nothing_else_is_set() {
        let p = profile("https://s.example.edu/api");
        let (username, _password) = resolve_credentials(&p, "school").unwrap();
        assert_eq!(username, "jdoe");
    }

    #[test]
    fn missing_credentials_are_an_error() {
        let p = Profile {
            server: "https://s.example.edu/api".into(),
            ..Profile::default()
        };
        assert!(matches!(
            resolve_credentials(&p, "school"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn client_config_translation_validates_the_url() {
        let p = profile("not a url");
        assert!(matches!(
            profile_to_client_config(&p),
            Err(ConfigError::Validation { .. })
        ));

        let cfg = profile_to_client_config(&profile("https://s.example.edu/api")).unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://s.example.edu/api");
        assert_eq!(cfg.transport.timeout, Duration::from_secs(30));
    }

    #[test]
    fn insecure_flag_wins_over_custom_ca() {
        let mut p = profile("https://s.example.edu/api");
        p.insecure = Some(true);
        p.ca_cert = Some(PathBuf::from("/tmp/ca.pem"));
        let cfg = profile_to_client_config(&p).unwrap();
        assert!(matches!(cfg.transport.tls, TlsMode::DangerAcceptInvalid));
    }
}
