//! Shared configuration for AlternativeZone tools.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), the
//! profile-backed identity provider, and translation to
//! `altzone_core::ClientConfig`. The CLI adds `GlobalOpts`-aware wrappers
//! on top.

pub mod theme;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use altzone_core::{
    ClientConfig, CoreError, IdentityProvider, Layout, SessionUser, TlsVerification,
};

pub use theme::{ThemePreference, load_theme, save_theme};

const KEYRING_SERVICE: &str = "altzone";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
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

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Column layout of list commands; fixes their page size.
    #[serde(default)]
    pub layout: Layout,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            layout: Layout::default(),
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
///
/// The `email` / `display_name` / `photo_url` fields hold the signed-in
/// user the identity provider reported. An empty `email` means signed out.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Server root or API URL (e.g., "https://altzone.example.com").
    pub api_url: String,

    /// Identity-provider token (plaintext, prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Profile {
    /// The signed-in user stored in this profile, if any.
    pub fn session_user(&self) -> Option<SessionUser> {
        let email = self.email.as_deref().filter(|e| !e.trim().is_empty())?;
        Some(SessionUser {
            email: email.to_owned(),
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
        })
    }

    pub fn set_session_user(&mut self, user: Option<&SessionUser>) {
        self.email = user.map(|u| u.email.clone());
        self.display_name = user.and_then(|u| u.display_name.clone());
        self.photo_url = user.and_then(|u| u.photo_url.clone());
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "alternativezone", "altzone")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for persisted client state (the theme preference).
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("altzone");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, then `ALTZONE_*` env overrides
/// (`ALTZONE_DEFAULTS__TIMEOUT=60`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ALTZONE_").split("__"));

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
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Token resolution (without CLI flags) ────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
}

/// Resolve the bearer token from the credential chain (no CLI flag step).
///
/// Reads need no token, so an exhausted chain yields `None`.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    profile
        .token
        .as_ref()
        .map(|token| SecretString::from(token.clone()))
}

/// Store a token in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token)?;
    Ok(())
}

/// Remove a stored token. A missing entry is not an error.
pub fn forget_token(profile_name: &str) -> Result<(), ConfigError> {
    match keyring_entry(profile_name)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── Translation to core config ──────────────────────────────────────

/// Build a `ClientConfig` from a profile with no CLI flag overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ClientConfig {
        url,
        token: resolve_token(profile, profile_name),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
    })
}

// ── Identity provider ───────────────────────────────────────────────

/// Identity provider backed by a profile's session fields.
///
/// Signing out clears the fields, drops any stored token and rewrites
/// the config file.
#[derive(Debug)]
pub struct ProfileIdentity {
    profile_name: String,
    config_path: PathBuf,
    user: RwLock<Option<SessionUser>>,
}

impl ProfileIdentity {
    pub fn new(profile_name: &str, profile: &Profile) -> Self {
        Self::with_path(profile_name, profile, config_path())
    }

    pub fn with_path(profile_name: &str, profile: &Profile, config_path: PathBuf) -> Self {
        Self {
            profile_name: profile_name.to_owned(),
            config_path,
            user: RwLock::new(profile.session_user()),
        }
    }

    fn clear_profile(&self) -> Result<(), ConfigError> {
        let mut cfg = load_config_from(&self.config_path)?;
        let profile = cfg.profiles.get_mut(&self.profile_name).ok_or_else(|| {
            ConfigError::UnknownProfile {
                profile: self.profile_name.clone(),
            }
        })?;
        profile.set_session_user(None);
        profile.token = None;
        save_config_to(&self.config_path, &cfg)?;
        // Best effort: the platform may have no keyring at all.
        if let Err(e) = forget_token(&self.profile_name) {
            debug!(error = %e, "no keyring token removed");
        }
        Ok(())
    }
}

impl IdentityProvider for ProfileIdentity {
    fn current_user(&self) -> Option<SessionUser> {
        self.user.read().ok().and_then(|guard| guard.clone())
    }

    fn sign_out(&self) -> Result<(), CoreError> {
        self.clear_profile().map_err(|e| CoreError::Config {
            message: e.to_string(),
        })?;
        let mut guard = self
            .user
            .write()
            .map_err(|_| CoreError::Internal("identity lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    const SAMPLE: &str = r#"
default_profile = "home"

[defaults]
output = "json"
layout = "two-columns"

[profiles.home]
api_url = "https://altzone.example.com"
token = "plain-token"
email = "me@example.com"
display_name = "Me"
timeout = 5
"#;

    #[test]
    fn loads_profiles_and_defaults_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("home"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.layout, Layout::TwoColumns);
        assert_eq!(cfg.defaults.timeout, 30);

        let home = &cfg.profiles["home"];
        assert_eq!(home.session_user().unwrap().name(), "Me");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn profile_translates_to_client_config() {
        let profile = Profile {
            api_url: "https://altzone.example.com".into(),
            token: Some("plain-token".into()),
            timeout: Some(5),
            ..Profile::default()
        };
        let cfg = profile_to_client_config(&profile, "altzone-test-no-keyring").unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
        assert_eq!(cfg.token.unwrap().expose_secret(), "plain-token");
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let profile = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_client_config(&profile, "x"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn blank_email_is_signed_out() {
        let profile = Profile {
            email: Some("  ".into()),
            ..Profile::default()
        };
        assert!(profile.session_user().is_none());
    }

    #[test]
    fn sign_out_clears_session_fields_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let cfg = load_config_from(&path).unwrap();

        let identity = ProfileIdentity::with_path("home", &cfg.profiles["home"], path.clone());
        assert!(identity.current_user().is_some());
        identity.sign_out().unwrap();
        assert!(identity.current_user().is_none());

        let reloaded = load_config_from(&path).unwrap();
        let home = &reloaded.profiles["home"];
        assert!(home.session_user().is_none());
        assert!(home.token.is_none());
        assert_eq!(home.api_url, "https://altzone.example.com");
    }
}
