//! CLI-side configuration: profile selection and translation of the TOML
//! profile plus global flags into a `ClientConfig` and a `Session`.
//!
//! The TOML types, file I/O and the credential chain live in
//! `altzone-config`; this module only layers the flag overrides on top.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use altzone_config::{Config, Profile, ProfileIdentity};
pub use altzone_config::{config_path, load_config_or_default, save_config};
use altzone_core::{ClientConfig, Session, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a command needs to talk to the server.
pub struct Resolved {
    pub client: ClientConfig,
    pub session: Session,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the client config and session for the active profile.
///
/// With no matching profile the API URL must come from `--api-url` (or
/// `ALTZONE_API_URL`) and the session is anonymous.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let client = resolve_profile(profile, &profile_name, global)?;
        let session = Session::new(Arc::new(ProfileIdentity::new(&profile_name, profile)));
        return Ok(Resolved { client, session });
    }

    // An explicitly named profile has to exist.
    if global.profile.is_some() {
        return Err(unknown_profile(&profile_name, cfg));
    }

    let url_str = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let mut client = ClientConfig::new(parse_url(url_str)?);
    client.token = global.token.clone().map(SecretString::from);
    client.timeout = Duration::from_secs(global.timeout);
    if global.insecure || cfg.defaults.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }

    Ok(Resolved {
        client,
        session: Session::anonymous(),
    })
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    // 1. API URL (flag > env > profile)
    let mut client = altzone_config::profile_to_client_config(profile, profile_name)?;
    if let Some(ref url_str) = global.api_url {
        client.url = parse_url(url_str)?;
    }

    // 2. Token (flag > env > profile chain)
    if let Some(ref token) = global.token {
        client.token = Some(SecretString::from(token.clone()));
    }

    // 3. TLS verification
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }

    // 4. Timeout: the profile wins over the global default
    if profile.timeout.is_none() {
        client.timeout = Duration::from_secs(global.timeout);
    }

    Ok(client)
}

pub fn unknown_profile(name: &str, cfg: &Config) -> CliError {
    let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name: name.into(),
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

fn parse_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "api-url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}
