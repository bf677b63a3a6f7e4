// ── Theme preference ──
//
// The one piece of persisted client state: "dark" or "light", read at
// startup and written on toggle. Lives in `state.toml` under the data
// dir so it survives config rewrites.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

use crate::{ConfigError, data_dir};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ClientState {
    #[serde(default)]
    theme: ThemePreference,
}

pub fn state_path() -> PathBuf {
    data_dir().join("state.toml")
}

/// Read the saved theme. A missing file means the default (light); an
/// unreadable one is logged and treated the same way.
pub fn load_theme() -> ThemePreference {
    load_theme_from(&state_path())
}

pub fn load_theme_from(path: &Path) -> ThemePreference {
    match read_state(path) {
        Ok(state) => state.theme,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable theme state");
            ThemePreference::default()
        }
    }
}

pub fn save_theme(theme: ThemePreference) -> Result<(), ConfigError> {
    save_theme_to(&state_path(), theme)
}

pub fn save_theme_to(path: &Path, theme: ThemePreference) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let body = toml::to_string_pretty(&ClientState { theme })?;
    std::fs::write(path, body)?;
    Ok(())
}

fn read_state(path: &Path) -> Result<ClientState, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ClientState::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
