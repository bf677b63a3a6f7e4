//! Shared helpers for command handlers.

use std::io::{IsTerminal, stdin};

use dialoguer::Input;

use altzone_core::{LoadState, Notice, NoticeLevel};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Use the flag value, or ask for it on a terminal. Without a terminal
/// a missing field stays empty and draft validation reports it.
pub fn field_or_prompt(value: Option<String>, label: &str) -> Result<String, CliError> {
    if let Some(value) = value {
        return Ok(value);
    }
    if !stdin().is_terminal() {
        return Ok(String::new());
    }
    Input::new()
        .with_prompt(label)
        .interact_text()
        .map_err(prompt_err)
}

/// Turn a failed list load into an error. The warning notice the
/// controller queued says the same thing, so it is dropped.
pub fn ensure_loaded(state: &LoadState) -> Result<(), CliError> {
    match state {
        LoadState::Failed(message) => Err(CliError::ApiError {
            code: "load_failed".into(),
            message: message.clone(),
        }),
        _ => Ok(()),
    }
}

/// Print what a controller queued and pass its result through. On
/// failure the error itself is reported by `main`, so error and warning
/// notices repeating it are skipped.
pub fn finish<T, E>(
    result: Result<T, E>,
    notices: &[Notice],
    global: &GlobalOpts,
) -> Result<T, CliError>
where
    E: Into<CliError>,
{
    match result {
        Ok(value) => {
            output::print_notices(notices, &global.color, global.quiet);
            Ok(value)
        }
        Err(e) => {
            let informational: Vec<Notice> = notices
                .iter()
                .filter(|n| matches!(n.level, NoticeLevel::Success | NoticeLevel::Info))
                .cloned()
                .collect();
            output::print_notices(&informational, &global.color, global.quiet);
            Err(e.into())
        }
    }
}

/// Short date for table cells.
pub fn short_date(date: &chrono::DateTime<chrono::Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Trim long free text for table cells.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("café au lait", 5), "café…");
    }

    #[test]
    fn failed_load_becomes_an_error() {
        assert!(ensure_loaded(&LoadState::Loaded).is_ok());
        let err = ensure_loaded(&LoadState::Failed("boom".into())).unwrap_err();
        assert_eq!(err.to_string(), "API error (load_failed): boom");
    }
}
