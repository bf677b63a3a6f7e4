//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use altzone_config::ConfigError;
use altzone_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the API at {url}")]
    #[diagnostic(
        code(altzone::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             URL: {url}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Session ──────────────────────────────────────────────────────
    #[error("You must be logged in to {action}")]
    #[diagnostic(
        code(altzone::login_required),
        help(
            "Record your identity-provider sign-in with:\n\
             altzone session sign-in --email you@example.com"
        )
    )]
    LoginRequired { action: String },

    #[error("The server rejected the request: {message}")]
    #[diagnostic(
        code(altzone::rejected),
        help("Your token may have expired. Pass a fresh one with --token or ALTZONE_TOKEN.")
    )]
    Rejected { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(altzone::not_found),
        help("Run: altzone {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(altzone::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(altzone::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(altzone::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: altzone config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(altzone::no_config),
        help(
            "Create one with: altzone config init\n\
             Or pass --api-url / set ALTZONE_API_URL.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(altzone::config))]
    Config(Box<figment::Error>),

    #[error("{message}")]
    #[diagnostic(code(altzone::config))]
    ConfigFile { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(altzone::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(altzone::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(altzone::render))]
    Render(String),
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
            Self::LoginRequired { .. } | Self::Rejected { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Unauthorized { operation } => CliError::LoginRequired { action: operation },

            CoreError::NetworkOrServer {
                message,
                status: Some(401 | 403),
            } => CliError::Rejected { message },

            CoreError::NetworkOrServer { message, status } => CliError::ApiError {
                code: status.map_or_else(|| "network".into(), |s| s.to_string()),
                message,
            },

            CoreError::NotFound { entity, identifier } => CliError::NotFound {
                list_command: list_command_for(&entity).into(),
                resource_type: entity,
                identifier,
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::PromptBusy | CoreError::NoPrompt => CliError::Validation {
                field: "prompt".into(),
                reason: err.to_string(),
            },

            CoreError::Cancelled => CliError::ApiError {
                code: "cancelled".into(),
                message: err.to_string(),
            },

            CoreError::Config { message } => CliError::ConfigFile { message },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

fn list_command_for(entity: &str) -> &'static str {
    match entity {
        "recommendation" => "recommendations mine",
        _ => "queries list",
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            ConfigError::Figment(inner) => CliError::Config(inner),
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::ConfigFile {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_exit_with_auth_code() {
        let err = CliError::from(CoreError::Unauthorized {
            operation: "delete a query".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert_eq!(err.to_string(), "You must be logged in to delete a query");
    }

    #[test]
    fn not_found_points_at_the_right_list() {
        let err = CliError::from(CoreError::NotFound {
            entity: "recommendation".into(),
            identifier: "r9".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert!(matches!(
            err,
            CliError::NotFound { ref list_command, .. } if list_command == "recommendations mine"
        ));
    }

    #[test]
    fn server_failures_keep_their_status() {
        let err = CliError::from(CoreError::NetworkOrServer {
            message: "bad gateway".into(),
            status: Some(502),
        });
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert_eq!(err.to_string(), "API error (502): bad gateway");

        let rejected = CliError::from(CoreError::NetworkOrServer {
            message: "expired".into(),
            status: Some(401),
        });
        assert_eq!(rejected.exit_code(), exit_code::AUTH);
    }
}
