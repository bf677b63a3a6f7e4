// ── Core error types ──
//
// User-facing errors from altzone-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<altzone_api::Error>`
// impl folds transport-layer errors into the three domain conditions
// (network/server failure, unauthorized, not found) plus a few
// client-side ones.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote failures ──────────────────────────────────────────────
    #[error("Request failed: {message}")]
    NetworkOrServer {
        message: String,
        /// HTTP status code (if the server answered).
        status: Option<u16>,
    },

    #[error("Cannot reach API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Session ──────────────────────────────────────────────────────
    #[error("You must be logged in to {operation}")]
    Unauthorized { operation: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Prompt protocol ──────────────────────────────────────────────
    #[error("Another prompt is already open")]
    PromptBusy,

    #[error("No prompt is open for this action")]
    NoPrompt,

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Operation cancelled: the view was closed")]
    Cancelled,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether this error means a remote call failed
    /// (as opposed to a client-side rejection).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::NetworkOrServer { .. } | Self::ConnectionFailed { .. } | Self::Timeout { .. }
        )
    }

    pub(crate) fn not_found(entity: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_owned(),
            identifier: identifier.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<altzone_api::Error> for CoreError {
    fn from(err: altzone_api::Error) -> Self {
        match err {
            altzone_api::Error::Transport(ref e) => {
                // Timeouts with a known limit arrive as `Error::Timeout`;
                // this one came from a caller-supplied reqwest client.
                if e.is_timeout() {
                    CoreError::NetworkOrServer {
                        message: "request timed out".into(),
                        status: None,
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::NetworkOrServer {
                        message: e.to_string(),
                        status: err.status(),
                    }
                }
            }
            altzone_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            altzone_api::Error::InvalidPathSegment(segment) => CoreError::Validation {
                message: format!("{segment:?} is not a valid id"),
            },
            altzone_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            altzone_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            altzone_api::Error::Unauthorized { message } => CoreError::NetworkOrServer {
                message: format!("rejected by server: {message}"),
                status: Some(401),
            },
            altzone_api::Error::NotFound { path } => CoreError::NotFound {
                entity: "resource".into(),
                identifier: path,
            },
            altzone_api::Error::Api { status, message } => CoreError::NetworkOrServer {
                message,
                status: Some(status),
            },
            altzone_api::Error::Deserialization { message, body: _ } => {
                CoreError::NetworkOrServer {
                    message: format!("unexpected response: {message}"),
                    status: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_domain_not_found() {
        let err = CoreError::from(altzone_api::Error::NotFound {
            path: "/api/queries/x".into(),
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert!(!err.is_remote());
    }

    #[test]
    fn timeout_keeps_the_configured_limit() {
        let err = CoreError::from(altzone_api::Error::Timeout { timeout_secs: 15 });
        assert!(matches!(err, CoreError::Timeout { timeout_secs: 15 }));
        assert_eq!(err.to_string(), "Request timed out after 15s");
    }

    #[test]
    fn unusable_path_segment_is_a_validation_error() {
        let err = CoreError::from(altzone_api::Error::InvalidPathSegment("..".into()));
        assert!(matches!(err, CoreError::Validation { .. }));
        assert!(!err.is_remote());
    }

    #[test]
    fn server_error_is_remote() {
        let err = CoreError::from(altzone_api::Error::Api {
            status: 502,
            message: "bad gateway".into(),
        });
        assert!(err.is_remote());
        assert!(matches!(err, CoreError::NetworkOrServer { status: Some(502), .. }));
    }
}
