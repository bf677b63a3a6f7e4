// ── Runtime client configuration ──
//
// Describes *how* to reach the API. Carries the bearer token and
// transport tuning but never touches disk: the CLI resolves profiles and
// hands a `ClientConfig` in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use altzone_api::transport::{TlsMode, TransportConfig};
use altzone_api::ApiClient;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local development servers).
    DangerAcceptInvalid,
}

/// Everything needed to build an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root or `/api` URL.
    pub url: Url,
    /// Identity-provider token sent as `Authorization: Bearer`.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn build_transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        let transport = TransportConfig {
            tls,
            timeout: self.timeout,
            bearer: None,
        };
        match &self.token {
            Some(token) => transport.with_bearer(token.clone()),
            None => transport,
        }
    }

    pub fn build_client(&self) -> Result<ApiClient, CoreError> {
        Ok(ApiClient::new(self.url.as_str(), &self.build_transport())?)
    }
}
