// altzone-api: Async Rust client for the AlternativeZone REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::SessionUser;
pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
