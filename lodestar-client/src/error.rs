//! Resolution error types.

use crate::identifier::ServiceIdentifier;
use lodestar_discovery::RegistryError;
use lodestar_http_client::HttpClientError;
use thiserror::Error;

/// Result type for registry-aware client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Token rendered for an absent preferred version.
const LATEST_TOKEN: &str = "[latest]";

/// Token rendered for an absent minimum version.
const NONE_TOKEN: &str = "[none]";

/// The registry had no instance matching the requested service.
///
/// The message is deterministic and stable: absent versions render as the
/// literal tokens `[latest]` and `[none]`, so tooling can parse it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "No service instances found with name {service_name}, preferred version {preferred_version}, min version {minimum_version}"
)]
pub struct MissingServiceError {
    pub service_name: String,
    pub preferred_version: String,
    pub minimum_version: String,
}

impl MissingServiceError {
    pub fn from_identifier(identifier: &ServiceIdentifier) -> Self {
        Self {
            service_name: identifier.service_name().to_string(),
            preferred_version: identifier
                .preferred_version()
                .unwrap_or(LATEST_TOKEN)
                .to_string(),
            minimum_version: identifier
                .minimum_version()
                .unwrap_or(NONE_TOKEN)
                .to_string(),
        }
    }
}

/// Registry-aware client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No matching instance in the registry. The operationally important
    /// failure: the service is genuinely not there (or not there at the
    /// requested version), as opposed to a client-side bug.
    #[error(transparent)]
    MissingService(#[from] MissingServiceError),

    /// The client was closed; no further resolution or requests are
    /// possible.
    #[error("Client instance has been closed")]
    ClientClosed,

    /// Construction-time validation failure on a service identifier.
    #[error("{0}")]
    InvalidIdentifier(String),

    /// Construction-time validation failure on the client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfiguration(String),

    /// Registry lookup failure, propagated untranslated.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Wrapped HTTP client failure.
    #[error(transparent)]
    Http(#[from] HttpClientError),
}

impl ClientError {
    /// Whether this is the post-close illegal-state error, regardless of
    /// which layer reported it.
    pub fn is_client_closed(&self) -> bool {
        matches!(self, Self::ClientClosed)
            || matches!(self, Self::Http(HttpClientError::ClientClosed))
    }
}
