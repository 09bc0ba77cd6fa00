//! Fluent configuration for [`RegistryAwareClient`] instances.

use crate::client::RegistryAwareClient;
use crate::error::{ClientError, Result};
use crate::identifier::ServiceIdentifier;
use http::HeaderMap;
use lodestar_discovery::RegistryClient;
use lodestar_http_client::{HeaderSupplier, HttpClient, HttpClientConfigBuilder};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`RegistryAwareClient`].
///
/// Accumulates HTTP client configuration plus the registry client, then
/// finalizes into an immutable client. The registry client is required;
/// everything else has defaults.
///
/// ```rust,no_run
/// use lodestar_client::RegistryAwareClient;
/// use lodestar_discovery::ConsulRegistryClient;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RegistryAwareClient::builder()
///     .connect_timeout(Duration::from_secs(2))
///     .read_timeout(Duration::from_secs(10))
///     .registry_client(ConsulRegistryClient::new("http://localhost:8500")?)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct RegistryAwareClientBuilder {
    config: HttpClientConfigBuilder,
    http_client: Option<HttpClient>,
    registry_client: Option<Arc<dyn RegistryClient>>,
    headers_supplier: Option<Arc<HeaderSupplier>>,
    rng_seed: Option<u64>,
}

impl RegistryAwareClientBuilder {
    /// Set the connect timeout for the built client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Set the connect timeout in milliseconds.
    pub fn connect_timeout_millis(mut self, millis: u64) -> Self {
        self.config = self.config.connect_timeout_millis(millis);
        self
    }

    /// Set the read timeout for the built client.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.read_timeout(timeout);
        self
    }

    /// Set the read timeout in milliseconds.
    pub fn read_timeout_millis(mut self, millis: u64) -> Self {
        self.config = self.config.read_timeout_millis(millis);
        self
    }

    /// Set connect and read timeouts from a [`ServiceIdentifier`].
    ///
    /// Useful when a client is dedicated to one service and you want its
    /// timeouts to follow that service's identifier (the bulkhead
    /// pattern); the client can still connect anywhere.
    pub fn timeouts_from(self, identifier: &ServiceIdentifier) -> Self {
        self.connect_timeout(identifier.connect_timeout())
            .read_timeout(identifier.read_timeout())
    }

    /// Add a default header sent on every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.default_header(name, value);
        self
    }

    /// Set the user agent for the built client.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.user_agent(user_agent);
        self
    }

    /// Use an already-built [`HttpClient`] instead of building one from
    /// this builder's configuration. Timeout, header, and user-agent
    /// settings on this builder are ignored when set.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the registry client used to find services. Required.
    pub fn registry_client(mut self, registry_client: impl RegistryClient + 'static) -> Self {
        self.registry_client = Some(Arc::new(registry_client));
        self
    }

    /// Set a shared registry client used to find services.
    pub fn shared_registry_client(mut self, registry_client: Arc<dyn RegistryClient>) -> Self {
        self.registry_client = Some(registry_client);
        self
    }

    /// Attach headers from the supplier to every request the built client
    /// sends.
    #[deprecated(
        note = "register a HeaderSupplier interceptor on the HttpClient before wrapping it, so construction stays side-effect free"
    )]
    pub fn headers_supplier<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> Option<HeaderMap> + Send + Sync + 'static,
    {
        self.headers_supplier = Some(Arc::new(HeaderSupplier::new(supplier)));
        self
    }

    /// Seed the instance-selection RNG, making selection deterministic.
    /// Intended for tests.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<RegistryAwareClient> {
        let registry_client = self.registry_client.ok_or_else(|| {
            ClientError::InvalidConfiguration("Registry client is required".to_string())
        })?;

        let client = match self.http_client {
            Some(client) => client,
            None => HttpClient::new(self.config.build())?,
        };

        if let Some(supplier) = self.headers_supplier {
            client.register_interceptor(supplier);
        }

        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(RegistryAwareClient::with_rng(client, registry_client, rng))
    }
}
