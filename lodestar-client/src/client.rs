//! The registry-aware client.

use crate::builder::RegistryAwareClientBuilder;
use crate::error::{ClientError, MissingServiceError, Result};
use crate::identifier::ServiceIdentifier;
use lodestar_discovery::{InstanceQuery, PortType, RegistryClient, ServiceInstance};
use lodestar_http_client::{HttpClient, Method, RequestBuilder, Target};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// An HTTP client that resolves request targets through a service registry.
///
/// Wraps a plain [`HttpClient`] and adds `target_for_*` operations: given a
/// service name or [`ServiceIdentifier`], look the service up in the
/// registry, pick one instance (uniformly at random when several match),
/// and return a [`Target`] bound to the instance's URI. The wrapped
/// client's request API stays available, so existing plain-client call
/// sites keep working.
///
/// Every resolution performs a fresh registry lookup; nothing is cached, so
/// registry membership changes are picked up immediately.
pub struct RegistryAwareClient {
    client: HttpClient,
    registry_client: Arc<dyn RegistryClient>,
    rng: Mutex<StdRng>,
    closed: AtomicBool,
}

impl std::fmt::Debug for RegistryAwareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryAwareClient")
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl RegistryAwareClient {
    /// Wrap an existing client and registry client.
    pub fn new(client: HttpClient, registry_client: Arc<dyn RegistryClient>) -> Self {
        Self::with_rng(client, registry_client, StdRng::from_os_rng())
    }

    pub(crate) fn with_rng(
        client: HttpClient,
        registry_client: Arc<dyn RegistryClient>,
        rng: StdRng,
    ) -> Self {
        Self {
            client,
            registry_client,
            rng: Mutex::new(rng),
            closed: AtomicBool::new(false),
        }
    }

    /// Create a builder for configuring a new client.
    pub fn builder() -> RegistryAwareClientBuilder {
        RegistryAwareClientBuilder::default()
    }

    /// The underlying plain client. An escape hatch; most callers should
    /// go through the `target_for_*` operations instead.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub(crate) fn registry_client(&self) -> &Arc<dyn RegistryClient> {
        &self.registry_client
    }

    /// Resolve a target for the latest available version of the named
    /// service, using its application connector.
    pub async fn target_for_service(&self, service_name: &str) -> Result<Target> {
        let identifier = ServiceIdentifier::of(service_name)?;
        self.target_for_identifier(&identifier).await
    }

    /// Resolve a target for the named service using the given connector.
    pub async fn target_for_service_with_connector(
        &self,
        service_name: &str,
        connector: PortType,
    ) -> Result<Target> {
        let identifier = ServiceIdentifier::of_with_connector(service_name, connector)?;
        self.target_for_identifier(&identifier).await
    }

    /// Resolve a target for the service described by the identifier.
    pub async fn target_for_identifier(&self, identifier: &ServiceIdentifier) -> Result<Target> {
        self.resolve_target(identifier, None).await
    }

    /// Resolve a target for a copy of the identifier with its connector
    /// overridden.
    ///
    /// With the [`PortType::Admin`] connector the target is bound to the
    /// admin root (`/`), not the instance's status path; append
    /// health/status sub-paths to the returned target, or use
    /// [`Self::target_for_identifier_with_path`] to resolve the path from
    /// the instance.
    pub async fn target_for_identifier_with_connector(
        &self,
        identifier: &ServiceIdentifier,
        connector: PortType,
    ) -> Result<Target> {
        let derived = identifier.with_connector(connector);
        self.resolve_target(&derived, None).await
    }

    /// Resolve a target for a copy of the identifier with its connector
    /// overridden, taking the path from `path_resolver` applied to the
    /// selected instance instead of the default path rule.
    pub async fn target_for_identifier_with_path<F>(
        &self,
        identifier: &ServiceIdentifier,
        connector: PortType,
        path_resolver: F,
    ) -> Result<Target>
    where
        F: Fn(&ServiceInstance) -> String + Send + Sync,
    {
        let derived = identifier.with_connector(connector);
        self.resolve_target(&derived, Some(&path_resolver)).await
    }

    async fn resolve_target(
        &self,
        identifier: &ServiceIdentifier,
        path_resolver: Option<&(dyn Fn(&ServiceInstance) -> String + Send + Sync)>,
    ) -> Result<Target> {
        if self.is_closed() {
            return Err(ClientError::ClientClosed);
        }

        let query = InstanceQuery {
            service_name: identifier.service_name().to_string(),
            preferred_version: identifier.preferred_version().map(str::to_string),
            minimum_version: identifier.minimum_version().map(str::to_string),
        };

        trace!(
            service = %query.service_name,
            preferred_version = ?query.preferred_version,
            minimum_version = ?query.minimum_version,
            "Finding service instances"
        );

        let instances = self
            .registry_client
            .find_service_instances_by(&query)
            .await?;

        if instances.is_empty() {
            return Err(MissingServiceError::from_identifier(identifier).into());
        }

        let instance = self.select_instance(&instances);
        debug!(
            service = %identifier.service_name(),
            instance = %instance.instance_id,
            host = %instance.host_name,
            matches = instances.len(),
            "Selected service instance"
        );

        let path = match path_resolver {
            Some(resolver) => resolver(instance),
            None => default_path(identifier.connector(), instance),
        };

        let uri = instance.url_for(identifier.connector(), &path);
        Ok(self.client.target(uri)?)
    }

    /// Pick one instance uniformly at random. Selection is call-local:
    /// repeated resolutions redraw from whatever the registry currently
    /// returns.
    fn select_instance<'a>(&self, instances: &'a [ServiceInstance]) -> &'a ServiceInstance {
        if instances.len() == 1 {
            return &instances[0];
        }
        let index = self.rng.lock().random_range(0..instances.len());
        &instances[index]
    }

    /// Close this client and the wrapped client. Idempotent: the wrapped
    /// client is closed exactly once, even under concurrent calls.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.client.close();
        }
    }

    /// Whether this client has been closed (directly or through the
    /// wrapped client).
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || self.client.is_closed()
    }

    /// Create a request-building handle bound to the given absolute URI on
    /// the wrapped client.
    pub fn target(&self, uri: impl AsRef<str>) -> lodestar_http_client::Result<Target> {
        self.client.target(uri)
    }

    /// Create a GET request builder on the wrapped client.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.client.get(url)
    }

    /// Create a POST request builder on the wrapped client.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.client.post(url)
    }

    /// Create a PUT request builder on the wrapped client.
    pub fn put(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.client.put(url)
    }

    /// Create a PATCH request builder on the wrapped client.
    pub fn patch(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.client.patch(url)
    }

    /// Create a DELETE request builder on the wrapped client.
    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.client.delete(url)
    }

    /// Create a HEAD request builder on the wrapped client.
    pub fn head(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.client.head(url)
    }

    /// Create a request builder with a custom method on the wrapped client.
    pub fn request(&self, method: Method, url: impl Into<String>) -> RequestBuilder<'_> {
        self.client.request(method, url)
    }
}

fn default_path(connector: PortType, instance: &ServiceInstance) -> String {
    match connector {
        PortType::Application => instance.paths.home_page_path.clone(),
        PortType::Admin => "/".to_string(),
    }
}
