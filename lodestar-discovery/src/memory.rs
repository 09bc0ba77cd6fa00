//! In-memory registry clients (for testing and local development)

use crate::client::{InstanceQuery, RegistryClient, RegistryError};
use crate::model::ServiceInstance;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Registry client over an in-memory instance store.
///
/// Lookups apply the same name and version matching as the Consul client,
/// so tests exercise identical semantics.
#[derive(Clone, Default)]
pub struct InMemoryRegistryClient {
    instances: Arc<RwLock<HashMap<String, ServiceInstance>>>,
}

impl InMemoryRegistryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance, replacing any previous registration with the
    /// same instance ID.
    pub async fn register(&self, instance: ServiceInstance) {
        self.instances
            .write()
            .await
            .insert(instance.instance_id.clone(), instance);
    }

    /// Remove an instance by ID. Returns whether anything was removed.
    pub async fn deregister(&self, instance_id: &str) -> bool {
        self.instances.write().await.remove(instance_id).is_some()
    }

    /// Remove all registered instances.
    pub async fn clear(&self) {
        self.instances.write().await.clear();
    }

    /// Number of registered instances.
    pub async fn count(&self) -> usize {
        self.instances.read().await.len()
    }
}

#[async_trait]
impl RegistryClient for InMemoryRegistryClient {
    async fn find_service_instances_by(
        &self,
        query: &InstanceQuery,
    ) -> Result<Vec<ServiceInstance>, RegistryError> {
        let instances = self.instances.read().await;

        Ok(instances
            .values()
            .filter(|instance| query.matches(instance))
            .cloned()
            .collect())
    }
}

/// Registry client that never finds anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpRegistryClient;

#[async_trait]
impl RegistryClient for NoOpRegistryClient {
    async fn find_service_instances_by(
        &self,
        _query: &InstanceQuery,
    ) -> Result<Vec<ServiceInstance>, RegistryError> {
        Ok(Vec::new())
    }
}
