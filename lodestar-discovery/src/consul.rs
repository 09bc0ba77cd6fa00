//! Consul-backed registry client

use crate::client::{InstanceQuery, RegistryClient, RegistryError};
use crate::model::{PortType, Security, ServiceInstance, ServicePaths};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Metadata keys this client reads from a Consul service registration.
mod meta_keys {
    pub const SECURE: &str = "secure";
    pub const ADMIN_PORT: &str = "adminPort";
    pub const HOME_PAGE_PATH: &str = "homePagePath";
    pub const STATUS_PATH: &str = "statusPath";
    pub const VERSION: &str = "version";
}

/// Registry client backed by Consul's HTTP API.
///
/// Looks up healthy instances through `/v1/health/service/{name}` and maps
/// service metadata to ports, paths, and the registered version. Version
/// constraints from the query are applied against the registered version.
pub struct ConsulRegistryClient {
    base_url: String,
    client: reqwest::Client,
}

impl ConsulRegistryClient {
    /// Create a new Consul registry client for the given agent address,
    /// e.g. `http://localhost:8500`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RegistryError> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(RegistryError::InvalidConfiguration(
                "Consul base URL must not be blank".to_string(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        })
    }
}

#[derive(Deserialize)]
struct ConsulHealthEntry {
    #[serde(rename = "Service")]
    service: ConsulServiceDetail,
}

#[derive(Deserialize)]
struct ConsulServiceDetail {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Service")]
    service: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Port")]
    port: u16,
    #[serde(rename = "Meta")]
    meta: Option<HashMap<String, String>>,
}

impl ConsulServiceDetail {
    fn into_instance(self) -> ServiceInstance {
        let meta = self.meta.unwrap_or_default();

        let security = match meta.get(meta_keys::SECURE).map(String::as_str) {
            Some("true") => Security::Secure,
            _ => Security::NotSecure,
        };

        let mut instance = ServiceInstance::new(self.id, self.service, self.address)
            .with_port(self.port, PortType::Application, security);

        if let Some(admin_port) = meta
            .get(meta_keys::ADMIN_PORT)
            .and_then(|p| p.parse::<u16>().ok())
        {
            instance = instance.with_port(admin_port, PortType::Admin, security);
        }

        let mut paths = ServicePaths::default();
        if let Some(home) = meta.get(meta_keys::HOME_PAGE_PATH) {
            paths.home_page_path = home.clone();
        }
        if let Some(status) = meta.get(meta_keys::STATUS_PATH) {
            paths.status_path = status.clone();
        }
        instance = instance.with_paths(paths);

        if let Some(version) = meta.get(meta_keys::VERSION) {
            instance = instance.with_version(version.clone());
        }

        instance.metadata = meta;
        instance
    }
}

#[async_trait]
impl RegistryClient for ConsulRegistryClient {
    async fn find_service_instances_by(
        &self,
        query: &InstanceQuery,
    ) -> Result<Vec<ServiceInstance>, RegistryError> {
        let url = format!(
            "{}/v1/health/service/{}?passing=true",
            self.base_url, query.service_name
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(RegistryError::LookupFailed(format!(
                "Consul health query for {} returned {}",
                query.service_name,
                response.status()
            )));
        }

        let entries: Vec<ConsulHealthEntry> = response.json().await?;

        let instances: Vec<ServiceInstance> = entries
            .into_iter()
            .map(|entry| entry.service.into_instance())
            .filter(|instance| query.matches(instance))
            .collect();

        debug!(
            service = %query.service_name,
            count = instances.len(),
            "Discovered matching instances from Consul"
        );

        Ok(instances)
    }
}
