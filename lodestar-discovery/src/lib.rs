//! Service registry model and lookup clients for Lodestar
//!
//! This crate defines the registry-entry data model (instances, typed ports,
//! well-known paths) and the [`RegistryClient`] lookup contract, with a
//! Consul-backed production client and in-memory clients for tests and local
//! development.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lodestar_discovery::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ConsulRegistryClient::new("http://localhost:8500")?;
//!
//!     let query = InstanceQuery::new("billing-service").with_minimum_version("2.1.0");
//!     let instances = registry.find_service_instances_by(&query).await?;
//!
//!     for instance in instances {
//!         println!("{}", instance.url_for(PortType::Application, "/"));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod consul;
pub mod memory;
pub mod model;

pub use client::{InstanceQuery, RegistryClient, RegistryError};
pub use consul::ConsulRegistryClient;
pub use memory::{InMemoryRegistryClient, NoOpRegistryClient};
pub use model::{Port, PortType, Security, ServiceInstance, ServicePaths};
