//! # Lodestar Client
//!
//! A registry-aware HTTP client: address services by logical name and
//! version instead of host and port. Resolution goes through a pluggable
//! [`RegistryClient`](lodestar_discovery::RegistryClient) (e.g. Consul),
//! picks one matching instance at random, and returns a request
//! [`Target`](lodestar_http_client::Target) bound to the instance's URI.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lodestar_client::{RegistryAwareClient, ServiceIdentifier};
//! use lodestar_discovery::{ConsulRegistryClient, PortType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RegistryAwareClient::builder()
//!         .registry_client(ConsulRegistryClient::new("http://localhost:8500")?)
//!         .build()?;
//!
//!     // Application traffic goes to the instance's home page path.
//!     let target = client.target_for_service("billing-service").await?;
//!     let response = target.path("invoices")?.get().send().await?;
//!     println!("{}", response.status());
//!
//!     // Admin traffic resolves to the admin port's root.
//!     let identifier = ServiceIdentifier::of("billing-service")?;
//!     let admin = client
//!         .target_for_identifier_with_connector(&identifier, PortType::Admin)
//!         .await?;
//!     let health = admin.path("healthcheck")?.get().send().await?;
//!     println!("{}", health.status());
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod client;
mod error;
mod identifier;

pub use builder::RegistryAwareClientBuilder;
pub use client::RegistryAwareClient;
pub use error::{ClientError, MissingServiceError, Result};
pub use identifier::{ServiceIdentifier, ServiceIdentifierBuilder};

// Re-export the pieces callers interact with directly.
pub use lodestar_discovery::{
    InstanceQuery, PortType, RegistryClient, Security, ServiceInstance, ServicePaths,
};
pub use lodestar_http_client::{
    HeaderSupplier, HttpClient, HttpClientConfig, HttpClientConfigBuilder, Response, Target,
    constants,
};
