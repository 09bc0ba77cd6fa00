// Lodestar - a registry-aware HTTP client for Rust
//
// Callers address services by logical name and version; Lodestar resolves
// a concrete instance through a service registry (e.g. Consul) and hands
// back a ready-to-use request target.

// Re-export the registry-aware client surface
pub use lodestar_client::*;

// Re-export the member crates for direct access
pub use lodestar_discovery;
pub use lodestar_http_client;

// Prelude for common imports
pub mod prelude {
    pub use lodestar_client::{
        ClientError, MissingServiceError, RegistryAwareClient, RegistryAwareClientBuilder,
        ServiceIdentifier,
    };
    pub use lodestar_discovery::{
        ConsulRegistryClient, InMemoryRegistryClient, InstanceQuery, NoOpRegistryClient, Port,
        PortType, RegistryClient, RegistryError, Security, ServiceInstance, ServicePaths,
    };
    pub use lodestar_http_client::{
        HeaderSupplier, HttpClient, HttpClientConfig, HttpClientError, Response, Target,
    };
}
