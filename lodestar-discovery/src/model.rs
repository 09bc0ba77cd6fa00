//! Registry entry data model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Logical class of a network endpoint on a service instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// Normal service traffic
    #[default]
    Application,

    /// Operational/management traffic (health, status, tasks)
    Admin,
}

/// Whether an endpoint expects TLS connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Security {
    #[default]
    Secure,
    NotSecure,
}

impl Security {
    /// URI scheme for endpoints with this security setting.
    pub fn scheme(&self) -> &'static str {
        match self {
            Security::Secure => "https",
            Security::NotSecure => "http",
        }
    }
}

/// A single port registered for a service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub number: u16,
    pub port_type: PortType,
    pub security: Security,
}

impl Port {
    pub fn new(number: u16, port_type: PortType, security: Security) -> Self {
        Self {
            number,
            port_type,
            security,
        }
    }
}

/// Well-known paths registered for a service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePaths {
    /// Base path for application requests
    pub home_page_path: String,

    /// Status/health path on the admin endpoint
    pub status_path: String,
}

impl Default for ServicePaths {
    fn default() -> Self {
        Self {
            home_page_path: "/".to_string(),
            status_path: "/ping".to_string(),
        }
    }
}

impl ServicePaths {
    /// Paths with the given home page path and the default status path.
    pub fn with_home_page_path(path: impl Into<String>) -> Self {
        Self {
            home_page_path: path.into(),
            ..Self::default()
        }
    }
}

/// One registered, reachable process backing a logical service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Instance ID (unique per instance)
    pub instance_id: String,

    /// Logical service name
    pub service_name: String,

    /// Host name or IP address
    pub host_name: String,

    /// Registered ports, tagged by type and security
    pub ports: Vec<Port>,

    /// Registered well-known paths
    pub paths: ServicePaths,

    /// Registered version, if the service reported one
    pub version: Option<String>,

    /// Additional registry metadata
    pub metadata: HashMap<String, String>,
}

impl ServiceInstance {
    /// Create a new service instance with no ports, default paths, and no version.
    pub fn new(
        instance_id: impl Into<String>,
        service_name: impl Into<String>,
        host_name: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            service_name: service_name.into(),
            host_name: host_name.into(),
            ports: Vec::new(),
            paths: ServicePaths::default(),
            version: None,
            metadata: HashMap::new(),
        }
    }

    /// Add a port.
    pub fn with_port(mut self, number: u16, port_type: PortType, security: Security) -> Self {
        self.ports.push(Port::new(number, port_type, security));
        self
    }

    /// Set the registered paths.
    pub fn with_paths(mut self, paths: ServicePaths) -> Self {
        self.paths = paths;
        self
    }

    /// Set the registered version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Find the port to use for the given port type.
    ///
    /// Returns the first port in registration order whose type matches. When
    /// the instance registered no port of that type, falls back to a
    /// not-secure port 80, so URI construction always produces something
    /// addressable.
    pub fn port_for(&self, port_type: PortType) -> Port {
        self.ports
            .iter()
            .find(|p| p.port_type == port_type)
            .copied()
            .unwrap_or(Port::new(80, port_type, Security::NotSecure))
    }

    /// Build a URL string for the given port type and path.
    ///
    /// The scheme follows the selected port's security setting and the path
    /// is normalized to a single leading slash.
    pub fn url_for(&self, port_type: PortType, path: &str) -> String {
        let port = self.port_for(port_type);
        format!(
            "{}://{}:{}/{}",
            port.security.scheme(),
            self.host_name,
            port.number,
            path.trim_start_matches('/')
        )
    }
}
