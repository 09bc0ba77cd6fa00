//! Service identifiers.

use crate::error::ClientError;
use lodestar_discovery::PortType;
use lodestar_http_client::constants::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifies a service to connect to: its name, optional preferred and
/// minimum versions, timeouts, and connector (port) type.
///
/// Instances are immutable. Use [`ServiceIdentifier::with_service_name`] and
/// [`ServiceIdentifier::with_connector`] to derive a copy with just that
/// field replaced. These are useful when you have an identifier with the
/// default [`PortType::Application`] connector but need the
/// [`PortType::Admin`] connector to check service status, or when the
/// versions and timeouts stay the same but the service name differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ServiceIdentifierBuilder")]
pub struct ServiceIdentifier {
    service_name: String,
    preferred_version: Option<String>,
    minimum_version: Option<String>,
    connector: PortType,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl ServiceIdentifier {
    /// Create a builder for a new identifier.
    pub fn builder() -> ServiceIdentifierBuilder {
        ServiceIdentifierBuilder::default()
    }

    /// Identifier with the given service name, the
    /// [`PortType::Application`] connector, no version constraints, and
    /// default timeouts.
    pub fn of(service_name: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().service_name(service_name).build()
    }

    /// Identifier with the given service name and connector, no version
    /// constraints, and default timeouts.
    pub fn of_with_connector(
        service_name: impl Into<String>,
        connector: PortType,
    ) -> Result<Self, ClientError> {
        Self::builder()
            .service_name(service_name)
            .connector(connector)
            .build()
    }

    /// Derive a copy with only the service name replaced. The new name is
    /// validated like any other construction.
    pub fn with_service_name(&self, service_name: impl Into<String>) -> Result<Self, ClientError> {
        self.to_builder().service_name(service_name).build()
    }

    /// Derive a copy with only the connector replaced.
    pub fn with_connector(&self, connector: PortType) -> Self {
        Self {
            connector,
            ..self.clone()
        }
    }

    /// Rebuild a builder populated with this identifier's fields.
    pub fn to_builder(&self) -> ServiceIdentifierBuilder {
        ServiceIdentifierBuilder {
            service_name: Some(self.service_name.clone()),
            preferred_version: self.preferred_version.clone(),
            minimum_version: self.minimum_version.clone(),
            connector: Some(self.connector),
            connect_timeout: Some(self.connect_timeout),
            read_timeout: Some(self.read_timeout),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn preferred_version(&self) -> Option<&str> {
        self.preferred_version.as_deref()
    }

    pub fn minimum_version(&self) -> Option<&str> {
        self.minimum_version.as_deref()
    }

    pub fn connector(&self) -> PortType {
        self.connector
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// The connect timeout in milliseconds as an `i32`.
    ///
    /// Guaranteed not to overflow: construction rejects timeouts beyond
    /// `i32::MAX` milliseconds, because transport APIs that take 32-bit
    /// millisecond values would otherwise fail at request time.
    pub fn connect_timeout_as_millis(&self) -> i32 {
        self.connect_timeout.as_millis() as i32
    }

    /// The read timeout in milliseconds as an `i32`. See
    /// [`Self::connect_timeout_as_millis`] for the overflow guarantee.
    pub fn read_timeout_as_millis(&self) -> i32 {
        self.read_timeout.as_millis() as i32
    }
}

/// Builder for [`ServiceIdentifier`].
///
/// The `*_opt` setters collapse `None` to the documented default, matching
/// the semantics of not calling the setter at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceIdentifierBuilder {
    service_name: Option<String>,
    preferred_version: Option<String>,
    minimum_version: Option<String>,
    connector: Option<PortType>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl ServiceIdentifierBuilder {
    pub fn service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    pub fn preferred_version(mut self, version: impl Into<String>) -> Self {
        self.preferred_version = Some(version.into());
        self
    }

    pub fn minimum_version(mut self, version: impl Into<String>) -> Self {
        self.minimum_version = Some(version.into());
        self
    }

    pub fn connector(mut self, connector: PortType) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn connector_opt(mut self, connector: Option<PortType>) -> Self {
        self.connector = connector;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn connect_timeout_opt(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn read_timeout_opt(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Validate and build the identifier, applying defaults for connector
    /// and timeouts.
    pub fn build(self) -> Result<ServiceIdentifier, ClientError> {
        let service_name = self
            .service_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ClientError::InvalidIdentifier("Service name is required".to_string()))?
            .to_string();

        let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let read_timeout = self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT);

        check_timeout("connect", connect_timeout)?;
        check_timeout("read", read_timeout)?;

        Ok(ServiceIdentifier {
            service_name,
            preferred_version: self.preferred_version,
            minimum_version: self.minimum_version,
            connector: self.connector.unwrap_or_default(),
            connect_timeout,
            read_timeout,
        })
    }
}

fn check_timeout(name: &str, timeout: Duration) -> Result<(), ClientError> {
    let millis = timeout.as_millis();
    if millis > i32::MAX as u128 {
        return Err(ClientError::InvalidIdentifier(format!(
            "{name} timeout must be convertible to a 32-bit millisecond value but {millis} ms exceeds i32::MAX"
        )));
    }
    Ok(())
}

impl TryFrom<ServiceIdentifierBuilder> for ServiceIdentifier {
    type Error = ClientError;

    fn try_from(builder: ServiceIdentifierBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestar_http_client::constants::DEFAULT_CONNECT_TIMEOUT_MILLIS;

    #[test]
    fn of_applies_defaults() {
        let identifier = ServiceIdentifier::of("test-service").unwrap();

        assert_eq!(identifier.service_name(), "test-service");
        assert_eq!(identifier.connector(), PortType::Application);
        assert!(identifier.preferred_version().is_none());
        assert!(identifier.minimum_version().is_none());
        assert_eq!(
            identifier.connect_timeout(),
            Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MILLIS)
        );
        assert_eq!(identifier.read_timeout(), Duration::from_millis(5_000));
    }

    #[test]
    fn of_with_connector_keeps_other_defaults() {
        let identifier =
            ServiceIdentifier::of_with_connector("test-service", PortType::Admin).unwrap();

        assert_eq!(identifier.connector(), PortType::Admin);
        assert!(identifier.preferred_version().is_none());
        assert_eq!(identifier.read_timeout(), Duration::from_millis(5_000));
    }

    #[test]
    fn blank_service_names_are_rejected() {
        for name in ["", " ", "\t", "   "] {
            let result = ServiceIdentifier::of(name);
            match result {
                Err(ClientError::InvalidIdentifier(message)) => {
                    assert_eq!(message, "Service name is required");
                }
                other => panic!("expected InvalidIdentifier, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_service_name_is_rejected() {
        let result = ServiceIdentifier::builder().build();
        assert!(matches!(result, Err(ClientError::InvalidIdentifier(_))));
    }

    #[test]
    fn service_name_is_trimmed() {
        let identifier = ServiceIdentifier::of("  test-service  ").unwrap();
        assert_eq!(identifier.service_name(), "test-service");
    }

    #[test]
    fn overflowing_connect_timeout_is_rejected_with_named_field() {
        let result = ServiceIdentifier::builder()
            .service_name("test-service")
            .connect_timeout(Duration::from_millis(i32::MAX as u64 + 1))
            .build();

        match result {
            Err(ClientError::InvalidIdentifier(message)) => {
                assert!(message.starts_with("connect timeout"));
                assert!(message.contains("2147483648"));
            }
            other => panic!("expected InvalidIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn overflowing_read_timeout_is_rejected_with_named_field() {
        let result = ServiceIdentifier::builder()
            .service_name("test-service")
            .read_timeout(Duration::from_secs(u32::MAX as u64))
            .build();

        match result {
            Err(ClientError::InvalidIdentifier(message)) => {
                assert!(message.starts_with("read timeout"));
            }
            other => panic!("expected InvalidIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn maximum_representable_timeout_is_accepted() {
        let identifier = ServiceIdentifier::builder()
            .service_name("test-service")
            .connect_timeout(Duration::from_millis(i32::MAX as u64))
            .read_timeout(Duration::from_millis(42))
            .build()
            .unwrap();

        assert_eq!(identifier.connect_timeout_as_millis(), i32::MAX);
        assert_eq!(identifier.read_timeout_as_millis(), 42);
    }

    #[test]
    fn opt_setters_collapse_none_to_defaults() {
        let identifier = ServiceIdentifier::builder()
            .service_name("test-service")
            .connector_opt(None)
            .connect_timeout_opt(None)
            .read_timeout_opt(None)
            .build()
            .unwrap();

        assert_eq!(identifier.connector(), PortType::Application);
        assert_eq!(identifier.connect_timeout(), Duration::from_millis(5_000));
        assert_eq!(identifier.read_timeout(), Duration::from_millis(5_000));
    }

    #[test]
    fn clone_is_a_value_copy() {
        let identifier = ServiceIdentifier::builder()
            .service_name("test-service")
            .preferred_version("1.2.3")
            .build()
            .unwrap();

        let copy = identifier.clone();
        assert_eq!(copy, identifier);
        assert_eq!(copy.preferred_version(), Some("1.2.3"));
    }

    #[test]
    fn with_service_name_replaces_only_the_name() {
        let identifier = ServiceIdentifier::builder()
            .service_name("test-service")
            .connector(PortType::Admin)
            .minimum_version("1.0.0")
            .build()
            .unwrap();

        let derived = identifier.with_service_name("other-service").unwrap();

        assert_eq!(derived.service_name(), "other-service");
        assert_eq!(derived.connector(), PortType::Admin);
        assert_eq!(derived.minimum_version(), Some("1.0.0"));
        assert_eq!(identifier.service_name(), "test-service");
    }

    #[test]
    fn with_service_name_validates_the_new_name() {
        let identifier = ServiceIdentifier::of("test-service").unwrap();

        assert!(matches!(
            identifier.with_service_name("  "),
            Err(ClientError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn with_connector_replaces_only_the_connector() {
        let identifier = ServiceIdentifier::of("test-service").unwrap();

        let derived = identifier.with_connector(PortType::Admin);

        assert_eq!(derived.connector(), PortType::Admin);
        assert_eq!(derived.service_name(), "test-service");
        assert_eq!(identifier.connector(), PortType::Application);
    }

    #[test]
    fn deserialization_validates_through_the_builder() {
        let ok: ServiceIdentifier =
            serde_json::from_str(r#"{"service_name": "test-service"}"#).unwrap();
        assert_eq!(ok.connector(), PortType::Application);

        let blank: Result<ServiceIdentifier, _> =
            serde_json::from_str(r#"{"service_name": "  "}"#);
        assert!(blank.is_err());
    }

    #[test]
    fn serde_round_trip_preserves_fields() {
        let identifier = ServiceIdentifier::builder()
            .service_name("test-service")
            .preferred_version("2.0.0")
            .connector(PortType::Admin)
            .build()
            .unwrap();

        let json = serde_json::to_string(&identifier).unwrap();
        let back: ServiceIdentifier = serde_json::from_str(&json).unwrap();

        assert_eq!(back, identifier);
    }
}
