//! Integration tests for common Lodestar workflows.
//!
//! These tests run the whole path end to end: register an instance, resolve
//! it through the registry-aware client, and send real requests to a local
//! mock server.

use lodestar::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Register `server` in the given registry as an instance of `service_name`,
/// with its application port on the mock server and a known home page path.
async fn register_mock_service(
    registry: &InMemoryRegistryClient,
    server: &MockServer,
    service_name: &str,
) {
    let port = server.address().port();
    let instance = ServiceInstance::new(
        format!("{service_name}-1"),
        service_name,
        server.address().ip().to_string(),
    )
    .with_port(port, PortType::Application, Security::NotSecure)
    .with_paths(ServicePaths::with_home_page_path("/api"));

    registry.register(instance).await;
}

#[tokio::test]
async fn resolve_and_request_through_the_registry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orders": []})))
        .mount(&server)
        .await;

    let registry = InMemoryRegistryClient::new();
    register_mock_service(&registry, &server, "order-service").await;

    let client = RegistryAwareClient::builder()
        .registry_client(registry)
        .build()
        .unwrap();

    let target = client.target_for_service("order-service").await.unwrap();
    let response = target.path("orders").unwrap().get().send().await.unwrap();

    assert!(response.is_success());
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["orders"], json!([]));
}

#[tokio::test]
async fn request_builders_carry_query_parameters_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .and(query_param("state", "open"))
        .and(header("X-Caller", "integration-test"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let registry = InMemoryRegistryClient::new();
    register_mock_service(&registry, &server, "order-service").await;

    let client = RegistryAwareClient::builder()
        .registry_client(registry)
        .default_header("X-Caller", "integration-test")
        .build()
        .unwrap();

    let target = client.target_for_service("order-service").await.unwrap();
    let response = target
        .path("orders")
        .unwrap()
        .get()
        .query("state", "open")
        .send()
        .await
        .unwrap();

    assert!(response.is_success());
}

#[tokio::test]
async fn consul_backed_resolution_end_to_end() {
    // One mock serves as the actual service...
    let service = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&service)
        .await;

    // ...and another plays Consul, advertising it.
    let consul = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/health/service/hello-service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "Node": {"Node": "node-1", "Address": "127.0.0.1"},
            "Service": {
                "ID": "hello-1",
                "Service": "hello-service",
                "Address": service.address().ip().to_string(),
                "Port": service.address().port(),
                "Tags": [],
                "Meta": {"homePagePath": "/home", "version": "1.0.0"}
            },
            "Checks": []
        }])))
        .mount(&consul)
        .await;

    let client = RegistryAwareClient::builder()
        .registry_client(ConsulRegistryClient::new(consul.uri()).unwrap())
        .build()
        .unwrap();

    let target = client.target_for_service("hello-service").await.unwrap();
    let response = target.get().send().await.unwrap();

    assert!(response.is_success());
    assert_eq!(response.text().unwrap(), "hello");
}

#[tokio::test]
async fn missing_service_reports_the_exact_diagnostic() {
    let client = RegistryAwareClient::builder()
        .registry_client(NoOpRegistryClient)
        .build()
        .unwrap();

    let error = client.target_for_service("ghost-service").await.unwrap_err();

    assert!(matches!(error, ClientError::MissingService(_)));
    assert_eq!(
        error.to_string(),
        "No service instances found with name ghost-service, preferred version [latest], min version [none]"
    );
}

#[tokio::test]
async fn closed_client_fails_resolution_with_an_illegal_state_error() {
    let registry = InMemoryRegistryClient::new();
    let server = MockServer::start().await;
    register_mock_service(&registry, &server, "order-service").await;

    let client = RegistryAwareClient::builder()
        .registry_client(registry)
        .build()
        .unwrap();

    client.close();

    let error = client.target_for_service("order-service").await.unwrap_err();
    assert!(error.is_client_closed());
    assert!(!matches!(error, ClientError::MissingService(_)));
}

#[tokio::test]
async fn resolution_sees_registry_changes_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let registry = InMemoryRegistryClient::new();
    let client = RegistryAwareClient::builder()
        .registry_client(registry.clone())
        .build()
        .unwrap();

    // Not registered yet: missing service.
    let error = client.target_for_service("order-service").await.unwrap_err();
    assert!(matches!(error, ClientError::MissingService(_)));

    // Register, and the very next lookup finds it.
    register_mock_service(&registry, &server, "order-service").await;
    let target = client.target_for_service("order-service").await.unwrap();
    let response = target.get().send().await.unwrap();
    assert!(response.is_success());

    // Deregister, and it is gone again.
    registry.clear().await;
    let error = client.target_for_service("order-service").await.unwrap_err();
    assert!(matches!(error, ClientError::MissingService(_)));
}
