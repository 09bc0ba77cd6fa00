//! # Lodestar HTTP Client
//!
//! The plain HTTP client underneath Lodestar's registry-aware client:
//! request targets bound to resolved URIs, header-supplier interceptors,
//! default headers, and close semantics (requests after `close()` fail with
//! an illegal-state error).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lodestar_http_client::{HttpClient, HttpClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new(HttpClientConfig::default())?;
//!
//!     let response = client
//!         .get("https://api.example.com/users")
//!         .send()
//!         .await?;
//!
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Targets
//!
//! ```rust,no_run
//! # use lodestar_http_client::HttpClient;
//! # async fn example(client: HttpClient) -> Result<(), Box<dyn std::error::Error>> {
//! let target = client.target("https://billing.internal:8080/home")?;
//! let response = target.path("invoices")?.get().send().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
pub mod constants;
mod error;
mod interceptor;
mod request;
mod response;
mod target;

pub use client::HttpClient;
pub use config::{HttpClientConfig, HttpClientConfigBuilder};
pub use error::{HttpClientError, Result};
pub use interceptor::{HeaderSupplier, RequestInterceptor};
pub use request::RequestBuilder;
pub use response::Response;
pub use target::Target;

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
pub use url::Url;
