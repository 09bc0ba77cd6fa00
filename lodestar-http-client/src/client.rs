//! HTTP client implementation.

use http::Method;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use url::Url;

use crate::{
    HttpClientConfig, HttpClientError, RequestBuilder, RequestInterceptor, Response, Result, Target,
};

/// HTTP client wrapping `reqwest` with default headers, registered request
/// interceptors, and close semantics.
///
/// Cloning is cheap and clones share the underlying connection pool,
/// interceptors, and closed state: closing any clone closes them all.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: Arc<HttpClientConfig>,
    interceptors: Arc<RwLock<Vec<Arc<dyn RequestInterceptor>>>>,
    closed: Arc<AtomicBool>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.read_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent);

        if config.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        } else {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        let inner = builder.build()?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            interceptors: Arc::new(RwLock::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(HttpClientConfig::default())
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get the client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Register an interceptor that runs on every subsequent request.
    pub fn register_interceptor(&self, interceptor: Arc<dyn RequestInterceptor>) {
        self.interceptors.write().push(interceptor);
    }

    pub(crate) fn apply_interceptors(&self, headers: &mut http::HeaderMap) {
        for interceptor in self.interceptors.read().iter() {
            interceptor.before_send(headers);
        }
    }

    /// Mark this client closed. Idempotent; requests after close fail with
    /// [`HttpClientError::ClientClosed`].
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("HTTP client closed");
        }
    }

    /// Whether this client (or any clone of it) has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Create a request-building handle bound to the given absolute URI.
    pub fn target(&self, uri: impl AsRef<str>) -> Result<Target> {
        if self.is_closed() {
            return Err(HttpClientError::ClientClosed);
        }
        let uri = Url::parse(uri.as_ref())?;
        Ok(Target::new(self.clone(), uri))
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::GET, url.into())
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::POST, url.into())
    }

    /// Create a PUT request builder.
    pub fn put(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::PUT, url.into())
    }

    /// Create a PATCH request builder.
    pub fn patch(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::PATCH, url.into())
    }

    /// Create a DELETE request builder.
    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::DELETE, url.into())
    }

    /// Create a HEAD request builder.
    pub fn head(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::HEAD, url.into())
    }

    /// Create a request builder with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, method, url.into())
    }

    /// Execute a request, failing immediately if the client is closed.
    pub(crate) async fn execute(&self, request: reqwest::Request) -> Result<Response> {
        if self.is_closed() {
            return Err(HttpClientError::ClientClosed);
        }

        let response = self.inner.execute(request).await?;
        Ok(Response::from_reqwest(response).await?)
    }
}
