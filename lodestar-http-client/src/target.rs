//! Request targets bound to a resolved base URI.

use crate::{HttpClient, HttpClientError, RequestBuilder, Result};
use http::Method;
use url::Url;

/// A request-building handle bound to a base URI on an [`HttpClient`].
///
/// Targets are what service resolution hands back: the URI is fixed, and
/// callers derive sub-paths and requests from it. A target remains tied to
/// its client's lifecycle, so requests through a target fail with
/// [`HttpClientError::ClientClosed`] once the client is closed.
#[derive(Clone)]
pub struct Target {
    client: HttpClient,
    uri: Url,
}

impl Target {
    pub fn new(client: HttpClient, uri: Url) -> Self {
        Self { client, uri }
    }

    /// The URI this target is bound to.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Derive a new target with the given path appended to this target's
    /// path.
    pub fn path(&self, path: &str) -> Result<Self> {
        let mut uri = self.uri.clone();

        {
            let mut segments = uri
                .path_segments_mut()
                .map_err(|_| HttpClientError::InvalidUrl(format!("{} cannot be a base", self.uri)))?;
            segments.pop_if_empty();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }

        Ok(Self {
            client: self.client.clone(),
            uri,
        })
    }

    /// Create a request builder with a custom method against this target's
    /// URI.
    pub fn request(&self, method: Method) -> RequestBuilder<'_> {
        self.client.request(method, self.uri.to_string())
    }

    /// Create a GET request builder.
    pub fn get(&self) -> RequestBuilder<'_> {
        self.request(Method::GET)
    }

    /// Create a POST request builder.
    pub fn post(&self) -> RequestBuilder<'_> {
        self.request(Method::POST)
    }

    /// Create a PUT request builder.
    pub fn put(&self) -> RequestBuilder<'_> {
        self.request(Method::PUT)
    }

    /// Create a PATCH request builder.
    pub fn patch(&self) -> RequestBuilder<'_> {
        self.request(Method::PATCH)
    }

    /// Create a DELETE request builder.
    pub fn delete(&self) -> RequestBuilder<'_> {
        self.request(Method::DELETE)
    }

    /// Create a HEAD request builder.
    pub fn head(&self) -> RequestBuilder<'_> {
        self.request(Method::HEAD)
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target").field("uri", &self.uri).finish()
    }
}
