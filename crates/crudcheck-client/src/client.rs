// crates/crudcheck-client/src/client.rs
// ============================================================================
// Module: Resource API Client
// Description: CRUD operations for one resource collection.
// Purpose: Issue typed users API requests without failing on non-2xx statuses.
// Dependencies: reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! [`ResourceApiClient`] binds a [`Transport`] to a base URL and a collection
//! path such as `/api/users/`. Every operation returns the [`RawResponse`];
//! callers inspect `status`. Identifiers are taken as display values so
//! scenarios can send malformed ones (`-1`, `0`, `abc`) and observe the
//! server's validation behavior. Path segments are percent-encoded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use crudcheck_core::PageRequest;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::config::ConfigError;
use crate::config::HarnessConfig;
use crate::transport::BlockingTransport;
use crate::transport::HttpRequest;
use crate::transport::RawResponse;
use crate::transport::Transport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Client
// ============================================================================

/// CRUD client for a single resource collection.
#[derive(Clone)]
pub struct ResourceApiClient<T = BlockingTransport> {
    /// Request transport.
    transport: T,
    /// Service root, always ending in `/`.
    base_url: Url,
    /// Collection URL, always ending in `/`.
    collection_url: Url,
}

impl ResourceApiClient<BlockingTransport> {
    /// Builds a blocking client from harness configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URLs cannot be built or the HTTP
    /// client cannot be created.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, ConfigError> {
        let transport =
            BlockingTransport::new(config.timeout).map_err(|err| ConfigError::Invalid {
                name: "http client".to_string(),
                message: err.to_string(),
            })?;
        Self::new(transport, &config.base_url, &config.resource_path)
    }
}

impl<T: Transport> ResourceApiClient<T> {
    /// Binds `transport` to `resource_path` under `base_url`. A path prefix on
    /// the base URL is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Url`] when the collection URL cannot be built.
    pub fn new(transport: T, base_url: &Url, resource_path: &str) -> Result<Self, ConfigError> {
        let base_url = with_trailing_slash(base_url);
        let relative = resource_path.trim_start_matches('/');
        let relative =
            if relative.ends_with('/') { relative.to_string() } else { format!("{relative}/") };
        let collection_url = base_url.join(&relative).map_err(|err| ConfigError::Url {
            url: format!("{base_url}{relative}"),
            message: err.to_string(),
        })?;
        Ok(Self {
            transport,
            base_url,
            collection_url,
        })
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the service root URL.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the collection URL.
    pub const fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    /// `GET {base}/status` with the transport's default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no exchange completed.
    pub fn status(&self) -> Result<RawResponse, TransportError> {
        self.transport.send(&HttpRequest::new(Method::GET, self.status_url()))
    }

    /// `GET {base}/status` bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no exchange completed in time.
    pub fn status_with_timeout(&self, timeout: Duration) -> Result<RawResponse, TransportError> {
        self.transport
            .send(&HttpRequest::new(Method::GET, self.status_url()).with_timeout(timeout))
    }

    /// `GET` the collection; omitted parameters use server defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no exchange completed.
    pub fn list(&self, page: Option<u64>, size: Option<u64>) -> Result<RawResponse, TransportError> {
        let mut url = self.collection_url.clone();
        {
            let mut query = url.query_pairs_mut();
            if let Some(page) = page {
                query.append_pair("page", &page.to_string());
            }
            if let Some(size) = size {
                query.append_pair("size", &size.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        self.transport.send(&HttpRequest::new(Method::GET, url))
    }

    /// `GET` one validated page of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no exchange completed.
    pub fn list_page(&self, request: PageRequest) -> Result<RawResponse, TransportError> {
        self.list(Some(request.page()), Some(request.size()))
    }

    /// `GET` one resource by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no exchange completed.
    pub fn get(&self, id: impl fmt::Display) -> Result<RawResponse, TransportError> {
        self.transport.send(&HttpRequest::new(Method::GET, self.item_url(id)))
    }

    /// `POST` a new resource.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no exchange completed.
    pub fn create(&self, body: &Value) -> Result<RawResponse, TransportError> {
        self.transport.send(
            &HttpRequest::new(Method::POST, self.collection_url.clone()).with_body(body.clone()),
        )
    }

    /// `PATCH` a resource with a partial body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no exchange completed.
    pub fn update(&self, id: impl fmt::Display, partial_body: &Value) -> Result<RawResponse, TransportError> {
        self.transport
            .send(&HttpRequest::new(Method::PATCH, self.item_url(id)).with_body(partial_body.clone()))
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no exchange completed.
    pub fn delete(&self, id: impl fmt::Display) -> Result<RawResponse, TransportError> {
        self.transport.send(&HttpRequest::new(Method::DELETE, self.item_url(id)))
    }

    /// Sends an arbitrary verb to the collection or to one item, for probing
    /// unsupported methods.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no exchange completed.
    pub fn send_raw(
        &self,
        method: Method,
        id: Option<&str>,
        body: Option<&Value>,
    ) -> Result<RawResponse, TransportError> {
        let url = id.map_or_else(|| self.collection_url.clone(), |id| self.item_url(id));
        let mut request = HttpRequest::new(method, url);
        if let Some(body) = body {
            request = request.with_body(body.clone());
        }
        self.transport.send(&request)
    }

    /// Returns `{base}/status`.
    fn status_url(&self) -> Url {
        let mut url = self.base_url.clone();
        push_segment(&mut url, "status");
        url
    }

    /// Returns `{collection}/{id}` with `id` percent-encoded.
    fn item_url(&self, id: impl fmt::Display) -> Url {
        let mut url = self.collection_url.clone();
        push_segment(&mut url, &id.to_string());
        url
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns `url` with a trailing slash on its path.
fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Replaces a trailing empty segment with `segment`.
fn push_segment(url: &mut Url, segment: &str) {
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
}
