// crates/crudcheck-client/src/transport.rs
// ============================================================================
// Module: HTTP Transport
// Description: Single-attempt synchronous request/response primitive.
// Purpose: Turn every HTTP exchange into a plain value, whatever its status.
// Dependencies: reqwest (blocking), serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! The transport issues one blocking request per call and returns the status
//! and body text as a [`RawResponse`]. 4xx and 5xx responses are ordinary
//! return values; only failures before an HTTP exchange completes (connection
//! refused, timeout, unreadable body) are errors. No retries are applied:
//! each call is a single observation of current server state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use reqwest::Method;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures before an HTTP exchange completes.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint could not be reached.
    #[error("{url} unreachable: {message}")]
    Unreachable {
        /// Target URL.
        url: String,
        /// Underlying client message.
        message: String,
    },
    /// No response within the request timeout.
    #[error("{url} timed out after {timeout_ms} ms")]
    Timeout {
        /// Target URL.
        url: String,
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u128,
    },
    /// The response body could not be read.
    #[error("{url} response body unreadable: {message}")]
    Body {
        /// Target URL.
        url: String,
        /// Underlying client message.
        message: String,
    },
    /// The HTTP client could not be built.
    #[error("http client setup failed: {0}")]
    Client(String),
}

// ============================================================================
// SECTION: Request/Response Types
// ============================================================================

/// A request to issue.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute target URL.
    pub url: Url,
    /// Optional JSON body.
    pub body: Option<Value>,
    /// Per-request timeout overriding the transport default.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a request without a body.
    #[must_use]
    pub const fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
            timeout: None,
        }
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Overrides the timeout for this request only.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text.
    pub text: String,
}

impl RawResponse {
    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the body is not JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.text)
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

// ============================================================================
// SECTION: Transport Trait
// ============================================================================

/// Synchronous request/response primitive.
pub trait Transport {
    /// Sends a request and returns the response whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only when no HTTP exchange completed.
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        (**self).send(request)
    }
}

// ============================================================================
// SECTION: Transcript
// ============================================================================

/// One recorded exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeRecord {
    /// 1-based sequence number.
    pub sequence: u64,
    /// HTTP method.
    pub method: String,
    /// Target URL.
    pub url: String,
    /// Request body when present.
    pub request: Option<Value>,
    /// Response status when an exchange completed.
    pub status: Option<u16>,
    /// Transport error when no exchange completed.
    pub error: Option<String>,
    /// Wall-clock duration in milliseconds.
    pub elapsed_ms: u128,
}

// ============================================================================
// SECTION: Blocking Transport
// ============================================================================

/// Blocking reqwest transport with a uniform timeout and exchange transcript.
#[derive(Clone)]
pub struct BlockingTransport {
    /// Shared HTTP client.
    client: Client,
    /// Default request timeout.
    timeout: Duration,
    /// Recorded exchanges, in order.
    transcript: Arc<Mutex<Vec<ExchangeRecord>>>,
}

impl BlockingTransport {
    /// Builds a transport applying `timeout` to every request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] when the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("crudcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| TransportError::Client(err.to_string()))?;
        Ok(Self {
            client,
            timeout,
            transcript: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Returns the default request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns a snapshot of the transcript entries.
    #[must_use]
    pub fn transcript(&self) -> Vec<ExchangeRecord> {
        self.transcript.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Issues the request without recording it.
    fn exchange(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let timeout = request.timeout.unwrap_or(self.timeout);
        let mut builder =
            self.client.request(request.method.clone(), request.url.as_str()).timeout(timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().map_err(|err| classify(&err, &request.url, timeout))?;
        let status = response.status().as_u16();
        let text = response.text().map_err(|err| TransportError::Body {
            url: request.url.to_string(),
            message: err.to_string(),
        })?;
        Ok(RawResponse {
            status,
            text,
        })
    }

    /// Appends an exchange to the transcript.
    fn record(&self, request: &HttpRequest, outcome: &Result<RawResponse, TransportError>, elapsed: Duration) {
        let Ok(mut guard) = self.transcript.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        guard.push(ExchangeRecord {
            sequence,
            method: request.method.to_string(),
            url: request.url.to_string(),
            request: request.body.clone(),
            status: outcome.as_ref().ok().map(|response| response.status),
            error: outcome.as_ref().err().map(ToString::to_string),
            elapsed_ms: elapsed.as_millis(),
        });
    }
}

impl Transport for BlockingTransport {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let started = Instant::now();
        let outcome = self.exchange(request);
        self.record(request, &outcome, started.elapsed());
        outcome
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a reqwest send failure onto the transport taxonomy.
fn classify(err: &reqwest::Error, url: &Url, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis(),
        };
    }
    TransportError::Unreachable {
        url: url.to_string(),
        message: err.to_string(),
    }
}
