//! Upstream HTTP transport
//!
//! The lookup client builds an [`UpstreamRequest`] and hands it to an
//! [`UpstreamTransport`]. Production uses reqwest; tests substitute a mock.

use crate::error::UpstreamFailure;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// HTTP method used for the lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Query-style lookup
    Get,
    /// Verification-token lookup
    Post,
}

/// Fully-built upstream request
#[derive(Clone, PartialEq)]
pub struct UpstreamRequest {
    /// Method
    pub method: HttpMethod,
    /// Endpoint URL
    pub url: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// Extra headers, in order
    pub headers: Vec<(String, String)>,
    /// Bearer credential for `Authorization`
    pub bearer: Option<String>,
    /// JSON request body
    pub json_body: Option<Value>,
}

impl UpstreamRequest {
    /// Create request without parameters
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            bearer: None,
            json_body: None,
        }
    }

    /// Value of a query parameter
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a header (case-insensitive name)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl std::fmt::Debug for UpstreamRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("UpstreamRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("query", &self.query)
            .field("headers", &header_names)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field("json_body", &self.json_body)
            .finish()
    }
}

/// Raw upstream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase, `""` if unknown
    pub status_text: String,
    /// Response body as text
    pub body: String,
}

impl UpstreamResponse {
    /// Create new response
    #[must_use]
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// 2xx status
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response
///
/// Implementations report transport-level failures as
/// `UpstreamFailure::Network`; status interpretation belongs to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Perform the round trip
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamFailure>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create transport
    ///
    /// No request timeout is set: cancellation follows the hosting request.
    ///
    /// # Errors
    /// Returns the reqwest error if the client cannot be built (TLS backend).
    pub fn new(connect_timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an existing client
    #[inline]
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpstreamTransport for ReqwestTransport {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamFailure> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        builder = builder.header(reqwest::header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.json_body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(UpstreamFailure::network)?;
        let status = response.status();
        let body = response.text().await.map_err(UpstreamFailure::network)?;

        Ok(UpstreamResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}
