//! Lookup client
//!
//! One lookup is at most one upstream round trip:
//! 1. Check preconditions (configuration, phone, name) before any I/O
//! 2. Build the request for the configured style
//! 3. Classify the response: records, not found, or upstream failure
//! 4. Coerce every returned payload into a `CallerRecord`
//!
//! No retries, no caching, no timeout beyond the hosting request's own.

use crate::config::{LookupConfig, RequestStyle};
use crate::error::{InputField, LookupError, LookupResult, UpstreamFailure};
use crate::transport::{HttpMethod, ReqwestTransport, UpstreamRequest, UpstreamResponse, UpstreamTransport};
use callerid_phone::CanonicalPhone;
use callerid_record::{CallerRecord, Coercer};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Url;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::instrument;

/// Upstream status meaning "no match" in name-qualified deployments
const NOT_FOUND_STATUS: u16 = 404;

/// First/last name pair for name-qualified lookups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallerName {
    /// Given name
    pub first: String,
    /// Family name
    pub last: String,
}

impl CallerName {
    /// Create name pair (values are trimmed)
    #[must_use]
    pub fn new(first: impl AsRef<str>, last: impl AsRef<str>) -> Self {
        Self {
            first: first.as_ref().trim().to_string(),
            last: last.as_ref().trim().to_string(),
        }
    }

    /// True when neither part is present
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.first.trim().is_empty() && self.last.trim().is_empty()
    }
}

/// Successful lookup result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// One or more matching callers
    Found(Vec<CallerRecord>),
    /// Zero matches; renderable, not an error
    NotFound,
}

impl LookupOutcome {
    /// Wrap coerced records, mapping an empty list to `NotFound`
    #[must_use]
    pub fn from_records(records: Vec<CallerRecord>) -> Self {
        if records.is_empty() {
            Self::NotFound
        } else {
            Self::Found(records)
        }
    }

    /// Matching records (empty for `NotFound`)
    #[must_use]
    pub fn records(&self) -> &[CallerRecord] {
        match self {
            Self::Found(records) => records,
            Self::NotFound => &[],
        }
    }

    /// First matching record
    #[must_use]
    pub fn primary(&self) -> Option<&CallerRecord> {
        self.records().first()
    }

    /// True for `NotFound`
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Upstream lookup client
pub struct LookupClient<T = ReqwestTransport> {
    config: LookupConfig,
    coercer: Coercer,
    transport: T,
}

impl LookupClient<ReqwestTransport> {
    /// Create client with the reqwest transport
    ///
    /// # Errors
    /// `LookupError::Configuration` if the alias table cannot be resolved or
    /// the HTTP client cannot be built.
    pub fn from_config(config: LookupConfig) -> LookupResult<Self> {
        let transport = ReqwestTransport::new(config.connect_timeout_secs.map(Duration::from_secs))
            .map_err(|e| LookupError::invalid_setting("http client", e))?;
        Self::with_transport(config, transport)
    }
}

impl<T: UpstreamTransport> LookupClient<T> {
    /// Create client with a given transport
    ///
    /// # Errors
    /// `LookupError::Configuration` if the alias table cannot be resolved.
    pub fn with_transport(config: LookupConfig, transport: T) -> LookupResult<Self> {
        let coercer = config.coercer()?;
        Ok(Self {
            config,
            coercer,
            transport,
        })
    }

    /// Client configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Coercer applied to upstream payloads
    #[inline]
    #[must_use]
    pub fn coercer(&self) -> &Coercer {
        &self.coercer
    }

    /// Look up a caller
    ///
    /// # Arguments
    /// * `phone` - Canonical phone (empty fails validation)
    /// * `name` - First/last name; mandatory in name-qualified deployments
    ///
    /// # Errors
    /// - `LookupError::Configuration` if endpoint or credential is missing
    /// - `LookupError::Validation` if phone or a required name is missing
    /// - `LookupError::Upstream` on network error, unexpected status or
    ///   malformed body
    #[instrument(skip(self, phone, name), fields(phone = %phone, style = %self.config.style))]
    pub async fn lookup(
        &self,
        phone: &CanonicalPhone,
        name: Option<&CallerName>,
    ) -> LookupResult<LookupOutcome> {
        let request = self.prepare(phone, name)?;
        tracing::debug!(method = ?request.method, url = %request.url, "Sending upstream request");

        let response = self.transport.send(request).await.map_err(|failure| {
            tracing::warn!("Upstream request failed: {}", failure);
            LookupError::from(failure)
        })?;

        let outcome = self.interpret(phone, &response)?;
        tracing::info!(
            status = response.status,
            records = outcome.records().len(),
            "Lookup completed"
        );
        Ok(outcome)
    }

    /// Check preconditions and build the upstream request
    ///
    /// Performs no I/O.
    ///
    /// # Errors
    /// Configuration and validation errors, in that order.
    pub fn prepare(
        &self,
        phone: &CanonicalPhone,
        name: Option<&CallerName>,
    ) -> LookupResult<UpstreamRequest> {
        let endpoint = self.config.required_endpoint()?;
        let token = self.config.required_token()?;
        check_endpoint(endpoint)?;
        HeaderValue::from_str(token).map_err(|e| LookupError::invalid_setting("token", e))?;
        if self.config.style == RequestStyle::VerificationToken {
            HeaderName::from_bytes(self.config.token_header.as_bytes())
                .map_err(|e| LookupError::invalid_setting("token_header", e))?;
        }

        if phone.is_empty() {
            return Err(LookupError::missing_input(InputField::Phone));
        }

        let name = name.filter(|n| !n.is_blank());
        if self.config.require_name {
            let supplied = name.cloned().unwrap_or_default();
            if supplied.first.trim().is_empty() {
                return Err(LookupError::missing_input(InputField::FirstName));
            }
            if supplied.last.trim().is_empty() {
                return Err(LookupError::missing_input(InputField::LastName));
            }
        }

        let request = match self.config.style {
            RequestStyle::Query => {
                let mut request = UpstreamRequest::new(HttpMethod::Get, endpoint);
                request.query.push(("phone".into(), phone.to_string()));
                if let Some(name) = name {
                    push_non_empty(&mut request.query, "first_name", &name.first);
                    push_non_empty(&mut request.query, "last_name", &name.last);
                }
                request.bearer = Some(token.to_string());
                request
            }
            RequestStyle::VerificationToken => {
                let mut body = Map::new();
                body.insert("phone_number".into(), json!(phone.digits()));
                if let Some(name) = name {
                    if !name.first.is_empty() {
                        body.insert("first_name".into(), json!(name.first));
                    }
                    if !name.last.is_empty() {
                        body.insert("last_name".into(), json!(name.last));
                    }
                }
                let mut request = UpstreamRequest::new(HttpMethod::Post, endpoint);
                request
                    .headers
                    .push((self.config.token_header.clone(), token.to_string()));
                request.json_body = Some(Value::Object(body));
                request
            }
        };

        Ok(request)
    }

    /// Classify a raw response and coerce its payloads
    ///
    /// # Errors
    /// `LookupError::Upstream` for non-2xx statuses (other than a
    /// name-qualified 404) and non-JSON bodies.
    pub fn interpret(
        &self,
        phone: &CanonicalPhone,
        response: &UpstreamResponse,
    ) -> LookupResult<LookupOutcome> {
        if !response.is_success() {
            if self.config.require_name && response.status == NOT_FOUND_STATUS {
                tracing::info!("Upstream reported no match");
                return Ok(LookupOutcome::NotFound);
            }
            let failure =
                UpstreamFailure::status(response.status, &response.status_text, &response.body);
            tracing::warn!("Upstream returned error status: {}", failure);
            return Err(failure.into());
        }

        let payloads = parse_payloads(&response.body).map_err(|failure| {
            tracing::warn!("Upstream body rejected: {}", failure);
            LookupError::from(failure)
        })?;

        let records = payloads
            .iter()
            .map(|payload| self.coercer.coerce(payload, phone))
            .collect();

        Ok(LookupOutcome::from_records(records))
    }
}

impl<T> fmt::Debug for LookupClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Split a 2xx body into zero or more raw payloads
///
/// Arrays yield their (non-null) elements, objects yield themselves, `null`
/// and an empty body yield nothing.
///
/// # Errors
/// `UpstreamFailure::MalformedBody` when the body is not JSON.
pub fn parse_payloads(body: &str) -> Result<Vec<Value>, UpstreamFailure> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| UpstreamFailure::malformed(e, body))?;

    Ok(match value {
        Value::Array(items) => items.into_iter().filter(|item| !item.is_null()).collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    })
}

/// Endpoint must be an absolute http(s) URL
fn check_endpoint(endpoint: &str) -> LookupResult<()> {
    let url = Url::parse(endpoint).map_err(|e| LookupError::invalid_setting("endpoint", e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(LookupError::invalid_setting(
            "endpoint",
            format!("unsupported scheme '{other}'"),
        )),
    }
}

fn push_non_empty(query: &mut Vec<(String, String)>, key: &str, value: &str) {
    if !value.is_empty() {
        query.push((key.to_string(), value.to_string()));
    }
}
