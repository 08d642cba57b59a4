//! Request pipeline
//!
//! normalize → (demo fixture | upstream lookup) → report. One query
//! produces exactly one `LookupReport`; the pipeline never returns an error.

use crate::client::{CallerName, LookupClient};
use crate::demo::{fixture_record, DEMO_PHONE};
use crate::error::LookupResult;
use crate::report::LookupReport;
use crate::transport::{ReqwestTransport, UpstreamTransport};
use callerid_phone::{normalize_with_confidence, CanonicalPhone};
use tracing::instrument;

/// Caller query as received from the embedding page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerQuery {
    /// Raw phone, any format
    pub phone: String,
    /// First name, if supplied
    pub first: Option<String>,
    /// Last name, if supplied
    pub last: Option<String>,
    /// Serve the demo fixture instead of calling upstream
    pub demo: bool,
}

impl CallerQuery {
    /// Query for a raw phone
    #[must_use]
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// With first and last name
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first = Some(first.into());
        self.last = Some(last.into());
        self
    }

    /// With demo flag
    #[inline]
    #[must_use]
    pub fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    /// Build from query-string pairs
    ///
    /// Recognizes `phone`, `first`, `last` and `demo`; `demo` is enabled only
    /// by the exact value `"1"`. Unknown keys are ignored, later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value: String = value.into();
            match key.as_ref() {
                "phone" => query.phone = value,
                "first" => query.first = Some(value),
                "last" => query.last = Some(value),
                "demo" => query.demo = value == "1",
                _ => {}
            }
        }
        query
    }

    /// Supplied name, `None` when both parts are absent or blank
    #[must_use]
    pub fn name(&self) -> Option<CallerName> {
        let name = CallerName::new(
            self.first.as_deref().unwrap_or_default(),
            self.last.as_deref().unwrap_or_default(),
        );
        (!name.is_blank()).then_some(name)
    }
}

/// Caller lookup pipeline
#[derive(Debug)]
pub struct Pipeline<T = ReqwestTransport> {
    client: LookupClient<T>,
}

impl Pipeline<ReqwestTransport> {
    /// Pipeline over the reqwest transport
    ///
    /// # Errors
    /// See [`LookupClient::from_config`].
    pub fn from_config(config: crate::config::LookupConfig) -> LookupResult<Self> {
        Ok(Self::new(LookupClient::from_config(config)?))
    }
}

impl<T: UpstreamTransport> Pipeline<T> {
    /// Create pipeline around a client
    #[inline]
    #[must_use]
    pub fn new(client: LookupClient<T>) -> Self {
        Self { client }
    }

    /// Underlying client
    #[inline]
    #[must_use]
    pub fn client(&self) -> &LookupClient<T> {
        &self.client
    }

    /// Handle one caller query
    #[instrument(skip_all, fields(demo = query.demo))]
    pub async fn handle(&self, query: &CallerQuery) -> LookupReport {
        let prefix = self.client.config().country_prefix();
        let normalization = normalize_with_confidence(&query.phone, &prefix);
        if normalization.confidence.is_low() {
            tracing::warn!(
                phone = %normalization.phone,
                "Phone normalized with low confidence"
            );
        }

        if query.demo {
            return self.demo_report(normalization.phone, &prefix);
        }

        let name = query.name();
        let result = self
            .client
            .lookup(&normalization.phone, name.as_ref())
            .await;
        LookupReport::from_result(normalization.phone, result)
    }

    fn demo_report(&self, phone: CanonicalPhone, prefix: &str) -> LookupReport {
        let phone = if phone.is_empty() {
            callerid_phone::normalize(DEMO_PHONE, prefix)
        } else {
            phone
        };
        let record = fixture_record(
            self.client.config().schema,
            self.client.coercer(),
            &phone,
            prefix,
        );
        tracing::info!(phone = %phone, "Serving demo fixture");

        LookupReport::Found {
            phone,
            records: vec![record],
            demo: true,
        }
    }
}
