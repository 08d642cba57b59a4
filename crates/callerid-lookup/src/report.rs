//! Renderer boundary
//!
//! A `LookupReport` is the whole contract with the page renderer: records,
//! a not-found signal, or a classified failure with a human-readable message.

use crate::client::LookupOutcome;
use crate::error::{FailureCategory, InputField, LookupError, UpstreamFailure};
use callerid_phone::CanonicalPhone;
use callerid_record::CallerRecord;
use serde::Serialize;

/// Outcome of one request, ready for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupReport {
    /// Matching callers
    Found {
        /// Searched phone
        phone: CanonicalPhone,
        /// Coerced records, upstream order
        records: Vec<CallerRecord>,
        /// Records come from the demo fixture
        demo: bool,
    },

    /// No matching caller
    NotFound {
        /// Searched phone
        phone: CanonicalPhone,
    },

    /// Classified failure
    Failed {
        /// Failure category
        category: FailureCategory,
        /// Human-readable message
        message: String,
        /// Missing input, for validation failures
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<InputField>,
        /// Upstream status, for status failures
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        /// Upstream body excerpt, at most 300 characters
        #[serde(skip_serializing_if = "Option::is_none")]
        body_excerpt: Option<String>,
    },
}

impl LookupReport {
    /// Report for a lookup result
    #[must_use]
    pub fn from_result(phone: CanonicalPhone, result: Result<LookupOutcome, LookupError>) -> Self {
        match result {
            Ok(LookupOutcome::Found(records)) => Self::Found {
                phone,
                records,
                demo: false,
            },
            Ok(LookupOutcome::NotFound) => Self::NotFound { phone },
            Err(err) => Self::from_error(&err),
        }
    }

    /// Report for a failure
    #[must_use]
    pub fn from_error(err: &LookupError) -> Self {
        let (field, status, body_excerpt) = match err {
            LookupError::Validation { field } => (Some(*field), None, None),
            LookupError::Upstream(failure) => (
                None,
                failure.status_code(),
                failure.body_excerpt().map(str::to_string),
            ),
            LookupError::Configuration { .. } => (None, None, None),
        };

        Self::Failed {
            category: err.category(),
            message: err.to_string(),
            field,
            status,
            body_excerpt,
        }
    }

    /// Category for presentation; `None` when records were found
    #[must_use]
    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            Self::Found { .. } => None,
            Self::NotFound { .. } => Some(FailureCategory::NotFound),
            Self::Failed { category, .. } => Some(*category),
        }
    }

    /// True for configuration, validation and upstream failures
    #[inline]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Found records (empty otherwise)
    #[must_use]
    pub fn records(&self) -> &[CallerRecord] {
        match self {
            Self::Found { records, .. } => records,
            Self::NotFound { .. } | Self::Failed { .. } => &[],
        }
    }
}

impl From<UpstreamFailure> for LookupReport {
    fn from(failure: UpstreamFailure) -> Self {
        Self::from_error(&LookupError::Upstream(failure))
    }
}
