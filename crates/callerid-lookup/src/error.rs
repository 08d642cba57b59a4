//! Error types for caller lookup
//!
//! Every failure is classified into exactly one category:
//! - Configuration: deployment misconfigured (endpoint, credential, aliases)
//! - Validation: caller-supplied input insufficient (phone, name)
//! - Upstream: network error, unexpected status, unparsable body
//!
//! "No caller found" is not an error; it is `LookupOutcome::NotFound`.

use serde::Serialize;
use std::fmt;

/// Longest upstream body excerpt kept for diagnostics, in characters
pub const BODY_EXCERPT_LIMIT: usize = 300;

/// Caller-supplied input that failed a precondition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    /// Phone (empty after normalization)
    Phone,
    /// First name (name-qualified deployments)
    FirstName,
    /// Last name (name-qualified deployments)
    LastName,
}

impl InputField {
    /// Human-readable message for a missing value
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Phone => "no valid phone provided",
            Self::FirstName | Self::LastName => "first and last name required",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Phone => "phone",
            Self::FirstName => "first name",
            Self::LastName => "last name",
        })
    }
}

/// Failure talking to, or understanding, the upstream system
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamFailure {
    /// Transport failed before a response arrived
    #[error("network error: {message}")]
    Network {
        /// Transport error text
        message: String,
    },

    /// Non-2xx status other than a "no match" signal
    #[error("upstream returned {status} {status_text}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase
        status_text: String,
        /// First characters of the response body
        body_excerpt: String,
    },

    /// 2xx response whose body is not JSON
    #[error("malformed upstream response: {message}")]
    MalformedBody {
        /// JSON parse error text
        message: String,
        /// First characters of the response body
        body_excerpt: String,
    },
}

impl UpstreamFailure {
    /// Network failure from any displayable cause
    pub fn network(cause: impl fmt::Display) -> Self {
        Self::Network {
            message: cause.to_string(),
        }
    }

    /// Status failure with a truncated body excerpt
    pub fn status(status: u16, status_text: impl Into<String>, body: &str) -> Self {
        Self::Status {
            status,
            status_text: status_text.into(),
            body_excerpt: excerpt(body),
        }
    }

    /// Malformed-body failure with a truncated body excerpt
    pub fn malformed(cause: impl fmt::Display, body: &str) -> Self {
        Self::MalformedBody {
            message: cause.to_string(),
            body_excerpt: excerpt(body),
        }
    }

    /// HTTP status, when a response arrived
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network { .. } | Self::MalformedBody { .. } => None,
        }
    }

    /// Body excerpt, when a body arrived
    #[inline]
    #[must_use]
    pub fn body_excerpt(&self) -> Option<&str> {
        match self {
            Self::Status { body_excerpt, .. } | Self::MalformedBody { body_excerpt, .. } => {
                Some(body_excerpt)
            }
            Self::Network { .. } => None,
        }
    }
}

/// Failure category the renderer uses to pick a presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Deployment misconfigured
    Configuration,
    /// Caller input insufficient
    Validation,
    /// Upstream unreachable or misbehaving
    Upstream,
    /// Zero matching records; a legitimate result, not a system failure
    NotFound,
}

impl FailureCategory {
    /// True for every category except `NotFound`
    #[inline]
    #[must_use]
    pub fn is_system_failure(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Main lookup error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Required setting missing or unusable
    #[error("configuration error: {setting} {reason}")]
    Configuration {
        /// Setting name
        setting: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Caller input failed a precondition
    #[error("{}", field.message())]
    Validation {
        /// Input that failed
        field: InputField,
    },

    /// Upstream failure
    #[error("upstream failure: {0}")]
    Upstream(#[from] UpstreamFailure),
}

impl LookupError {
    /// Required setting was not provided
    pub fn missing_setting(setting: &'static str) -> Self {
        Self::Configuration {
            setting,
            reason: "is not set".to_string(),
        }
    }

    /// Setting was provided but cannot be used
    pub fn invalid_setting(setting: &'static str, reason: impl fmt::Display) -> Self {
        Self::Configuration {
            setting,
            reason: format!("is invalid: {reason}"),
        }
    }

    /// Caller input missing
    #[inline]
    pub fn missing_input(field: InputField) -> Self {
        Self::Validation { field }
    }

    /// Category of this failure
    #[inline]
    #[must_use]
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::Configuration { .. } => FailureCategory::Configuration,
            Self::Validation { .. } => FailureCategory::Validation,
            Self::Upstream(_) => FailureCategory::Upstream,
        }
    }
}

/// Result type alias for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;

/// First `BODY_EXCERPT_LIMIT` characters of a body
#[must_use]
pub fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LIMIT).collect()
}
