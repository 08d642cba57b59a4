//! Canonical caller record
//!
//! The only shape the renderer ever sees, whatever upstream schema produced
//! it. Every field has a total default.

use callerid_phone::CanonicalPhone;
use indexmap::IndexMap;
use serde::Serialize;

/// Name used when no name-bearing field is present
pub const UNKNOWN_NAME: &str = "Unknown";

/// Value of an open-ended `meta` entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// Free text (identifiers, plan names)
    Text(String),
    /// Numeric fact (amounts, counts)
    Number(f64),
}

impl MetaValue {
    /// Text content, if textual
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    /// Numeric content, if numeric
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Caller description consumed by presentation
///
/// Built fresh per request by the coercer and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerRecord {
    /// Phone that was searched
    pub phone: CanonicalPhone,
    /// Display name, never blank
    pub name: String,
    /// Business or clinic name
    pub company: String,
    /// Role or provider name
    pub title: String,
    /// Email addresses in upstream order
    pub emails: Vec<String>,
    /// Other phones for the caller, excluding the searched one
    pub alt_phones: Vec<CanonicalPhone>,
    /// Single formatted address line
    pub address: String,
    /// Eligibility, program or category labels
    pub tags: Vec<String>,
    /// Severity on a 1..5 scale; `None` when the upstream gave no score
    pub risk: Option<f64>,
    /// Freeform status label
    pub status: String,
    /// Customer-since date, ISO-ish
    pub customer_since: String,
    /// Free notes, including synthesized `Label: value` entries
    pub notes: Vec<String>,
    /// Schema-specific extra facts
    pub meta: IndexMap<String, MetaValue>,
}

impl CallerRecord {
    /// Record with every field at its default
    #[must_use]
    pub fn unknown(phone: CanonicalPhone) -> Self {
        Self {
            phone,
            name: UNKNOWN_NAME.to_string(),
            company: String::new(),
            title: String::new(),
            emails: Vec::new(),
            alt_phones: Vec::new(),
            address: String::new(),
            tags: Vec::new(),
            risk: None,
            status: String::new(),
            customer_since: String::new(),
            notes: Vec::new(),
            meta: IndexMap::new(),
        }
    }

    /// True when no name-bearing field was found
    #[inline]
    #[must_use]
    pub fn is_unnamed(&self) -> bool {
        self.name == UNKNOWN_NAME
    }
}

impl Default for CallerRecord {
    fn default() -> Self {
        Self::unknown(CanonicalPhone::empty())
    }
}
