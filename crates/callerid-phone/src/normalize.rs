//! Phone normalizer
//!
//! Deterministic, no I/O, never fails. Rules, applied to the digits left
//! after stripping everything else:
//!
//! | digits | result | confidence |
//! |---|---|---|
//! | none | empty | `Empty` |
//! | 11, leading `1` | `+` + digits | `NorthAmerican` |
//! | 10 | default prefix + digits | `DefaultCountry` |
//! | 11..=15 | `+` + digits | `International` |
//! | anything else | `+` + digits | `LowConfidence` |

use crate::canonical::CanonicalPhone;
use serde::Serialize;

/// Prefix used when none is configured (or the configured one has no digits)
pub const DEFAULT_COUNTRY_PREFIX: &str = "+1";

/// How much the normalizer had to guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// No digits in the input
    Empty,
    /// 11 digits with a leading `1`
    NorthAmerican,
    /// 10 digits, default country prefix applied
    DefaultCountry,
    /// 11 to 15 digits taken as an international number
    International,
    /// Permissive fallback: any other digit count
    LowConfidence,
}

impl Confidence {
    /// True for the permissive fallback
    #[inline]
    #[must_use]
    pub fn is_low(self) -> bool {
        matches!(self, Self::LowConfidence)
    }
}

/// Normalizer output with its confidence signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Normalization {
    /// Canonical phone (possibly empty)
    pub phone: CanonicalPhone,
    /// Which rule produced it
    pub confidence: Confidence,
}

/// Normalize free-text phone input into a canonical phone
///
/// See [`normalize_with_confidence`] for the rule that fired.
#[must_use]
pub fn normalize(raw: &str, default_country_prefix: &str) -> CanonicalPhone {
    normalize_with_confidence(raw, default_country_prefix).phone
}

/// Normalize and report which rule was applied
#[must_use]
pub fn normalize_with_confidence(raw: &str, default_country_prefix: &str) -> Normalization {
    let digits = digits_only(raw);

    let (phone, confidence) = match digits.len() {
        0 => (CanonicalPhone::empty(), Confidence::Empty),
        11 if digits.starts_with('1') => (
            CanonicalPhone::from_digits("+", &digits),
            Confidence::NorthAmerican,
        ),
        10 => (
            CanonicalPhone::from_digits(&normalize_prefix(default_country_prefix), &digits),
            Confidence::DefaultCountry,
        ),
        11..=15 => (
            CanonicalPhone::from_digits("+", &digits),
            Confidence::International,
        ),
        _ => (
            CanonicalPhone::from_digits("+", &digits),
            Confidence::LowConfidence,
        ),
    };

    Normalization { phone, confidence }
}

/// Normalize a country prefix to `+<digits>`
///
/// `"1"`, `"+1"` and `" +(1) "` all become `"+1"`. A prefix without digits
/// falls back to [`DEFAULT_COUNTRY_PREFIX`].
#[must_use]
pub fn normalize_prefix(prefix: &str) -> String {
    let digits = digits_only(prefix);
    if digits.is_empty() {
        return DEFAULT_COUNTRY_PREFIX.to_string();
    }
    format!("+{digits}")
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
