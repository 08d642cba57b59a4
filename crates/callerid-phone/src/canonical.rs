//! Canonical phone value
//!
//! A `CanonicalPhone` is either empty (no usable input) or a `+` followed by
//! digits. It is the lookup key for the upstream system and the value the
//! coercer compares alternate phones against.

use serde::Serialize;
use std::fmt;

/// Normalized, `+`-prefixed digit string
///
/// Only the normalizer constructs non-empty values, so the `+digits` shape
/// holds for every instance. The length is not guaranteed: a short or long
/// digit run still yields a (low-confidence) canonical phone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    /// Empty phone ("no phone given")
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Build from an already-stripped digit run
    #[inline]
    pub(crate) fn from_digits(prefix: &str, digits: &str) -> Self {
        let mut value = String::with_capacity(prefix.len() + digits.len());
        value.push_str(prefix);
        value.push_str(digits);
        Self(value)
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when normalization produced nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Digits only, with the leading `+` removed
    #[inline]
    #[must_use]
    pub fn digits(&self) -> &str {
        self.0.strip_prefix('+').unwrap_or(&self.0)
    }

    /// Unwrap into the inner string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CanonicalPhone {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CanonicalPhone {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_phone() {
        let phone = CanonicalPhone::empty();
        assert!(phone.is_empty());
        assert_eq!(phone.as_str(), "");
        assert_eq!(phone.digits(), "");
    }

    #[test]
    fn digits_strip_plus() {
        let phone = CanonicalPhone::from_digits("+", "17145551212");
        assert_eq!(phone.digits(), "17145551212");
        assert_eq!(phone.to_string(), "+17145551212");
        assert_eq!(phone, "+17145551212");
    }

    #[test]
    fn serializes_as_plain_string() {
        let phone = CanonicalPhone::from_digits("+44", "2071234567");
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+442071234567\"");
    }
}
