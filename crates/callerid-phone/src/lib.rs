//! Phone normalization for caller lookup
//!
//! Turns whatever a contact-center agent (or an embedding iframe) passes as
//! `phone` into a canonical, `+`-prefixed dialing string:
//! - Strips punctuation, spaces and letters
//! - Recognizes North American numbers with the country code included
//! - Prepends a configured default country prefix to 10-digit numbers
//! - Falls back to `+<digits>` for everything else
//!
//! Normalization is heuristic, never validating. The upstream lookup system
//! is the real validator.
//!
//! # Example
//!
//! ```rust
//! use callerid_phone::{normalize, Confidence, normalize_with_confidence};
//!
//! let phone = normalize("(714) 555-1212", "+1");
//! assert_eq!(phone.as_str(), "+17145551212");
//!
//! let result = normalize_with_confidence("12345", "+1");
//! assert_eq!(result.confidence, Confidence::LowConfidence);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod canonical;
pub mod normalize;

pub use canonical::CanonicalPhone;
pub use normalize::{
    normalize, normalize_prefix, normalize_with_confidence, Confidence, Normalization,
    DEFAULT_COUNTRY_PREFIX,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
