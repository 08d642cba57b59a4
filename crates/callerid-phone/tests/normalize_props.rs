//! Normalizer property tests
//!
//! Checks the length-driven rules over arbitrary digit strings and
//! punctuation.

use callerid_phone::{normalize, normalize_with_confidence, Confidence};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_ten_digits_take_default_prefix(
        digits in "[0-9]{10}",
        prefix in prop_oneof![Just("+1"), Just("+44"), Just("+61"), Just("+353")],
    ) {
        let phone = normalize(&digits, prefix);
        prop_assert_eq!(phone.as_str(), format!("{prefix}{digits}"));
    }

    #[test]
    fn prop_eleven_digits_leading_one_kept_verbatim(rest in "[0-9]{10}") {
        let digits = format!("1{rest}");
        let phone = normalize(&digits, "+44");
        prop_assert_eq!(phone.as_str(), format!("+{digits}"));
    }

    #[test]
    fn prop_output_is_empty_or_plus_digits(raw in ".{0,40}") {
        let phone = normalize(&raw, "+1");
        if !phone.is_empty() {
            prop_assert!(phone.as_str().starts_with('+'));
            prop_assert!(phone.digits().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn prop_punctuation_does_not_change_result(digits in "[0-9]{10}") {
        let formatted = format!(
            "({}) {}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..10]
        );
        prop_assert_eq!(normalize(&formatted, "+1"), normalize(&digits, "+1"));
    }

    #[test]
    fn prop_short_runs_are_low_confidence(digits in "[0-9]{1,9}") {
        let result = normalize_with_confidence(&digits, "+1");
        prop_assert_eq!(result.confidence, Confidence::LowConfidence);
        prop_assert_eq!(result.phone.as_str(), format!("+{digits}"));
    }
}

#[test]
fn no_digits_is_empty() {
    assert!(normalize("", "+1").is_empty());
    assert!(normalize("abc", "+1").is_empty());
    assert!(normalize("+-()", "+1").is_empty());
}
