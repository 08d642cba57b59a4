//! Defensive accessors over loosely-typed JSON
//!
//! Every function here returns an absent value instead of failing. Paths use
//! dot notation (`insurance.copay`).

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Millisecond epochs are larger than this; second epochs are not
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Get value at a dot-separated path
#[must_use]
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Scalar as trimmed, non-empty text
///
/// Strings are trimmed; numbers are rendered. Everything else is absent.
#[must_use]
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First alias holding non-empty text
#[must_use]
pub fn first_text(root: &Value, aliases: &[String]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|alias| get_path(root, alias))
        .find_map(as_text)
}

/// Scalar or sequence as a list of text
///
/// Falsy entries (null, false, empty strings, zero) are dropped; nested
/// objects are skipped.
#[must_use]
pub fn as_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(list_item).collect(),
        other => list_item(other).into_iter().collect(),
    }
}

fn list_item(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => as_text(other),
    }
}

/// Concatenated lists from every alias, in alias order
#[must_use]
pub fn collect_list(root: &Value, aliases: &[String]) -> Vec<String> {
    aliases
        .iter()
        .filter_map(|alias| get_path(root, alias))
        .flat_map(as_list)
        .collect()
}

/// Number or numeric string
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// First alias holding a number
#[must_use]
pub fn first_number(root: &Value, aliases: &[String]) -> Option<f64> {
    aliases
        .iter()
        .filter_map(|alias| get_path(root, alias))
        .find_map(as_number)
}

/// Monetary amount as a number
///
/// Accepts numbers and strings such as `"$1,250.00"`. Currency display is
/// left to the renderer.
#[must_use]
pub fn as_money(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
                .collect();
            as_number(&Value::String(cleaned))
        }
        other => as_number(other),
    }
}

/// Date-like value as an ISO-ish string
///
/// Strings pass through trimmed. Integer epochs (seconds, or milliseconds)
/// become `YYYY-MM-DD`.
#[must_use]
pub fn as_date(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            let raw = n.as_i64()?;
            let secs = if raw.unsigned_abs() > EPOCH_MILLIS_THRESHOLD.unsigned_abs() {
                raw / 1000
            } else {
                raw
            };
            DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.date_naive().to_string())
        }
        other => as_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aliases(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn get_path_walks_objects() {
        let value = json!({"insurance": {"copay": 25}, "name": "x"});
        assert_eq!(get_path(&value, "insurance.copay"), Some(&json!(25)));
        assert_eq!(get_path(&value, "name"), Some(&json!("x")));
        assert_eq!(get_path(&value, "insurance.missing"), None);
        assert_eq!(get_path(&value, "name.deeper"), None);
        assert_eq!(get_path(&json!([1, 2]), "name"), None);
    }

    #[test]
    fn text_skips_blank_and_non_scalars() {
        assert_eq!(as_text(&json!("  Jordan ")), Some("Jordan".to_string()));
        assert_eq!(as_text(&json!("   ")), None);
        assert_eq!(as_text(&json!(42)), Some("42".to_string()));
        assert_eq!(as_text(&json!(true)), None);
        assert_eq!(as_text(&json!({"a": 1})), None);
    }

    #[test]
    fn first_text_respects_alias_order() {
        let value = json!({"full_name": "", "name": "Jordan Park", "display_name": "JP"});
        let found = first_text(&value, &aliases(&["full_name", "name", "display_name"]));
        assert_eq!(found.as_deref(), Some("Jordan Park"));
    }

    #[test]
    fn list_accepts_scalar_or_sequence() {
        assert_eq!(as_list(&json!("a@example.com")), vec!["a@example.com"]);
        assert_eq!(
            as_list(&json!(["a", "", null, false, 0, "b", {"x": 1}])),
            vec!["a", "b"]
        );
        assert!(as_list(&json!(null)).is_empty());
        assert!(as_list(&json!("")).is_empty());
    }

    #[test]
    fn collect_list_concatenates_aliases() {
        let value = json!({"emails": ["a@x.com"], "email": "b@x.com"});
        let list = collect_list(&value, &aliases(&["emails", "email", "missing"]));
        assert_eq!(list, vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn numbers_from_strings() {
        assert_eq!(as_number(&json!(3)), Some(3.0));
        assert_eq!(as_number(&json!(" 4.5 ")), Some(4.5));
        assert_eq!(as_number(&json!(0)), Some(0.0));
        assert_eq!(as_number(&json!("high")), None);
        assert_eq!(as_number(&json!(null)), None);
    }

    #[test]
    fn money_strips_currency_formatting() {
        assert_eq!(as_money(&json!("$1,250.00")), Some(1250.0));
        assert_eq!(as_money(&json!("$ 25")), Some(25.0));
        assert_eq!(as_money(&json!(40)), Some(40.0));
        assert_eq!(as_money(&json!("n/a")), None);
    }

    #[test]
    fn dates_from_epochs_and_strings() {
        assert_eq!(as_date(&json!("2019-04-01")), Some("2019-04-01".to_string()));
        assert_eq!(as_date(&json!(1_554_076_800)), Some("2019-04-01".to_string()));
        assert_eq!(
            as_date(&json!(1_554_076_800_000_i64)),
            Some("2019-04-01".to_string())
        );
        assert_eq!(as_date(&json!(null)), None);
    }

    #[test]
    fn extreme_epochs_are_absent() {
        assert_eq!(as_date(&json!(i64::MIN)), None);
        assert_eq!(as_date(&json!(i64::MAX)), None);
        assert_eq!(as_date(&json!(u64::MAX)), None);
    }
}
