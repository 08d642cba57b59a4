//! Address formatting
//!
//! Upstream addresses arrive either preformatted or as an object. Objects are
//! composed into one display line:
//! `line1 • line2 • city, state • postal • country`, skipping empty parts.

use crate::aliases::owned;
use crate::value::{first_text, get_path};
use once_cell::sync::Lazy;
use serde_json::Value;

/// Separator between address parts
pub const ADDRESS_SEPARATOR: &str = " • ";

struct AddressAliases {
    line1: Vec<String>,
    line2: Vec<String>,
    city: Vec<String>,
    state: Vec<String>,
    postal: Vec<String>,
    country: Vec<String>,
}

static ADDRESS_ALIASES: Lazy<AddressAliases> = Lazy::new(|| AddressAliases {
    line1: owned(&["line1", "street", "street1", "address1", "address_line1"]),
    line2: owned(&["line2", "street2", "address2", "address_line2", "unit"]),
    city: owned(&["city", "locality", "town"]),
    state: owned(&["state", "region", "province", "state_code"]),
    postal: owned(&["postal_code", "zip", "zip_code", "postcode", "postalCode"]),
    country: owned(&["country", "country_code"]),
});

/// First address alias rendered as a single line, `""` if absent
#[must_use]
pub fn first_address(root: &Value, aliases: &[String]) -> String {
    aliases
        .iter()
        .filter_map(|alias| get_path(root, alias))
        .map(format_address)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
}

/// Render one address value
///
/// Strings pass through unchanged. Objects are composed part by part. Any
/// other JSON type yields `""`.
#[must_use]
pub fn format_address(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) => compose(value),
        _ => String::new(),
    }
}

fn compose(value: &Value) -> String {
    let aliases = &*ADDRESS_ALIASES;
    let city = part(value, &aliases.city);
    let state = part(value, &aliases.state);
    let locality = match (city.is_empty(), state.is_empty()) {
        (false, false) => format!("{city}, {state}"),
        (false, true) => city,
        (true, false) => state,
        (true, true) => String::new(),
    };

    [
        part(value, &aliases.line1),
        part(value, &aliases.line2),
        locality,
        part(value, &aliases.postal),
        part(value, &aliases.country),
    ]
    .into_iter()
    .filter(|segment| !segment.is_empty())
    .collect::<Vec<_>>()
    .join(ADDRESS_SEPARATOR)
}

fn part(value: &Value, names: &[String]) -> String {
    first_text(value, names).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_passes_through_unchanged() {
        let line = "  12 Main St, Irvine CA ";
        assert_eq!(format_address(&json!(line)), line);
    }

    #[test]
    fn full_object_is_composed_in_order() {
        let address = json!({
            "line1": "12 Main St",
            "line2": "Suite 4",
            "city": "Irvine",
            "state": "CA",
            "postal_code": "92618",
            "country": "US"
        });
        assert_eq!(
            format_address(&address),
            "12 Main St • Suite 4 • Irvine, CA • 92618 • US"
        );
    }

    #[test]
    fn missing_parts_are_dropped() {
        let address = json!({"street": "12 Main St", "state": "CA", "zip": "92618"});
        assert_eq!(format_address(&address), "12 Main St • CA • 92618");

        let city_only = json!({"city": "Irvine", "line2": ""});
        assert_eq!(format_address(&city_only), "Irvine");
    }

    #[test]
    fn empty_or_odd_values_yield_empty() {
        assert_eq!(format_address(&json!({})), "");
        assert_eq!(format_address(&json!(null)), "");
        assert_eq!(format_address(&json!(["12 Main St"])), "");
    }

    #[test]
    fn first_address_skips_empty_aliases() {
        let payload = json!({"address": {}, "mailing_address": "PO Box 1"});
        let aliases = vec!["address".to_string(), "mailing_address".to_string()];
        assert_eq!(first_address(&payload, &aliases), "PO Box 1");
    }
}
