//! Coercer totality tests
//!
//! Arbitrary JSON in, a fully-populated record out.

use callerid_phone::normalize;
use callerid_record::{AliasTable, CallerRecord, Coercer, UNKNOWN_NAME};
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        prop_oneof![Just(i64::MIN), Just(i64::MAX), Just(-1_554_076_800_000)].prop_map(|n| json!(n)),
        any::<f64>().prop_map(|n| json!(n)),
        "[ a-zA-Z0-9@.+()-]{0,20}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::hash_map(
                prop_oneof![
                    Just("name".to_string()),
                    Just("first_name".to_string()),
                    Just("last_name".to_string()),
                    Just("emails".to_string()),
                    Just("phones".to_string()),
                    Just("address".to_string()),
                    Just("risk".to_string()),
                    Just("insurance".to_string()),
                    Just("copay".to_string()),
                    Just("eligibility".to_string()),
                    Just("customer_since".to_string()),
                    Just("created_at".to_string()),
                    Just("patient_since".to_string()),
                    "[a-z_]{1,10}",
                ],
                inner,
                0..8,
            )
            .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn assert_invariants(record: &CallerRecord, searched: &str) {
    assert!(!record.name.trim().is_empty());
    assert_eq!(record.phone.as_str(), searched);
    assert!(record.emails.iter().all(|email| !email.is_empty()));
    assert!(record.alt_phones.iter().all(|phone| phone.as_str() != searched));
    assert!(record.alt_phones.iter().all(|phone| !phone.is_empty()));
    assert!(record.tags.iter().all(|tag| !tag.is_empty()));
    assert!(record.risk.map_or(true, f64::is_finite));
}

proptest! {
    #[test]
    fn prop_retail_coercion_is_total(payload in arb_json()) {
        let searched = normalize("7145551212", "+1");
        let record = Coercer::new(AliasTable::retail()).coerce(&payload, &searched);
        assert_invariants(&record, searched.as_str());
    }

    #[test]
    fn prop_healthcare_coercion_is_total(payload in arb_json()) {
        let searched = normalize("7145551212", "+1");
        let record = Coercer::new(AliasTable::healthcare()).coerce(&payload, &searched);
        assert_invariants(&record, searched.as_str());
    }
}

#[test]
fn empty_object_matches_documented_defaults() {
    let searched = normalize("7145551212", "+1");
    let record = callerid_record::coerce(&json!({}), &searched);

    assert_eq!(record.name, UNKNOWN_NAME);
    assert!(record.emails.is_empty());
    assert_eq!(record.risk, None);
    assert_eq!(record.company, "");
    assert_eq!(record.title, "");
    assert!(record.alt_phones.is_empty());
    assert_eq!(record.address, "");
    assert!(record.tags.is_empty());
    assert_eq!(record.status, "");
    assert_eq!(record.customer_since, "");
    assert!(record.notes.is_empty());
    assert!(record.meta.is_empty());
}

#[test]
fn scenario_first_last_email() {
    let searched = normalize("7145551212", "+1");
    let record = callerid_record::coerce(
        &json!({"first_name": "Jordan", "last_name": "Park", "email_address": "jordan@example.com"}),
        &searched,
    );

    let mut expected = CallerRecord::unknown(searched);
    expected.name = "Jordan Park".to_string();
    expected.emails = vec!["jordan@example.com".to_string()];
    assert_eq!(record, expected);
    assert_eq!(record.phone.as_str(), "+17145551212");
}

#[test]
fn out_of_range_epoch_leaves_customer_since_empty() {
    let searched = normalize("7145551212", "+1");
    for epoch in [i64::MIN, i64::MAX] {
        let record = callerid_record::coerce(&json!({"customer_since": epoch}), &searched);
        assert_eq!(record.customer_since, "");
    }
}
