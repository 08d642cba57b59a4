//! Schema coercer
//!
//! Maps an arbitrary upstream JSON payload onto a [`CallerRecord`] using an
//! [`AliasTable`]. Pure and total: no I/O, no panics, every field falls back
//! to its documented default.

use crate::address::first_address;
use crate::aliases::{AliasTable, MetaKind, MetaRule};
use crate::record::{CallerRecord, MetaValue, UNKNOWN_NAME};
use crate::value::{as_date, as_money, as_number, collect_list, first_number, first_text, get_path};
use callerid_phone::{normalize, normalize_prefix, CanonicalPhone, DEFAULT_COUNTRY_PREFIX};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::Value;

static DEFAULT_COERCER: Lazy<Coercer> = Lazy::new(|| Coercer::new(AliasTable::retail()));

/// Coerce with the retail table and the `+1` default prefix
#[must_use]
pub fn coerce(payload: &Value, searched: &CanonicalPhone) -> CallerRecord {
    DEFAULT_COERCER.coerce(payload, searched)
}

/// Applies one alias table to upstream payloads
#[derive(Debug, Clone)]
pub struct Coercer {
    table: AliasTable,
    default_country_prefix: String,
}

impl Coercer {
    /// Create coercer for a table, normalizing alternate phones with `+1`
    #[inline]
    #[must_use]
    pub fn new(table: AliasTable) -> Self {
        Self {
            table,
            default_country_prefix: DEFAULT_COUNTRY_PREFIX.to_string(),
        }
    }

    /// With default country prefix for alternate phones
    #[inline]
    #[must_use]
    pub fn with_default_country_prefix(mut self, prefix: &str) -> Self {
        self.default_country_prefix = normalize_prefix(prefix);
        self
    }

    /// Alias table in use
    #[inline]
    #[must_use]
    pub fn table(&self) -> &AliasTable {
        &self.table
    }

    /// Build a caller record from one upstream payload
    ///
    /// # Arguments
    /// * `payload` - Raw upstream JSON; any shape is accepted
    /// * `searched` - Phone used for the lookup; excluded from `alt_phones`
    #[must_use]
    pub fn coerce(&self, payload: &Value, searched: &CanonicalPhone) -> CallerRecord {
        let table = &self.table;

        let record = CallerRecord {
            phone: searched.clone(),
            name: self.name(payload),
            company: first_text(payload, &table.company).unwrap_or_default(),
            title: first_text(payload, &table.title).unwrap_or_default(),
            emails: collect_list(payload, &table.emails),
            alt_phones: self.alt_phones(payload, searched),
            address: first_address(payload, &table.address),
            tags: collect_list(payload, &table.tags),
            risk: first_number(payload, &table.risk),
            status: first_text(payload, &table.status).unwrap_or_default(),
            customer_since: table
                .customer_since
                .iter()
                .filter_map(|alias| get_path(payload, alias))
                .find_map(as_date)
                .unwrap_or_default(),
            notes: self.notes(payload),
            meta: self.meta(payload),
        };

        tracing::debug!(
            unnamed = record.is_unnamed(),
            emails = record.emails.len(),
            alt_phones = record.alt_phones.len(),
            meta = record.meta.len(),
            "Coerced upstream payload"
        );

        record
    }

    fn name(&self, payload: &Value) -> String {
        if let Some(full) = first_text(payload, &self.table.full_name) {
            return full;
        }

        let parts: Vec<String> = [
            &self.table.first_name,
            &self.table.middle_name,
            &self.table.last_name,
        ]
        .into_iter()
        .filter_map(|aliases| first_text(payload, aliases))
        .collect();

        if parts.is_empty() {
            UNKNOWN_NAME.to_string()
        } else {
            parts.join(" ")
        }
    }

    fn alt_phones(&self, payload: &Value, searched: &CanonicalPhone) -> Vec<CanonicalPhone> {
        collect_list(payload, &self.table.phones)
            .iter()
            .map(|raw| normalize(raw, &self.default_country_prefix))
            .filter(|phone| !phone.is_empty() && phone != searched)
            .collect()
    }

    fn notes(&self, payload: &Value) -> Vec<String> {
        let mut notes = collect_list(payload, &self.table.notes);
        notes.extend(self.table.note_rules.iter().filter_map(|rule| {
            first_text(payload, &rule.aliases).map(|value| format!("{}: {value}", rule.label))
        }));
        notes
    }

    fn meta(&self, payload: &Value) -> IndexMap<String, MetaValue> {
        self.table
            .meta
            .iter()
            .filter_map(|rule| meta_value(payload, rule).map(|value| (rule.key.clone(), value)))
            .collect()
    }
}

impl Default for Coercer {
    fn default() -> Self {
        Self::new(AliasTable::retail())
    }
}

fn meta_value(payload: &Value, rule: &MetaRule) -> Option<MetaValue> {
    match rule.kind {
        MetaKind::Text => first_text(payload, &rule.aliases).map(MetaValue::Text),
        MetaKind::Number => rule
            .aliases
            .iter()
            .filter_map(|alias| get_path(payload, alias))
            .find_map(as_number)
            .map(MetaValue::Number),
        MetaKind::Money => rule
            .aliases
            .iter()
            .filter_map(|alias| get_path(payload, alias))
            .find_map(as_money)
            .map(MetaValue::Number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn searched() -> CanonicalPhone {
        normalize("7145551212", "+1")
    }

    #[test]
    fn empty_object_yields_defaults() {
        let record = coerce(&json!({}), &searched());
        assert_eq!(record, CallerRecord::unknown(searched()));
    }

    #[test]
    fn non_object_payloads_are_total() {
        for payload in [json!(null), json!(42), json!("Jordan"), json!([1, 2])] {
            let record = coerce(&payload, &searched());
            assert_eq!(record.name, UNKNOWN_NAME);
            assert!(record.emails.is_empty());
        }
    }

    #[test]
    fn name_parts_are_joined() {
        let record = coerce(&json!({"first_name": "Jordan", "last_name": "Park"}), &searched());
        assert_eq!(record.name, "Jordan Park");

        let padded = coerce(
            &json!({"first_name": "  Jordan ", "middle_name": "", "last_name": " Park"}),
            &searched(),
        );
        assert_eq!(padded.name, "Jordan Park");
    }

    #[test]
    fn blank_name_parts_fall_back_to_unknown() {
        let record = coerce(&json!({"first_name": "", "last_name": ""}), &searched());
        assert_eq!(record.name, UNKNOWN_NAME);
    }

    #[test]
    fn full_name_wins_over_parts() {
        let record = coerce(
            &json!({"full_name": "J. Park", "first_name": "Jordan", "last_name": "Park"}),
            &searched(),
        );
        assert_eq!(record.name, "J. Park");
    }

    #[test]
    fn single_part_name() {
        let record = coerce(&json!({"last_name": "Park"}), &searched());
        assert_eq!(record.name, "Park");
    }

    #[test]
    fn searched_phone_is_excluded_from_alt_phones() {
        let searched = normalize("+17145551212", "+1");
        let record = coerce(
            &json!({"phones": ["+17145551212", "+17145550000"]}),
            &searched,
        );
        assert_eq!(record.alt_phones, vec![normalize("+17145550000", "+1")]);
    }

    #[test]
    fn alt_phones_are_normalized_before_comparison() {
        let record = coerce(
            &json!({"phone": "(714) 555-1212", "mobile": "714.555.0000", "work_phone": ""}),
            &searched(),
        );
        assert_eq!(record.alt_phones.len(), 1);
        assert_eq!(record.alt_phones[0], "+17145550000");
    }

    #[test]
    fn alt_phones_use_configured_prefix() {
        let coercer = Coercer::new(AliasTable::retail()).with_default_country_prefix("44");
        let record = coercer.coerce(&json!({"mobile": "2071234567"}), &searched());
        assert_eq!(record.alt_phones[0], "+442071234567");
    }

    #[test]
    fn scalar_email_becomes_list() {
        let record = coerce(&json!({"email_address": "jordan@example.com"}), &searched());
        assert_eq!(record.emails, vec!["jordan@example.com"]);
    }

    #[test]
    fn risk_absent_is_none_and_zero_is_kept() {
        assert_eq!(coerce(&json!({}), &searched()).risk, None);
        assert_eq!(coerce(&json!({"risk": 0}), &searched()).risk, Some(0.0));
        assert_eq!(coerce(&json!({"risk_score": "4"}), &searched()).risk, Some(4.0));
        assert_eq!(coerce(&json!({"risk": "unknown"}), &searched()).risk, None);
    }

    #[test]
    fn retail_payload_maps_every_field() {
        let payload = json!({
            "full_name": "Jordan Park",
            "company": "Acme Corp",
            "job_title": "Buyer",
            "emails": ["jordan@acme.com", ""],
            "email": "jp@example.com",
            "address": {"street": "12 Main St", "city": "Irvine", "state": "CA"},
            "tags": "vip",
            "risk_score": 2,
            "status": "active",
            "customer_since": "2019-04-01",
            "notes": ["Prefers email"],
            "last_order": "2024-01-15",
            "customer_id": 9001,
            "lifetime_value": "$1,250.50"
        });

        let record = coerce(&payload, &searched());

        assert_eq!(record.name, "Jordan Park");
        assert_eq!(record.company, "Acme Corp");
        assert_eq!(record.title, "Buyer");
        assert_eq!(record.emails, vec!["jordan@acme.com", "jp@example.com"]);
        assert_eq!(record.address, "12 Main St • Irvine, CA");
        assert_eq!(record.tags, vec!["vip"]);
        assert_eq!(record.risk, Some(2.0));
        assert_eq!(record.status, "active");
        assert_eq!(record.customer_since, "2019-04-01");
        assert_eq!(
            record.notes,
            vec!["Prefers email", "Last order: 2024-01-15"]
        );
        assert_eq!(record.meta["customer_id"], MetaValue::Text("9001".into()));
        assert_eq!(record.meta["lifetime_value"], MetaValue::Number(1250.5));
    }

    #[test]
    fn healthcare_payload_folds_provider_fields() {
        let payload = json!({
            "patient_first_name": "Ana",
            "patient_last_name": "Ruiz",
            "clinic_name": "Harbor Family Clinic",
            "provider_name": "Dr. Lee",
            "eligibility": ["CCM", "RPM"],
            "programs": "Diabetes",
            "insurance": {"plan": "Gold PPO", "copay": "$25.00", "tier": "Gold", "member_id": "M-7"},
            "patient_id": "P-100"
        });
        let coercer = Coercer::new(AliasTable::healthcare());

        let record = coercer.coerce(&payload, &searched());

        assert_eq!(record.name, "Ana Ruiz");
        assert_eq!(record.company, "Harbor Family Clinic");
        assert_eq!(record.title, "Dr. Lee");
        assert_eq!(record.tags, vec!["CCM", "RPM", "Diabetes"]);
        assert_eq!(record.notes, vec!["Insurance tier: Gold"]);
        assert_eq!(record.meta["copay"], MetaValue::Number(25.0));
        assert_eq!(record.meta["insurance_plan"], MetaValue::Text("Gold PPO".into()));
        assert_eq!(record.meta["member_id"], MetaValue::Text("M-7".into()));
        let keys: Vec<&str> = record.meta.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["patient_id", "member_id", "insurance_plan", "copay"]);
    }

    #[test]
    fn unparsable_money_is_left_out_of_meta() {
        let coercer = Coercer::new(AliasTable::healthcare());
        let record = coercer.coerce(&json!({"copay": "varies"}), &searched());
        assert!(!record.meta.contains_key("copay"));
    }

    #[test]
    fn epoch_customer_since_is_rendered_as_date() {
        let record = coerce(&json!({"created_at": 1_554_076_800}), &searched());
        assert_eq!(record.customer_since, "2019-04-01");
    }

    #[test]
    fn custom_table_drives_coercion() {
        let table: AliasTable = serde_json::from_value(json!({
            "full_name": ["display"],
            "meta": [{"key": "account", "aliases": ["acct.no"], "kind": "number"}]
        }))
        .unwrap();
        let record = Coercer::new(table).coerce(
            &json!({"display": "Front Desk", "name": "ignored", "acct": {"no": "17"}}),
            &searched(),
        );

        assert_eq!(record.name, "Front Desk");
        assert_eq!(record.meta["account"], MetaValue::Number(17.0));
    }
}
