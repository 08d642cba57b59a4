//! Declarative field-alias tables
//!
//! One table per upstream schema. Each logical attribute lists the upstream
//! fields to try, in priority order, as dot paths. Attributes with no
//! first-class `CallerRecord` slot are declared as `meta` or `note` rules.
//!
//! Tables deserialize from configuration, so a new deployment schema is a
//! data change:
//!
//! ```toml
//! full_name = ["display"]
//! emails = ["contact.email"]
//!
//! [[meta]]
//! key = "account"
//! aliases = ["acct_no"]
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// How a `meta` rule coerces its value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaKind {
    /// Trimmed text
    #[default]
    Text,
    /// Plain number
    Number,
    /// Currency amount; `$` and thousands separators stripped
    Money,
}

/// Extra fact folded into `CallerRecord::meta`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRule {
    /// Key in the `meta` map
    pub key: String,
    /// Upstream fields to try
    pub aliases: Vec<String>,
    /// Coercion applied to the value
    #[serde(default)]
    pub kind: MetaKind,
}

impl MetaRule {
    /// Create new meta rule
    #[must_use]
    pub fn new(key: impl Into<String>, aliases: &[&str], kind: MetaKind) -> Self {
        Self {
            key: key.into(),
            aliases: owned(aliases),
            kind,
        }
    }
}

/// Synthesized `Label: value` note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRule {
    /// Label prefix
    pub label: String,
    /// Upstream fields to try
    pub aliases: Vec<String>,
}

impl NoteRule {
    /// Create new note rule
    #[must_use]
    pub fn new(label: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            label: label.into(),
            aliases: owned(aliases),
        }
    }
}

/// Ordered alias lists per logical `CallerRecord` attribute
///
/// Scalar attributes take the first alias with a usable value. List
/// attributes concatenate every alias in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AliasTable {
    /// Single-field names, tried before the name parts
    pub full_name: Vec<String>,
    /// Given name
    pub first_name: Vec<String>,
    /// Middle name
    pub middle_name: Vec<String>,
    /// Family name
    pub last_name: Vec<String>,
    /// Business or clinic name
    pub company: Vec<String>,
    /// Role or provider
    pub title: Vec<String>,
    /// Email list fields
    pub emails: Vec<String>,
    /// Phone list fields
    pub phones: Vec<String>,
    /// Address (string or structured object)
    pub address: Vec<String>,
    /// Tag, eligibility or program list fields
    pub tags: Vec<String>,
    /// Risk score
    pub risk: Vec<String>,
    /// Status label
    pub status: Vec<String>,
    /// Customer-since date
    pub customer_since: Vec<String>,
    /// Note list fields
    pub notes: Vec<String>,
    /// Extra facts for `meta`
    pub meta: Vec<MetaRule>,
    /// Synthesized notes
    pub note_rules: Vec<NoteRule>,
}

static RETAIL: Lazy<AliasTable> = Lazy::new(|| AliasTable {
    full_name: owned(&["name", "full_name", "fullName", "display_name", "contact.name"]),
    first_name: owned(&["first_name", "firstName", "given_name", "contact.first_name"]),
    middle_name: owned(&["middle_name", "middleName"]),
    last_name: owned(&[
        "last_name",
        "lastName",
        "family_name",
        "surname",
        "contact.last_name",
    ]),
    company: owned(&["company", "company_name", "organization", "employer", "account.name"]),
    title: owned(&["title", "job_title", "role"]),
    emails: owned(&["emails", "email", "email_address", "contact.email"]),
    phones: owned(&[
        "phones",
        "alt_phones",
        "phone_numbers",
        "phone",
        "mobile",
        "work_phone",
        "home_phone",
    ]),
    address: owned(&["address", "mailing_address", "billing_address"]),
    tags: owned(&["tags", "segments", "labels"]),
    risk: owned(&["risk", "risk_score", "fraud_score"]),
    status: owned(&["status", "account_status", "customer_status"]),
    customer_since: owned(&["customer_since", "customerSince", "created_at", "since"]),
    notes: owned(&["notes", "note", "comments"]),
    meta: vec![
        MetaRule::new("customer_id", &["customer_id", "account_id", "id"], MetaKind::Text),
        MetaRule::new("loyalty_tier", &["loyalty_tier", "tier"], MetaKind::Text),
        MetaRule::new("lifetime_value", &["lifetime_value", "ltv"], MetaKind::Money),
        MetaRule::new("open_tickets", &["open_tickets"], MetaKind::Number),
    ],
    note_rules: vec![NoteRule::new(
        "Last order",
        &["last_order", "last_order_date"],
    )],
});

static HEALTHCARE: Lazy<AliasTable> = Lazy::new(|| AliasTable {
    full_name: owned(&["patient_name", "name", "full_name"]),
    first_name: owned(&["patient_first_name", "first_name", "firstName"]),
    middle_name: owned(&["middle_name"]),
    last_name: owned(&["patient_last_name", "last_name", "lastName"]),
    company: owned(&["clinic_name", "clinic", "practice_name", "facility"]),
    title: owned(&["provider_name", "provider", "primary_provider", "pcp"]),
    emails: owned(&["emails", "email", "email_address"]),
    phones: owned(&["phones", "phone", "mobile_phone", "home_phone", "alt_phone"]),
    address: owned(&["address", "home_address"]),
    tags: owned(&["eligibility", "programs", "program_eligibility", "tags"]),
    risk: owned(&["risk_score", "risk", "acuity"]),
    status: owned(&["status", "patient_status", "coverage_status"]),
    customer_since: owned(&["patient_since", "first_visit", "created_at"]),
    notes: owned(&["notes", "alerts"]),
    meta: vec![
        MetaRule::new("patient_id", &["patient_id", "mrn", "id"], MetaKind::Text),
        MetaRule::new(
            "member_id",
            &["member_id", "insurance.member_id"],
            MetaKind::Text,
        ),
        MetaRule::new(
            "insurance_plan",
            &["insurance_plan", "insurance.plan", "insurance_name"],
            MetaKind::Text,
        ),
        MetaRule::new("copay", &["copay", "insurance.copay"], MetaKind::Money),
        MetaRule::new("next_appointment", &["next_appointment"], MetaKind::Text),
    ],
    note_rules: vec![
        NoteRule::new("Insurance tier", &["insurance_tier", "insurance.tier"]),
        NoteRule::new("Preferred language", &["preferred_language", "language"]),
    ],
});

impl AliasTable {
    /// Retail CRM schema
    #[must_use]
    pub fn retail() -> Self {
        RETAIL.clone()
    }

    /// Healthcare schema (clinic, provider, insurance, eligibility)
    #[must_use]
    pub fn healthcare() -> Self {
        HEALTHCARE.clone()
    }

    /// True when the table declares no aliases at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

pub(crate) fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_populated() {
        assert!(!AliasTable::retail().is_empty());
        assert!(!AliasTable::healthcare().is_empty());
        assert!(AliasTable::default().is_empty());
    }

    #[test]
    fn healthcare_promotes_clinic_and_provider() {
        let table = AliasTable::healthcare();
        assert_eq!(table.company[0], "clinic_name");
        assert_eq!(table.title[0], "provider_name");
        assert!(table
            .meta
            .iter()
            .any(|rule| rule.key == "copay" && rule.kind == MetaKind::Money));
    }

    #[test]
    fn meta_kind_defaults_to_text() {
        let rule: MetaRule =
            serde_json::from_value(serde_json::json!({"key": "k", "aliases": ["a"]})).unwrap();
        assert_eq!(rule.kind, MetaKind::Text);
    }

    #[test]
    fn table_deserializes_partially() {
        let table: AliasTable = serde_json::from_value(serde_json::json!({
            "full_name": ["display"],
            "meta": [{"key": "account", "aliases": ["acct_no"], "kind": "number"}]
        }))
        .unwrap();

        assert_eq!(table.full_name, vec!["display"]);
        assert!(table.emails.is_empty());
        assert_eq!(table.meta[0].kind, MetaKind::Number);
    }

    #[test]
    fn table_loads_from_toml() {
        let table: AliasTable = toml::from_str(
            r#"
full_name = ["display"]
emails = ["contact.email"]

[[meta]]
key = "account"
aliases = ["acct_no"]
"#,
        )
        .unwrap();

        assert_eq!(table.full_name, vec!["display"]);
        assert_eq!(table.emails, vec!["contact.email"]);
        assert_eq!(
            table.meta,
            vec![MetaRule::new("account", &["acct_no"], MetaKind::Text)]
        );
        assert!(table.phones.is_empty());
    }

    #[test]
    fn toml_rejects_unknown_attributes() {
        assert!(toml::from_str::<AliasTable>("nickname = [\"nick\"]").is_err());
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        let result: Result<AliasTable, _> =
            serde_json::from_value(serde_json::json!({"nickname": ["nick"]}));
        assert!(result.is_err());
    }
}
