//! Demo fixture
//!
//! With `demo=1` the pipeline skips the upstream call and coerces one of
//! these payloads instead. Built-in schemas coerce the fixture through the
//! deployment's own coercer; custom schemas fall back to the retail table.

use crate::config::SchemaKind;
use callerid_phone::CanonicalPhone;
use callerid_record::{AliasTable, CallerRecord, Coercer};
use serde_json::{json, Value};

/// Phone shown when demo mode is requested without one
pub const DEMO_PHONE: &str = "+17145551212";

/// Demo payload shaped like the given schema
///
/// Custom schemas get the retail fixture.
#[must_use]
pub fn fixture_payload(schema: SchemaKind) -> Value {
    match schema {
        SchemaKind::Healthcare => json!({
            "patient_first_name": "Ana",
            "patient_last_name": "Ruiz",
            "clinic_name": "Harbor Family Clinic",
            "provider_name": "Dr. Priya Lee",
            "email": "ana.ruiz@example.com",
            "phones": ["+17145551212", "+17145559876"],
            "address": {
                "line1": "400 Harbor Blvd",
                "city": "Costa Mesa",
                "state": "CA",
                "postal_code": "92627"
            },
            "eligibility": ["Chronic Care Management", "Remote Patient Monitoring"],
            "risk_score": 3,
            "status": "Active patient",
            "patient_since": "2017-09-12",
            "alerts": ["Prefers afternoon appointments"],
            "patient_id": "P-204811",
            "insurance": {
                "plan": "Harbor Gold PPO",
                "member_id": "HG-55102",
                "copay": "$25.00",
                "tier": "Gold"
            },
            "preferred_language": "Spanish"
        }),
        SchemaKind::Retail | SchemaKind::Custom => json!({
            "first_name": "Jordan",
            "last_name": "Park",
            "company": "Parkline Outfitters",
            "title": "Purchasing Manager",
            "emails": ["jordan@parkline.example.com", "jordan.park@example.com"],
            "phones": ["+17145551212", "+17145550000"],
            "address": {
                "street": "12 Main St",
                "line2": "Suite 4",
                "city": "Irvine",
                "state": "CA",
                "zip": "92618",
                "country": "US"
            },
            "tags": ["VIP", "Wholesale"],
            "risk": 1,
            "status": "Active",
            "customer_since": "2019-04-01",
            "notes": ["Prefers email follow-up"],
            "customer_id": "C-1042",
            "loyalty_tier": "Gold",
            "lifetime_value": "$18,240.00",
            "last_order": "2024-11-02"
        }),
    }
}

/// Demo record for the given schema
///
/// Custom deployments coerce the retail fixture through the retail table.
#[must_use]
pub fn fixture_record(
    schema: SchemaKind,
    configured: &Coercer,
    phone: &CanonicalPhone,
    country_prefix: &str,
) -> CallerRecord {
    let payload = fixture_payload(schema);
    match schema {
        SchemaKind::Custom => Coercer::new(AliasTable::retail())
            .with_default_country_prefix(country_prefix)
            .coerce(&payload, phone),
        SchemaKind::Retail | SchemaKind::Healthcare => configured.coerce(&payload, phone),
    }
}
