//! Caller record and schema coercion
//!
//! Upstream caller-data APIs disagree on field names: a retail CRM sends
//! `full_name` and `lifetime_value`, a clinic system sends `patient_name`,
//! `clinic_name` and `copay`. This crate reads any of them into one fixed
//! [`CallerRecord`] shape:
//! - [`AliasTable`] declares, per logical attribute, which upstream fields to
//!   try and in what order
//! - [`Coercer`] applies a table to a JSON payload; it is pure and total
//! - Fields with no first-class slot land in `meta` or synthesized `notes`
//!
//! # Architecture
//!
//! ```text
//! serde_json::Value ──► Coercer(AliasTable) ──► CallerRecord ──► renderer
//! ```
//!
//! # Example
//!
//! ```rust
//! use callerid_phone::normalize;
//! use callerid_record::{AliasTable, Coercer};
//! use serde_json::json;
//!
//! let searched = normalize("7145551212", "+1");
//! let coercer = Coercer::new(AliasTable::retail());
//! let record = coercer.coerce(
//!     &json!({"first_name": "Jordan", "last_name": "Park"}),
//!     &searched,
//! );
//! assert_eq!(record.name, "Jordan Park");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod address;
pub mod aliases;
pub mod coerce;
pub mod record;
pub mod value;

pub use aliases::{AliasTable, MetaKind, MetaRule, NoteRule};
pub use coerce::{coerce, Coercer};
pub use record::{CallerRecord, MetaValue, UNKNOWN_NAME};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for coercing upstream payloads
    pub use crate::aliases::AliasTable;
    pub use crate::coerce::Coercer;
    pub use crate::record::{CallerRecord, MetaValue};
    pub use callerid_phone::CanonicalPhone;
}
