//! Caller lookup against an upstream record system
//!
//! Given a phone number (and, for some deployments, a first and last name),
//! fetch matching caller records from an upstream API and coerce them into
//! the shared [`CallerRecord`](callerid_record::CallerRecord) shape.
//!
//! # Architecture
//!
//! ```text
//! CallerQuery ──► normalize ──► LookupClient ──► UpstreamTransport
//!                                   │                  (reqwest)
//!                                   ▼
//!                        Coercer(AliasTable) ──► LookupReport
//! ```
//!
//! Two request styles are supported:
//! - `Query`: `GET <endpoint>?phone=<canonical>` with a bearer credential
//! - `VerificationToken`: `POST <endpoint>` with a JSON body carrying the
//!   digits-only phone and optional names, credential in a named header
//!
//! Every failure is classified as configuration, validation or upstream;
//! "no match" is a distinct, non-error outcome.
//!
//! # Example
//!
//! ```rust,no_run
//! use callerid_lookup::{CallerQuery, LookupConfig, Pipeline};
//!
//! # async fn run() -> Result<(), callerid_lookup::LookupError> {
//! let config = LookupConfig::new()
//!     .with_endpoint("https://crm.example.com/api/callers")
//!     .with_token("secret");
//! let pipeline = Pipeline::from_config(config)?;
//!
//! let report = pipeline.handle(&CallerQuery::new("(714) 555-1212")).await;
//! println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod transport;

pub use client::{parse_payloads, CallerName, LookupClient, LookupOutcome};
pub use config::{ConfigFileError, LookupConfig, RequestStyle, SchemaKind, DEFAULT_TOKEN_HEADER};
pub use error::{FailureCategory, InputField, LookupError, LookupResult, UpstreamFailure};
pub use pipeline::{CallerQuery, Pipeline};
pub use report::LookupReport;
pub use transport::{HttpMethod, ReqwestTransport, UpstreamRequest, UpstreamResponse, UpstreamTransport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running lookups
    pub use crate::client::{CallerName, LookupClient, LookupOutcome};
    pub use crate::config::{LookupConfig, RequestStyle, SchemaKind};
    pub use crate::error::{FailureCategory, LookupError, LookupResult};
    pub use crate::pipeline::{CallerQuery, Pipeline};
    pub use crate::report::LookupReport;
    pub use callerid_phone::CanonicalPhone;
    pub use callerid_record::CallerRecord;
}
