//! Testing utilities for the callerid workspace
//!
//! Shared payload fixtures and a loopback mock of the upstream lookup API.

#![allow(missing_docs)]

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use warp::http::{HeaderMap, Method, Response};
use warp::hyper::body::Bytes;
use warp::path::FullPath;
use warp::Filter;

/// Phone every fixture is keyed on
pub const FIXTURE_PHONE: &str = "+17145551212";

/// Minimal retail payload: split name and one email
pub fn jordan_park_payload() -> Value {
    json!({
        "first_name": "Jordan",
        "last_name": "Park",
        "email_address": "jordan@parkline.example.com"
    })
}

/// Retail payload exercising every mapped field
pub fn retail_payload() -> Value {
    json!({
        "full_name": "Jordan Park",
        "company_name": "Parkline Outfitters",
        "job_title": "Purchasing Manager",
        "emails": ["jordan@parkline.example.com"],
        "phones": [FIXTURE_PHONE, "(714) 555-0000"],
        "address": {"street": "12 Main St", "city": "Irvine", "state": "CA", "zip": "92618"},
        "tags": ["VIP"],
        "risk_score": "2",
        "status": "Active",
        "customer_since": 1_554_076_800,
        "customer_id": "C-1042",
        "lifetime_value": "$18,240.00"
    })
}

/// Healthcare payload with nested insurance details
pub fn healthcare_payload() -> Value {
    json!({
        "patient_name": "Ana Ruiz",
        "clinic_name": "Harbor Family Clinic",
        "provider_name": "Dr. Priya Lee",
        "eligibility": ["Chronic Care Management"],
        "patient_id": "P-204811",
        "insurance": {"plan": "Harbor Gold PPO", "member_id": "HG-55102", "copay": "$25.00"}
    })
}

/// Request as seen by the mock upstream
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    /// Lowercased header names
    pub headers: HashMap<String, String>,
    /// Parsed JSON body, `None` when empty or not JSON
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Loopback HTTP server answering every request with one canned response
///
/// Shuts down when dropped.
pub struct MockUpstream {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    /// Serve `body` with `status` on an ephemeral port
    ///
    /// Must be called inside a tokio runtime.
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let body: String = body.into();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&requests);

        let route = warp::any()
            .and(warp::method())
            .and(warp::path::full())
            .and(warp::query::<HashMap<String, String>>())
            .and(warp::header::headers_cloned())
            .and(warp::body::bytes())
            .map(
                move |method: Method,
                      path: FullPath,
                      query: HashMap<String, String>,
                      headers: HeaderMap,
                      raw: Bytes| {
                    recorder.lock().push(RecordedRequest {
                        method: method.as_str().to_string(),
                        path: path.as_str().to_string(),
                        query,
                        headers: headers
                            .iter()
                            .filter_map(|(name, value)| {
                                value
                                    .to_str()
                                    .ok()
                                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
                            })
                            .collect(),
                        body: serde_json::from_slice(&raw).ok(),
                    });

                    Response::builder()
                        .status(status)
                        .header("content-type", "application/json")
                        .body(body.clone())
                },
            );

        let (tx, rx) = oneshot::channel::<()>();
        let (addr, server) =
            warp::serve(route).bind_with_graceful_shutdown(([127, 0, 0, 1], 0), async {
                rx.await.ok();
            });
        tokio::spawn(server);

        Self {
            addr,
            requests,
            shutdown: Some(tx),
        }
    }

    /// Serve a JSON value with `status`
    pub async fn start_json(status: u16, body: &Value) -> Self {
        Self::start(status, body.to_string()).await
    }

    /// Absolute URL for `path` on this server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Most recent request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_objects() {
        for payload in [jordan_park_payload(), retail_payload(), healthcare_payload()] {
            assert!(payload.is_object());
        }
    }

    #[test]
    fn recorded_header_lookup_ignores_case() {
        let request = RecordedRequest {
            method: "GET".into(),
            path: "/".into(),
            query: HashMap::new(),
            headers: HashMap::from([("authorization".to_string(), "Bearer t".to_string())]),
            body: None,
        };
        assert_eq!(request.header("Authorization"), Some("Bearer t"));
    }
}
