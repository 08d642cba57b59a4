//! Mock upstream behaves like a real HTTP server

use callerid_test_utils::{retail_payload, MockUpstream};
use serde_json::json;

#[tokio::test]
async fn records_get_requests() {
    let upstream = MockUpstream::start_json(200, &retail_payload()).await;

    let response = reqwest::Client::new()
        .get(upstream.url("/callers"))
        .query(&[("phone", "+17145551212")])
        .bearer_auth("secret")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["full_name"], json!("Jordan Park"));

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/callers");
    assert_eq!(requests[0].query["phone"], "+17145551212");
    assert_eq!(requests[0].header("authorization"), Some("Bearer secret"));
    assert_eq!(requests[0].body, None);
}

#[tokio::test]
async fn records_post_bodies_and_status() {
    let upstream = MockUpstream::start(503, "maintenance").await;

    let response = reqwest::Client::new()
        .post(upstream.url("lookup"))
        .json(&json!({"phone_number": "17145551212"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 503);
    assert_eq!(response.text().await.unwrap(), "maintenance");

    let request = upstream.last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.body, Some(json!({"phone_number": "17145551212"})));
}
