//! Integration tests for the mailing-list and newsletter endpoints.
//!
//! These tests require:
//! - The storefront server running (cargo run -p amara-storefront)
//! - `REDIS_URL` configured on the server for the subscription tests
//!
//! Run with: cargo test -p amara-integration-tests -- --ignored

use amara_integration_tests::{client, storefront_base_url};
use reqwest::{Method, StatusCode, header};
use serde_json::{Value, json};

// ============================================================================
// Method Handling
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_wrong_methods_get_a_json_405() {
    let base_url = storefront_base_url();
    let client = client();

    for path in ["/api/subscribe", "/api/newsletter/send", "/api/checkout"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{path}");
        let body: Value = resp.json().await.expect("Failed to parse error");
        assert_eq!(body["error"], "Method not allowed", "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_newsletter_send_answers_cors_preflight() {
    let base_url = storefront_base_url();

    let resp = client()
        .request(Method::OPTIONS, format!("{base_url}/api/newsletter/send"))
        .header(header::ORIGIN, "https://studio.amarathreads.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .send()
        .await
        .expect("Failed to send preflight");

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().expect("header value")),
        Some("*")
    );
}

// ============================================================================
// Subscription Validation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server with REDIS_URL configured"]
async fn test_subscribe_requires_an_email() {
    let base_url = storefront_base_url();

    let resp = client()
        .post(format!("{base_url}/api/subscribe"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to post subscription");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Email is required");
}

#[tokio::test]
#[ignore = "Requires running storefront server with REDIS_URL configured"]
async fn test_subscribe_rejects_a_malformed_email() {
    let base_url = storefront_base_url();

    let resp = client()
        .post(format!("{base_url}/api/subscribe"))
        .json(&json!({"email": "not-an-email"}))
        .send()
        .await
        .expect("Failed to post subscription");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Invalid email");
}

#[tokio::test]
#[ignore = "Requires running storefront server with REDIS_URL configured"]
async fn test_subscribe_accepts_a_valid_email() {
    let base_url = storefront_base_url();

    let resp = client()
        .post(format!("{base_url}/api/subscribe"))
        .json(&json!({
            "email": "integration-test@amarathreads.com",
            "name": "Integration Tester"
        }))
        .send()
        .await
        .expect("Failed to post subscription");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], true);
}

// ============================================================================
// Newsletter Guards
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server with CONTENT_API_TOKEN and RESEND_API_KEY"]
async fn test_newsletter_send_requires_an_id() {
    let base_url = storefront_base_url();

    let resp = client()
        .post(format!("{base_url}/api/newsletter/send"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to post newsletter send");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "newsletterId is required");
}
