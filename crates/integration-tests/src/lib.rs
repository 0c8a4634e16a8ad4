//! Integration tests for Amara Threads.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront (CONTENT_PROJECT_ID and STOREFRONT_BASE_URL required)
//! cargo run -p amara-storefront
//!
//! # Run the ignored tests against it
//! cargo test -p amara-integration-tests -- --ignored
//! ```
//!
//! Every test talks to a live server over HTTP, so all of them are
//! `#[ignore]`d by default. Tests that need a collaborator beyond the
//! storefront itself (Redis, the content store) say so in their ignore
//! reason.

use reqwest::Client;

/// Base URL of the storefront under test (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client with a cookie store, so the session cart follows along.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialized.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
