//! EmailJS API client for transactional sends.
//!
//! EmailJS renders a stored template on their side from the
//! `template_params` map, so the storefront only composes parameter
//! values. Authentication is the public key carried in the request body;
//! there are no auth headers.

use serde_json::Value;
use thiserror::Error;

use crate::config::EmailJsConfig;

/// Errors that can occur when dispatching through EmailJS.
#[derive(Debug, Error)]
pub enum EmailJsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// EmailJS API client.
#[derive(Clone)]
pub struct EmailJsClient {
    client: reqwest::Client,
    send_url: String,
    service_id: String,
    public_key: String,
}

impl EmailJsClient {
    /// Create a new EmailJS client.
    #[must_use]
    pub fn new(config: &EmailJsConfig) -> Self {
        let send_url = format!(
            "{}/api/v1.0/email/send",
            config.api_url.trim_end_matches('/')
        );

        Self {
            client: reqwest::Client::new(),
            send_url,
            service_id: config.service_id.clone(),
            public_key: config.public_key.clone(),
        }
    }

    /// Render and send one email through a stored template.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or EmailJS rejects the send.
    pub async fn send(&self, template_id: &str, template_params: Value) -> Result<(), EmailJsError> {
        let body = serde_json::json!({
            "service_id": self.service_id,
            "template_id": template_id,
            "user_id": self.public_key,
            "template_params": template_params,
        });

        let response = self.client.post(&self.send_url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmailJsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
