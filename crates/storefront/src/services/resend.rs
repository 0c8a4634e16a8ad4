//! Resend API client for bulk newsletter delivery.
//!
//! Sends go out in fixed-size batches so one slow or rejected recipient
//! cannot stall the whole run. Per-recipient failures are tallied, never
//! propagated.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tokio::task::JoinSet;

use crate::config::ResendConfig;
use crate::services::DispatchTally;

/// Number of sends dispatched concurrently per batch.
const BATCH_SIZE: usize = 50;

/// Errors that can occur when interacting with the Resend API.
#[derive(Debug, Error)]
pub enum ResendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build the client.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Resend API client for newsletter delivery.
#[derive(Clone)]
pub struct ResendClient {
    client: reqwest::Client,
    emails_url: String,
    from_email: String,
}

impl ResendClient {
    /// Create a new Resend API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ResendConfig) -> Result<Self, ResendError> {
        let mut headers = HeaderMap::new();

        // Authorization header
        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ResendError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let emails_url = format!("{}/emails", config.api_url.trim_end_matches('/'));

        Ok(Self {
            client,
            emails_url,
            from_email: config.from_email.clone(),
        })
    }

    /// Send a single email.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Resend rejects the send.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ResendError> {
        let body = serde_json::json!({
            "from": self.from_email,
            "to": to,
            "subject": subject,
            "html": html,
        });

        let response = self.client.post(&self.emails_url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ResendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Send the same email to every recipient in batches.
    ///
    /// Each batch is dispatched concurrently and awaited in full before
    /// the next batch starts.
    pub async fn send_batched(
        &self,
        recipients: &[String],
        subject: &str,
        html: &str,
    ) -> DispatchTally {
        let mut tally = DispatchTally::default();

        for batch in recipients.chunks(BATCH_SIZE) {
            let mut tasks = JoinSet::new();

            for recipient in batch {
                let client = self.clone();
                let recipient = recipient.clone();
                let subject = subject.to_string();
                let html = html.to_string();

                tasks.spawn(async move {
                    let result = client.send(&recipient, &subject, &html).await;
                    (recipient, result)
                });
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((_, Ok(()))) => tally.sent += 1,
                    Ok((recipient, Err(err))) => {
                        tracing::warn!(error = %err, %recipient, "Newsletter send failed");
                        tally.failed += 1;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Newsletter send task panicked");
                        tally.failed += 1;
                    }
                }
            }
        }

        tally
    }
}
