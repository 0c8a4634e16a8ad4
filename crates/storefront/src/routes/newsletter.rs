//! Newsletter dispatch endpoint.
//!
//! Sends an authored newsletter to every active subscriber through the
//! bulk mail service, then stamps the document as sent. Dispatch is
//! batched with per-recipient failure tolerance; the sent stamp records
//! how many deliveries actually succeeded.

use askama::Template;
use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use amara_core::NewsletterId;

use crate::content::portable_text::blocks_to_html;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Dispatch request body. The ID is optional so an empty body gets a
/// validation message instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNewsletterRequest {
    pub newsletter_id: Option<String>,
}

/// Dispatch outcome.
#[derive(Debug, Serialize)]
pub struct SendNewsletterResponse {
    pub ok: bool,
    pub sent: u32,
    pub failed: u32,
    pub total: usize,
}

/// Branded email shell around the rendered newsletter body.
#[derive(Template)]
#[template(path = "email/newsletter.html")]
struct NewsletterEmail<'a> {
    subject: &'a str,
    preheader_text: Option<&'a str>,
    body_html: &'a str,
}

/// Send a newsletter to all active subscribers.
///
/// The sent stamp is written even when some deliveries failed; a
/// newsletter goes out once, with the tally reported to the caller.
#[instrument(skip(state, body))]
pub async fn send_newsletter(
    State(state): State<AppState>,
    body: Option<Json<SendNewsletterRequest>>,
) -> Result<Json<SendNewsletterResponse>> {
    if !state.content().has_write_token() {
        return Err(AppError::Unconfigured(
            "CONTENT_API_TOKEN not configured".to_string(),
        ));
    }
    let Some(resend) = state.resend() else {
        return Err(AppError::Unconfigured(
            "RESEND_API_KEY not configured".to_string(),
        ));
    };

    let request = body.map(|Json(request)| request).unwrap_or_default();
    let Some(id) = request.newsletter_id.filter(|id| !id.is_empty()) else {
        return Err(AppError::Validation("newsletterId is required".to_string()));
    };
    let id = NewsletterId::new(id);

    let Some(newsletter) = state.content().newsletter(&id).await? else {
        return Err(AppError::NotFound("Newsletter not found".to_string()));
    };
    if newsletter.is_sent() {
        return Err(AppError::Validation(
            "Newsletter has already been sent".to_string(),
        ));
    }

    let subscribers = state.content().active_subscribers().await?;
    if subscribers.is_empty() {
        return Err(AppError::Validation(
            "No active subscribers to send to".to_string(),
        ));
    }

    let body_html = blocks_to_html(&newsletter.body);
    let email_html = NewsletterEmail {
        subject: &newsletter.subject,
        preheader_text: newsletter.preheader_text.as_deref(),
        body_html: &body_html,
    }
    .render()?;

    let recipients: Vec<String> = subscribers
        .into_iter()
        .map(|subscriber| subscriber.email)
        .collect();
    let total = recipients.len();

    let tally = resend
        .send_batched(&recipients, &newsletter.subject, &email_html)
        .await;

    state
        .content()
        .mark_newsletter_sent(&id, Utc::now(), tally.sent)
        .await?;

    tracing::info!(
        newsletter_id = %id,
        sent = tally.sent,
        failed = tally.failed,
        total,
        "Newsletter dispatch finished"
    );

    Ok(Json(SendNewsletterResponse {
        ok: true,
        sent: tally.sent,
        failed: tally.failed,
        total,
    }))
}
