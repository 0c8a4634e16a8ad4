//! Mailing-list campaign dispatch endpoint.
//!
//! Sends the configured campaign template to every stored subscriber in
//! one burst: all sends are spawned at once and the response tallies the
//! outcomes. A failure to load one subscriber's profile counts as a
//! failed send for that subscriber, never as a failure of the run.

use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::{EmailJsClient, EmailJsError, MailingList, MailingListError};
use crate::state::AppState;

/// Campaign dispatch outcome.
#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    pub ok: bool,
    pub sent: u32,
    /// Absent only when there were no subscribers to send to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<u32>,
}

#[derive(Debug, Error)]
enum DeliveryError {
    #[error(transparent)]
    Profile(#[from] MailingListError),
    #[error(transparent)]
    Send(#[from] EmailJsError),
}

async fn deliver_one(
    mailing_list: &MailingList,
    emailjs: &EmailJsClient,
    template_id: &str,
    email: &str,
) -> std::result::Result<(), DeliveryError> {
    let name = mailing_list.subscriber_name(email).await?;
    emailjs
        .send(
            template_id,
            json!({
                "to_email": email,
                "to_name": name.unwrap_or_default(),
            }),
        )
        .await?;
    Ok(())
}

/// Send the campaign template to every subscriber.
///
/// Exposed on both GET and POST so it can be triggered from a browser as
/// well as a scheduler.
#[instrument(skip(state))]
pub async fn send_campaign(State(state): State<AppState>) -> Result<Json<CampaignResponse>> {
    let Some(mailing_list) = state.mailing_list() else {
        return Err(AppError::Unconfigured(
            "Storage is not configured on the server.".to_string(),
        ));
    };

    let Some((emailjs, template_id)) = state.emailjs().zip(
        state
            .config()
            .emailjs
            .as_ref()
            .and_then(|config| config.campaign_template_id.as_deref()),
    ) else {
        return Err(AppError::Unconfigured(
            "EmailJS is not configured on the server.".to_string(),
        ));
    };

    let subscribers = mailing_list.subscriber_emails().await?;
    if subscribers.is_empty() {
        return Ok(Json(CampaignResponse {
            ok: true,
            sent: 0,
            failed: None,
        }));
    }

    let mut tasks = JoinSet::new();
    for email in subscribers {
        let mailing_list = mailing_list.clone();
        let emailjs = emailjs.clone();
        let template_id = template_id.to_string();
        tasks.spawn(async move {
            let outcome = deliver_one(&mailing_list, &emailjs, &template_id, &email).await;
            (email, outcome)
        });
    }

    let mut sent: u32 = 0;
    let mut failed: u32 = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => sent += 1,
            Ok((email, Err(error))) => {
                failed += 1;
                tracing::warn!(email = %email, error = %error, "Campaign email failed");
            }
            Err(error) => {
                failed += 1;
                tracing::warn!(error = %error, "Campaign send task panicked");
            }
        }
    }

    tracing::info!(sent, failed, "Campaign dispatch finished");
    Ok(Json(CampaignResponse {
        ok: true,
        sent,
        failed: Some(failed),
    }))
}
