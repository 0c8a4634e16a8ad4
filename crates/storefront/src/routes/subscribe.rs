//! Mailing-list subscription endpoint.
//!
//! Adds an address to the mailing-list store in normalized form and
//! records the subscriber's profile. Tolerates an absent or malformed
//! request body; a missing email is the caller's mistake, everything
//! else about the body is optional.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use amara_core::Email;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Subscription request body. Both fields optional so validation can
/// answer with a message instead of a bare deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Subscription acknowledgement.
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub ok: bool,
}

/// Subscribe an email address to the mailing list.
///
/// Subscribing twice is harmless: the address set deduplicates and the
/// profile hash is overwritten with the latest name.
#[instrument(skip(state, body))]
pub async fn subscribe(
    State(state): State<AppState>,
    body: Option<Json<SubscribeRequest>>,
) -> Result<Json<SubscribeResponse>> {
    let Some(mailing_list) = state.mailing_list() else {
        return Err(AppError::Unconfigured(
            "Storage is not configured on the server.".to_string(),
        ));
    };

    let request = body.map(|Json(request)| request).unwrap_or_default();

    let raw_email = request.email.unwrap_or_default();
    if raw_email.is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }

    let email = Email::parse_normalized(&raw_email)
        .map_err(|_| AppError::Validation("Invalid email".to_string()))?;

    mailing_list
        .add_subscriber(&email, request.name.as_deref())
        .await?;

    tracing::info!(email = %email, "Mailing list subscription recorded");
    Ok(Json(SubscribeResponse { ok: true }))
}
