//! Checkout endpoint.
//!
//! Turns the session cart plus customer details into one committed order:
//! validation, then the order email, then per-line stock decrements, then
//! the cart is cleared. Promotions are fetched only to enrich the order
//! summary; if that read fails the order still goes through without them.

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::checkout::{CustomerDetails, commit_order};
use crate::error::{AppError, Result};
use crate::models::session::{load_cart, store_cart};
use crate::state::AppState;

/// Order acknowledgement.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub message: String,
}

/// Place an order from the session cart.
#[instrument(skip(state, session, customer), fields(customer_name = %customer.name))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    Json(customer): Json<CustomerDetails>,
) -> Result<Json<OrderResponse>> {
    let mut cart = load_cart(&session).await;
    if cart.is_empty() {
        return Err(AppError::Validation("Cart is empty".to_string()));
    }
    if !customer.has_required_fields() {
        return Err(AppError::Validation(
            "Please fill in all required fields (Name, Phone, and Address).".to_string(),
        ));
    }

    let unconfigured = || AppError::Unconfigured("Email service is not configured.".to_string());
    let config = state.config().emailjs.as_ref().ok_or_else(unconfigured)?;
    let template_id = config.order_template_id.as_deref().ok_or_else(unconfigured)?;
    let emailjs = state.emailjs().ok_or_else(unconfigured)?;

    let promotions = match state.content().promotions().await {
        Ok(promotions) => promotions,
        Err(error) => {
            tracing::warn!(error = %error, "Failed to load promotions for the order summary");
            Vec::new()
        }
    };

    commit_order(
        state.content(),
        emailjs,
        template_id,
        &config.order_recipient,
        &cart,
        &customer,
        &promotions,
    )
    .await?;

    cart.clear();
    store_cart(&session, &cart)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to clear cart: {e}")))?;

    tracing::info!("Order placed");
    Ok(Json(OrderResponse {
        success: true,
        message: "Order placed successfully! We'll contact you shortly.".to_string(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_response_shape() {
        let json = serde_json::to_value(OrderResponse {
            success: true,
            message: "Order placed successfully! We'll contact you shortly.".to_string(),
        })
        .unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(
            json["message"],
            "Order placed successfully! We'll contact you shortly."
        );
    }
}
