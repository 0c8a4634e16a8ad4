//! Order submission.
//!
//! Checkout is sequential and non-transactional. The order email is the
//! commit point: a failed send aborts before any stock is touched, while
//! per-line stock decrements after a successful send are logged and
//! tolerated so the order is never lost to a partial write.

use amara_core::Money;
use serde::Deserialize;
use serde_json::json;

use crate::content::ContentClient;
use crate::content::types::{DiscountType, Promotion};
use crate::error::{AppError, Result};
use crate::models::Cart;
use crate::services::EmailJsClient;

/// Reply-to address stamped on order notification emails.
const ORDER_FROM_EMAIL: &str = "order@amarathreads.com";

/// Customer contact details submitted with an order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub address_details: String,
    pub notes: String,
}

impl CustomerDetails {
    /// Whether name, phone and address are all filled in.
    #[must_use]
    pub fn has_required_fields(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.phone.trim().is_empty()
            && !self.address.trim().is_empty()
    }
}

/// Render the plain-text order summary the shop owner receives.
#[must_use]
pub fn compose_order_message(
    cart: &Cart,
    customer: &CustomerDetails,
    promotions: &[Promotion],
) -> String {
    let landmark = if customer.address_details.is_empty() {
        String::new()
    } else {
        format!("\nBuilding/Landmark: {}", customer.address_details)
    };
    let notes = if customer.notes.is_empty() {
        "None"
    } else {
        customer.notes.as_str()
    };

    format!(
        "\u{1f4e6} NEW INDIVIDUAL ORDER\n\n\
         Order Items:\n\
         {items}\n\n\
         \u{1f4ca} Order Total: {total}\n\n\
         \u{1f4cd} Delivery Address:\n\
         {address}\n\
         {landmark}\n\n\
         \u{1f4de} Phone: {phone}\n\n\
         \u{1f3f7}\u{fe0f} Active Promotions at Time of Order:\n\
         {promotions}\n\n\
         \u{1f4dd} Additional Notes:\n\
         {notes}",
        items = format_order_lines(cart),
        total = cart.total(),
        address = customer.address,
        phone = customer.phone,
        promotions = format_promotions(promotions),
    )
}

/// One bulleted line per cart line, with the line total.
fn format_order_lines(cart: &Cart) -> String {
    cart.lines()
        .iter()
        .map(|line| {
            format!(
                "\u{2022} {} ({}, {}) x{} - {}",
                line.name,
                line.size,
                line.color,
                line.quantity,
                Money::shillings(line.subtotal())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Promotions active at order time, one line each, or `None`.
fn format_promotions(promotions: &[Promotion]) -> String {
    if promotions.is_empty() {
        return "None".to_string();
    }

    promotions
        .iter()
        .map(|promo| {
            let discount = match promo.discount_type {
                Some(DiscountType::Percentage) => {
                    format!(
                        "{}% OFF",
                        promo.discount_value.unwrap_or_default().normalize()
                    )
                }
                Some(DiscountType::Fixed) => {
                    format!(
                        "KSh {} OFF",
                        promo.discount_value.unwrap_or_default().normalize()
                    )
                }
                Some(DiscountType::FreeGift) => {
                    let gift = promo
                        .gift_description
                        .as_deref()
                        .filter(|gift| !gift.is_empty())
                        .unwrap_or("Special item");
                    let mut label = format!("Free Gift: {gift}");
                    if let Some(min) = promo.minimum_spend.filter(|min| !min.is_zero()) {
                        label.push_str(&format!(" (min spend: {})", Money::shillings(min)));
                    }
                    label
                }
                Some(other) => other.as_str().to_uppercase(),
                None => "SPECIAL".to_string(),
            };

            let mut line = format!("\u{1f3f7}\u{fe0f} {} ({discount})", promo.title);
            if let Some(code) = promo.code.as_deref().filter(|code| !code.is_empty()) {
                line.push_str(&format!(" - Code: {code}"));
            }
            if let Some(msg) = promo.display_message.as_deref().filter(|msg| !msg.is_empty()) {
                line.push_str(&format!(" - {msg}"));
            }
            line.push_str(&format!(" - Ends: {}", promo.end_date.format("%-m/%-d/%Y")));
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Commit an order: email the summary, then decrement stock per line.
///
/// Stock is decremented sequentially after the send succeeds. Per-line
/// decrement failures do not fail the order.
///
/// # Errors
///
/// Returns [`AppError::OrderEmail`] if the notification send fails; no
/// stock has been touched at that point.
pub async fn commit_order(
    content: &ContentClient,
    emailjs: &EmailJsClient,
    template_id: &str,
    recipient: &str,
    cart: &Cart,
    customer: &CustomerDetails,
    promotions: &[Promotion],
) -> Result<()> {
    let message = compose_order_message(cart, customer, promotions);

    let template_params = json!({
        "from_name": customer.name,
        "from_email": ORDER_FROM_EMAIL,
        "phone": customer.phone,
        "company": "Individual Order",
        "message": message,
        "to_email": recipient,
    });

    emailjs
        .send(template_id, template_params)
        .await
        .map_err(AppError::OrderEmail)?;

    for line in cart.lines() {
        if let Err(err) = content
            .decrement_variant_stock(&line.product_id, &line.variant_key, line.quantity)
            .await
        {
            tracing::warn!(
                error = %err,
                product_id = %line.product_id,
                variant_key = %line.variant_key,
                "Failed to update variant stock after order"
            );
        }
    }

    Ok(())
}
