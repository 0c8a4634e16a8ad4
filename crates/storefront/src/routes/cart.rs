//! Cart route handlers.
//!
//! The cart lives in the visitor's session; these handlers are thin JSON
//! wrappers around [`Cart`]'s mutation laws. Rejected mutations (stock
//! ceiling, unknown line) come back as `success: false` with a user-facing
//! message and HTTP 200, mirroring the boolean contract of the store
//! itself. Only a session-persistence failure is a server error.

use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::cart::{Cart, CartLine, CartLineInput};
use crate::models::session::{load_cart, store_cart};

/// Cart state as the client sees it after an operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub items: Vec<CartLine>,
    pub total_items: u32,
    pub total_price: Decimal,
    /// Hint for the cart drawer: `true` after an add that asked for it,
    /// `false` after a clear, absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_open: Option<bool>,
}

impl CartResponse {
    fn accepted(cart: &Cart) -> Self {
        Self {
            success: true,
            message: None,
            items: cart.lines().to_vec(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            cart_open: None,
        }
    }

    fn rejected(cart: &Cart, message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            ..Self::accepted(cart)
        }
    }
}

const fn default_quantity() -> u32 {
    1
}

const fn default_open_cart() -> bool {
    true
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(flatten)]
    pub item: CartLineInput,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Whether a successful add should pop the cart drawer open.
    #[serde(default = "default_open_cart")]
    pub open_cart: bool,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub id: String,
    pub quantity: u32,
}

/// Remove line request body.
#[derive(Debug, Deserialize)]
pub struct RemoveCartRequest {
    pub id: String,
}

async fn persist(session: &Session, cart: &Cart) -> Result<()> {
    store_cart(session, cart)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to persist cart: {e}")))
}

/// Current cart contents.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartResponse> {
    let cart = load_cart(&session).await;
    Json(CartResponse::accepted(&cart))
}

/// Add an item to the cart.
///
/// Fails without mutating when the variant's cart quantity would exceed
/// the stock snapshot carried by the request.
#[instrument(skip(session, request))]
pub async fn add(
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let mut cart = load_cart(&session).await;

    let available = request.item.max_stock;
    if !cart.add_line(request.item, request.quantity) {
        return Ok(Json(CartResponse::rejected(
            &cart,
            format!("Cannot add more - only {available} available!"),
        )));
    }

    persist(&session, &cart).await?;

    let mut response = CartResponse::accepted(&cart);
    if request.open_cart {
        response.cart_open = Some(true);
    }
    Ok(Json(response))
}

/// Set a line's quantity. Zero removes the line.
#[instrument(skip(session, request))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartResponse>> {
    let mut cart = load_cart(&session).await;

    if !cart.update_quantity(&request.id, request.quantity) {
        let message = cart
            .lines()
            .iter()
            .find(|line| line.id == request.id)
            .map_or_else(
                || "Item not found in cart.".to_string(),
                |line| format!("Cannot add more - only {} available!", line.max_stock),
            );
        return Ok(Json(CartResponse::rejected(&cart, message)));
    }

    persist(&session, &cart).await?;
    Ok(Json(CartResponse::accepted(&cart)))
}

/// Remove a line. Removing an absent line still succeeds.
#[instrument(skip(session, request))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveCartRequest>,
) -> Result<Json<CartResponse>> {
    let mut cart = load_cart(&session).await;
    cart.remove_line(&request.id);
    persist(&session, &cart).await?;
    Ok(Json(CartResponse::accepted(&cart)))
}

/// Empty the cart and signal the drawer shut.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartResponse>> {
    let mut cart = load_cart(&session).await;
    cart.clear();
    persist(&session, &cart).await?;

    let mut response = CartResponse::accepted(&cart);
    response.cart_open = Some(false);
    Ok(Json(response))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use amara_core::{ProductId, VariantKey};
    use tower_sessions::{MemoryStore, Session};

    use super::*;

    fn fresh_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn add_request(quantity: u32, max_stock: u32) -> AddToCartRequest {
        AddToCartRequest {
            item: CartLineInput {
                product_id: ProductId::new("prod-shirt"),
                variant_key: VariantKey::new("v1"),
                name: "Ankara Shirt".to_string(),
                price: Decimal::from(2500),
                image: None,
                size: "M".to_string(),
                color: "Indigo".to_string(),
                color_hex: None,
                max_stock,
            },
            quantity,
            open_cart: true,
        }
    }

    #[tokio::test]
    async fn test_add_persists_and_opens_the_drawer() {
        let session = fresh_session();
        let Json(response) = add(session.clone(), Json(add_request(2, 5))).await.unwrap();

        assert!(response.success);
        assert_eq!(response.cart_open, Some(true));
        assert_eq!(response.total_items, 2);

        let Json(reloaded) = show(session).await;
        assert_eq!(reloaded.total_items, 2);
        assert_eq!(reloaded.items[0].id, "prod-shirt-M-Indigo");
    }

    #[tokio::test]
    async fn test_add_without_open_cart_omits_the_hint() {
        let session = fresh_session();
        let mut request = add_request(1, 5);
        request.open_cart = false;

        let Json(response) = add(session, Json(request)).await.unwrap();
        assert!(response.success);
        assert_eq!(response.cart_open, None);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_reports_the_ceiling() {
        let session = fresh_session();
        add(session.clone(), Json(add_request(4, 5))).await.unwrap();

        let Json(response) = add(session.clone(), Json(add_request(2, 5))).await.unwrap();
        assert!(!response.success);
        assert_eq!(
            response.message.as_deref(),
            Some("Cannot add more - only 5 available!")
        );
        assert_eq!(response.cart_open, None);
        // the rejected add left the cart untouched
        assert_eq!(response.total_items, 4);
    }

    #[tokio::test]
    async fn test_update_to_zero_removes_the_line() {
        let session = fresh_session();
        add(session.clone(), Json(add_request(2, 5))).await.unwrap();

        let Json(response) = update(
            session,
            Json(UpdateCartRequest {
                id: "prod-shirt-M-Indigo".to_string(),
                quantity: 0,
            }),
        )
        .await
        .unwrap();

        assert!(response.success);
        assert!(response.items.is_empty());
        assert_eq!(response.total_price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_update_failures_name_the_reason() {
        let session = fresh_session();
        add(session.clone(), Json(add_request(2, 3))).await.unwrap();

        let Json(over) = update(
            session.clone(),
            Json(UpdateCartRequest {
                id: "prod-shirt-M-Indigo".to_string(),
                quantity: 4,
            }),
        )
        .await
        .unwrap();
        assert!(!over.success);
        assert_eq!(
            over.message.as_deref(),
            Some("Cannot add more - only 3 available!")
        );
        assert_eq!(over.items[0].quantity, 2);

        let Json(missing) = update(
            session,
            Json(UpdateCartRequest {
                id: "prod-ghost-M-Indigo".to_string(),
                quantity: 1,
            }),
        )
        .await
        .unwrap();
        assert!(!missing.success);
        assert_eq!(missing.message.as_deref(), Some("Item not found in cart."));
    }

    #[tokio::test]
    async fn test_remove_then_clear_close_out_the_cart() {
        let session = fresh_session();
        add(session.clone(), Json(add_request(1, 5))).await.unwrap();

        let Json(removed) = remove(
            session.clone(),
            Json(RemoveCartRequest {
                id: "prod-shirt-M-Indigo".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(removed.success);
        assert!(removed.items.is_empty());

        let Json(cleared) = clear(session).await.unwrap();
        assert!(cleared.success);
        assert_eq!(cleared.cart_open, Some(false));
    }

    #[test]
    fn test_response_serialization_skips_absent_hints() {
        let cart = Cart::default();
        let value = serde_json::to_value(CartResponse::accepted(&cart)).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["totalItems"], 0);
        assert!(value.get("message").is_none());
        assert!(value.get("cartOpen").is_none());
    }

    #[test]
    fn test_add_request_defaults() {
        let request: AddToCartRequest = serde_json::from_value(serde_json::json!({
            "productId": "prod-1",
            "variantKey": "v1",
            "name": "Kitenge Wrap",
            "price": 3000,
            "image": null,
            "size": "S",
            "color": "Coral",
            "maxStock": 4
        }))
        .unwrap();

        assert_eq!(request.quantity, 1);
        assert!(request.open_cart);
    }
}
