//! Session storage for the cart.
//!
//! The cart lives under a single session key as a JSON array. Loading is
//! fail-open: an absent or unreadable value yields an empty cart instead
//! of an error, so a bad session never locks a visitor out of shopping.

use tower_sessions::Session;

use super::cart::Cart;

/// Session keys for cart data.
pub mod keys {
    /// Key for storing the visitor's cart.
    pub const CART: &str = "cart";
}

/// Load the visitor's cart, treating missing or corrupt data as empty.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session store rejects the write; callers treat
/// that as a failed mutation since the change would not survive the
/// request.
pub async fn store_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}
