//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The cart is the only
//! session payload, so losing sessions on restart costs a visitor their
//! cart and nothing else.

use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "amara_session";

/// How long an untouched cart survives.
const SESSION_IDLE_EXPIRY: Duration = Duration::days(7);

/// Create the session layer with an in-memory store.
///
/// The cookie is marked `Secure` only when the public base URL is an
/// https origin, so local http development still gets a session.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(SESSION_IDLE_EXPIRY))
        .with_secure(is_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
