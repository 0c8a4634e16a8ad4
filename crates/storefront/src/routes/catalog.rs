//! Catalog and site-content read endpoints.
//!
//! Thin JSON passthroughs over the content store. Every request re-fetches;
//! the store documents are re-serialized to the client unchanged, so the
//! wire shapes here are the store's own.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use tracing::instrument;

use crate::content::types::{
    Category, CoreValue, CorporateDiscount, CorporatePricing, HeroImage, Mockup, Product,
    Promotion, ServiceOffering, SiteSettings,
};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// All products, name ascending.
#[instrument(skip(state))]
pub async fn products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.content().products().await?))
}

/// One product by slug.
#[instrument(skip(state))]
pub async fn product_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let product = state
        .content()
        .product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(Json(product))
}

/// Categories in display order.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.content().categories().await?))
}

#[instrument(skip(state))]
pub async fn hero_images(State(state): State<AppState>) -> Result<Json<Vec<HeroImage>>> {
    Ok(Json(state.content().hero_images().await?))
}

#[instrument(skip(state))]
pub async fn services(State(state): State<AppState>) -> Result<Json<Vec<ServiceOffering>>> {
    Ok(Json(state.content().services().await?))
}

#[instrument(skip(state))]
pub async fn mockups(State(state): State<AppState>) -> Result<Json<Vec<Mockup>>> {
    Ok(Json(state.content().mockups().await?))
}

#[instrument(skip(state))]
pub async fn core_values(State(state): State<AppState>) -> Result<Json<Vec<CoreValue>>> {
    Ok(Json(state.content().core_values().await?))
}

/// The site settings singleton; `null` until it has been authored.
#[instrument(skip(state))]
pub async fn site_settings(State(state): State<AppState>) -> Result<Json<Option<SiteSettings>>> {
    Ok(Json(state.content().site_settings().await?))
}

/// Promotions inside their date window, soonest-ending first.
///
/// Recurrence is deliberately not applied here: display surfaces decide
/// per-promotion what "active today" means, and the order composer wants
/// the whole windowed list.
#[instrument(skip(state))]
pub async fn promotions(State(state): State<AppState>) -> Result<Json<Vec<Promotion>>> {
    Ok(Json(state.content().promotions().await?))
}

/// The one promotion the storefront banner shows right now: the first of
/// the windowed list that is active today under its recurrence rule.
#[instrument(skip(state))]
pub async fn promotion_banner(State(state): State<AppState>) -> Result<Json<Option<Promotion>>> {
    let now = Utc::now();
    let banner = state
        .content()
        .promotions()
        .await?
        .into_iter()
        .find(|promo| promo.is_active_at(now));
    Ok(Json(banner))
}

/// Corporate volume discount tiers.
#[instrument(skip(state))]
pub async fn corporate_discounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<CorporateDiscount>>> {
    Ok(Json(state.content().corporate_discounts().await?))
}

/// Corporate price-list entries.
#[instrument(skip(state))]
pub async fn corporate_pricing(
    State(state): State<AppState>,
) -> Result<Json<Vec<CorporatePricing>>> {
    Ok(Json(state.content().corporate_pricing().await?))
}
