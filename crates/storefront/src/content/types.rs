//! Typed documents returned by the content store.
//!
//! Projections return `null` for absent attributes rather than omitting the
//! key, so collection fields deserialize through [`null_as_default`] and
//! scalars stay `Option`. Field names mirror the store's camelCase wire
//! format; handlers re-serialize these types as API responses unchanged.

use amara_core::{CategoryId, NewsletterId, NewsletterStatus, ProductId, PromotionId, VariantKey};
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize `null` as the type's default value.
///
/// GROQ projections emit `"variants": null` for a product that has no
/// variants array, which a plain `Vec` field would reject.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// =============================================================================
// Catalog
// =============================================================================

/// A sellable product with its size/color variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub slug: Option<String>,
    pub price: Decimal,
    /// Resolved category name (dereferenced server-side by the store).
    pub category: Option<String>,
    pub category_slug: Option<String>,
    /// Opaque image reference, passed through to the client untouched.
    pub image: Option<Value>,
    pub description: Option<String>,
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: Vec<Variant>,
}

/// A size/color combination of a product.
///
/// Variants have no document of their own; they are keyed within their
/// product and addressed by `_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(rename = "_key")]
    pub key: VariantKey,
    pub size: String,
    pub color: String,
    pub color_hex: Option<String>,
    /// Units on hand. Absent on legacy documents, which counts as zero.
    pub stock: Option<u32>,
}

impl Variant {
    /// Units on hand, treating a missing stock attribute as zero.
    #[must_use]
    pub fn stock_on_hand(&self) -> u32 {
        self.stock.unwrap_or(0)
    }
}

/// Projection used by stock updates: just the variants array of one product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductVariants {
    pub variants: Option<Vec<Variant>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub slug: Option<String>,
    pub order: Option<i64>,
}

// =============================================================================
// Site content
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImage {
    #[serde(rename = "_id")]
    pub id: String,
    pub image: Option<Value>,
    pub alt: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mockup {
    #[serde(rename = "_id")]
    pub id: String,
    pub image: Option<Value>,
    pub alt: Option<String>,
    pub starting_price: Option<Decimal>,
    pub price_note: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreValue {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub order: Option<i64>,
}

/// Singleton document with brand copy and contact details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub company_name: Option<String>,
    pub tagline: Option<String>,
    pub logo: Option<Value>,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub contact_email: Option<String>,
    pub secondary_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub social_links: Option<Value>,
}

// =============================================================================
// Promotions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscountType {
    Percentage,
    Fixed,
    FreeGift,
    Bogo,
    FreeShipping,
    Bundle,
}

impl DiscountType {
    /// Wire name as stored in the content store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
            Self::FreeGift => "freeGift",
            Self::Bogo => "bogo",
            Self::FreeShipping => "freeShipping",
            Self::Bundle => "bundle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PeriodType {
    OneTime,
    Recurring,
    /// Period type this service does not recognize; treated as one-time.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
    /// Pattern this service does not recognize; always counts as active.
    #[serde(other)]
    Other,
}

/// A time-bound promotion.
///
/// The store only returns promotions whose `[start_date, end_date]` window
/// contains the query time; recurrence narrows that window further to
/// specific weekdays or days of the month.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    #[serde(rename = "_id")]
    pub id: PromotionId,
    pub title: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub display_message: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub minimum_spend: Option<Decimal>,
    pub gift_description: Option<String>,
    pub period_type: Option<PeriodType>,
    pub recurrence_pattern: Option<RecurrencePattern>,
    /// Weekly: weekday numbers with Sunday as 0. Monthly: days of month.
    #[serde(default, deserialize_with = "null_as_default")]
    pub recurrence_days: Vec<u32>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub banner_color: Option<String>,
    pub text_color: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub applicable_products: Vec<ProductId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub applicable_categories: Vec<String>,
}

impl Promotion {
    /// Whether this promotion applies at the given instant.
    ///
    /// One-time promotions (or those without a period type) apply anywhere
    /// inside their date window. Recurring promotions additionally match
    /// `recurrence_days` against the weekday (Sunday = 0) or day of month.
    /// An unrecognized recurrence pattern fails open to active.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if now < self.start_date || now > self.end_date {
            return false;
        }

        match self.period_type {
            None | Some(PeriodType::OneTime | PeriodType::Other) => true,
            Some(PeriodType::Recurring) => match self.recurrence_pattern {
                Some(RecurrencePattern::Daily | RecurrencePattern::Other) | None => true,
                Some(RecurrencePattern::Weekly) => self
                    .recurrence_days
                    .contains(&now.weekday().num_days_from_sunday()),
                Some(RecurrencePattern::Monthly) => self.recurrence_days.contains(&now.day()),
            },
        }
    }
}

// =============================================================================
// Corporate
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporateDiscount {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub display_message: Option<String>,
    pub description: Option<String>,
    pub min_quantity: Option<u32>,
    pub max_quantity: Option<u32>,
    pub discount_percentage: Option<Decimal>,
    pub highlight_color: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub applicable_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporatePricing {
    #[serde(rename = "_id")]
    pub id: String,
    pub product_name: String,
    pub starting_price: Option<Decimal>,
    pub price_note: Option<String>,
    pub description: Option<String>,
    pub image: Option<Value>,
    pub is_popular: Option<bool>,
}

// =============================================================================
// Newsletter
// =============================================================================

/// A newsletter document authored in the content studio.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Newsletter {
    #[serde(rename = "_id")]
    pub id: NewsletterId,
    pub subject: String,
    pub preheader_text: Option<String>,
    /// Portable-text blocks, rendered by [`crate::content::portable_text`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Vec<Value>,
    pub status: Option<NewsletterStatus>,
}

impl Newsletter {
    /// Whether this newsletter has already gone out.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        self.status.is_some_and(NewsletterStatus::is_sent)
    }
}

/// A newsletter recipient stored in the content store.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscriber {
    pub email: String,
    pub name: Option<String>,
}
