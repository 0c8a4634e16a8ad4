//! Content store client.
//!
//! Talks to the headless content store over its HTTP query and mutate
//! endpoints using `reqwest` 0.13. Reads execute stored GROQ projections;
//! writes are JSON patch mutations and require the write token. Every
//! request fetches fresh data; responses are never cached.

pub mod portable_text;
pub mod queries;
pub mod types;

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use amara_core::{NewsletterId, ProductId, VariantKey};

use crate::config::ContentStoreConfig;
use types::{
    Category, CorporateDiscount, CorporatePricing, CoreValue, HeroImage, Mockup, Newsletter,
    Product, ProductVariants, Promotion, ServiceOffering, SiteSettings, Subscriber,
};

/// Errors from content store operations.
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP request failed (network, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response or encode a query parameter
    #[error("Parse error: {0}")]
    Parse(String),

    /// The configured base URL does not form a valid endpoint
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// Document not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Mutation attempted without a write token configured
    #[error("Write token is not configured")]
    MissingToken,
}

/// Query responses arrive wrapped in a `result` envelope. Singleton
/// queries (`[0]`) put `null` there when nothing matches.
#[derive(Debug, serde::Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

// =============================================================================
// ContentClient
// =============================================================================

/// Client for the headless content store.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct ContentClient {
    inner: Arc<ContentClientInner>,
}

struct ContentClientInner {
    client: reqwest::Client,
    query_url: Url,
    mutate_url: Url,
    token: Option<SecretString>,
}

impl ContentClient {
    /// Create a new content store client.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::InvalidUrl` if the configured base URL and
    /// dataset do not combine into valid endpoints.
    pub fn new(config: &ContentStoreConfig) -> Result<Self, ContentError> {
        let base = config.api_url.trim_end_matches('/');

        let query_url = Url::parse(&format!(
            "{base}/v{}/data/query/{}",
            config.api_version, config.dataset
        ))
        .map_err(|e| ContentError::InvalidUrl(e.to_string()))?;

        let mutate_url = Url::parse(&format!(
            "{base}/v{}/data/mutate/{}",
            config.api_version, config.dataset
        ))
        .map_err(|e| ContentError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ContentClientInner {
                client: reqwest::Client::new(),
                query_url,
                mutate_url,
                token: config.token.clone(),
            }),
        })
    }

    /// Whether a write token is configured.
    #[must_use]
    pub fn has_write_token(&self) -> bool {
        self.inner.token.is_some()
    }

    /// Execute a GROQ query. Parameters are passed as `$name` URL query
    /// arguments with JSON-encoded values.
    async fn query_result<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, Value)],
    ) -> Result<Option<T>, ContentError> {
        let mut url = self.inner.query_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", groq);
            for (name, value) in params {
                let encoded = serde_json::to_string(value)
                    .map_err(|e| ContentError::Parse(e.to_string()))?;
                pairs.append_pair(&format!("${name}"), &encoded);
            }
        }

        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Content store query returned non-success status"
            );
            return Err(ContentError::Api {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        let envelope: QueryResponse<T> = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse content store response"
            );
            ContentError::Parse(e.to_string())
        })?;

        Ok(envelope.result)
    }

    /// Execute a list query, mapping an absent result to an empty list.
    async fn query_list<T: DeserializeOwned>(
        &self,
        groq: &str,
    ) -> Result<Vec<T>, ContentError> {
        Ok(self.query_result(groq, &[]).await?.unwrap_or_default())
    }

    /// Submit mutations. Requires the write token.
    async fn mutate(&self, mutations: Value) -> Result<(), ContentError> {
        let Some(token) = &self.inner.token else {
            return Err(ContentError::MissingToken);
        };

        let response = self
            .inner
            .client
            .post(self.inner.mutate_url.clone())
            .bearer_auth(token.expose_secret())
            .json(&json!({ "mutations": mutations }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %message.chars().take(500).collect::<String>(),
                "Content store mutation returned non-success status"
            );
            return Err(ContentError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        Ok(())
    }

    // =========================================================================
    // Catalog Reads
    // =========================================================================

    /// All products, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ContentError> {
        self.query_list(queries::PRODUCTS).await
    }

    /// A single product by its slug, or `None` if no product matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, ContentError> {
        self.query_result(queries::PRODUCT_BY_SLUG, &[("slug", json!(slug))])
            .await
    }

    /// Categories in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ContentError> {
        self.query_list(queries::CATEGORIES).await
    }

    #[instrument(skip(self))]
    pub async fn hero_images(&self) -> Result<Vec<HeroImage>, ContentError> {
        self.query_list(queries::HERO_IMAGES).await
    }

    #[instrument(skip(self))]
    pub async fn services(&self) -> Result<Vec<ServiceOffering>, ContentError> {
        self.query_list(queries::SERVICES).await
    }

    #[instrument(skip(self))]
    pub async fn mockups(&self) -> Result<Vec<Mockup>, ContentError> {
        self.query_list(queries::MOCKUPS).await
    }

    #[instrument(skip(self))]
    pub async fn core_values(&self) -> Result<Vec<CoreValue>, ContentError> {
        self.query_list(queries::CORE_VALUES).await
    }

    /// The site settings singleton, or `None` if it has not been authored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn site_settings(&self) -> Result<Option<SiteSettings>, ContentError> {
        self.query_result(queries::SITE_SETTINGS, &[]).await
    }

    /// Promotions inside their date window, soonest-ending first.
    /// Recurrence filtering is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn promotions(&self) -> Result<Vec<Promotion>, ContentError> {
        self.query_list(queries::PROMOTIONS).await
    }

    #[instrument(skip(self))]
    pub async fn corporate_discounts(&self) -> Result<Vec<CorporateDiscount>, ContentError> {
        self.query_list(queries::CORPORATE_DISCOUNTS).await
    }

    #[instrument(skip(self))]
    pub async fn corporate_pricing(&self) -> Result<Vec<CorporatePricing>, ContentError> {
        self.query_list(queries::CORPORATE_PRICING).await
    }

    // =========================================================================
    // Newsletter Reads
    // =========================================================================

    /// A newsletter document by ID, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(newsletter_id = %id))]
    pub async fn newsletter(&self, id: &NewsletterId) -> Result<Option<Newsletter>, ContentError> {
        self.query_result(queries::NEWSLETTER_BY_ID, &[("id", json!(id.as_str()))])
            .await
    }

    /// Subscribers who have not opted out.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn active_subscribers(&self) -> Result<Vec<Subscriber>, ContentError> {
        self.query_list(queries::ACTIVE_SUBSCRIBERS).await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Deduct sold units from one variant of a product.
    ///
    /// Reads the product's current variants, clamps the matching variant's
    /// stock at zero, and writes the whole array back. The read and write
    /// are separate requests, so concurrent commits can interleave; the
    /// last write wins.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product or its variants array is missing,
    /// `MissingToken` without a write token, or an API/HTTP error.
    #[instrument(skip(self), fields(product_id = %product_id, variant_key = %variant_key))]
    pub async fn decrement_variant_stock(
        &self,
        product_id: &ProductId,
        variant_key: &VariantKey,
        quantity: u32,
    ) -> Result<(), ContentError> {
        let doc: Option<ProductVariants> = self
            .query_result(
                queries::PRODUCT_VARIANTS,
                &[("productId", json!(product_id.as_str()))],
            )
            .await?;

        let variants = doc.and_then(|d| d.variants).ok_or_else(|| {
            ContentError::NotFound(format!("Product has no variants: {product_id}"))
        })?;

        let updated: Vec<_> = variants
            .into_iter()
            .map(|mut variant| {
                if &variant.key == variant_key {
                    variant.stock = Some(variant.stock_on_hand().saturating_sub(quantity));
                }
                variant
            })
            .collect();

        self.mutate(json!([{
            "patch": {
                "id": product_id.as_str(),
                "set": { "variants": updated }
            }
        }]))
        .await
    }

    /// Flip a newsletter to sent, stamping the send time and how many
    /// recipients actually received it.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` without a write token, or an API/HTTP error.
    #[instrument(skip(self, sent_at), fields(newsletter_id = %id))]
    pub async fn mark_newsletter_sent(
        &self,
        id: &NewsletterId,
        sent_at: DateTime<Utc>,
        recipient_count: u32,
    ) -> Result<(), ContentError> {
        self.mutate(json!([{
            "patch": {
                "id": id.as_str(),
                "set": {
                    "status": "sent",
                    "sentAt": sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                    "recipientCount": recipient_count
                }
            }
        }]))
        .await
    }

    /// Readiness probe: one cheap indexed lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or refuses the query.
    pub async fn ping(&self) -> Result<(), ContentError> {
        let _: Option<Value> = self.query_result(queries::PING, &[]).await?;
        Ok(())
    }
}
