//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CONTENT_PROJECT_ID` - Content store project ID
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CONTENT_DATASET` - Content store dataset (default: production)
//! - `CONTENT_API_VERSION` - Content store API version (default: 2024-01-01)
//! - `CONTENT_API_TOKEN` - Write token for stock and newsletter patches
//! - `CONTENT_API_URL` - Override for the derived content store base URL
//! - `EMAILJS_SERVICE_ID` - EmailJS service ID
//! - `EMAILJS_PUBLIC_KEY` - EmailJS public key (sent in request bodies)
//! - `EMAILJS_TEMPLATE_ID` - EmailJS template for order notifications
//! - `EMAILJS_CAMPAIGN_TEMPLATE_ID` - EmailJS template for campaign sends
//! - `EMAILJS_API_URL` - Override for the EmailJS endpoint
//! - `ORDER_RECIPIENT_EMAIL` - Inbox that receives order notifications
//! - `RESEND_API_KEY` - Resend API key for newsletter delivery
//! - `RESEND_FROM_EMAIL` - Newsletter sender address
//! - `RESEND_API_URL` - Override for the Resend endpoint
//! - `REDIS_URL` - Mailing-list store connection URL
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//!
//! Collaborator credentials are optional on purpose: the storefront boots
//! with whatever is configured and the affected endpoints report a
//! descriptive 500 when their backing service is absent.

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Secrets below this Shannon entropy (bits per character) are refused
/// at boot.
const MIN_SECRET_ENTROPY: f64 = 3.3;

/// Fragments that betray a copy-pasted template value, checked against
/// the lowercased secret.
const PLACEHOLDER_FRAGMENTS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnvVar(String),
    #[error("environment variable {0} is invalid: {1}")]
    InvalidEnvVar(String, String),
    #[error("refusing insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront (session cookies are marked
    /// `Secure` when this is an https origin)
    pub base_url: String,
    /// Content store connection details
    pub content: ContentStoreConfig,
    /// EmailJS dispatch configuration, if configured
    pub emailjs: Option<EmailJsConfig>,
    /// Resend bulk delivery configuration, if configured
    pub resend: Option<ResendConfig>,
    /// Mailing-list store URL (may carry credentials)
    pub redis_url: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Content store connection details.
///
/// Implements `Debug` manually to redact the write token.
#[derive(Clone)]
pub struct ContentStoreConfig {
    /// Content store project ID
    pub project_id: String,
    /// Dataset name (e.g., production)
    pub dataset: String,
    /// API version date (e.g., 2024-01-01)
    pub api_version: String,
    /// Write token. Read queries work without it on public datasets;
    /// mutations fail without it.
    pub token: Option<SecretString>,
    /// API base URL, derived from the project ID unless overridden
    pub api_url: String,
}

impl fmt::Debug for ContentStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStoreConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// EmailJS dispatch configuration.
///
/// The public key is not a secret; EmailJS expects it in request bodies.
#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    /// EmailJS service ID
    pub service_id: String,
    /// EmailJS public key
    pub public_key: String,
    /// Template for individual order notifications
    pub order_template_id: Option<String>,
    /// Template for mailing-list campaign sends
    pub campaign_template_id: Option<String>,
    /// Inbox that receives order notifications
    pub order_recipient: String,
    /// EmailJS API base URL
    pub api_url: String,
}

/// Resend bulk delivery configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ResendConfig {
    /// Resend API key
    pub api_key: SecretString,
    /// Sender address, e.g. `Amara Threads <hello@amarathreads.com>`
    pub from_email: String,
    /// Resend API base URL
    pub api_url: String,
}

impl fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResendConfig")
            .field("api_key", &"[REDACTED]")
            .field("from_email", &self.from_email)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first when one exists; real environment
    /// variables win over it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = require_env("STOREFRONT_BASE_URL")?;

        let content = ContentStoreConfig::from_env()?;
        let emailjs = EmailJsConfig::from_env();
        let resend = ResendConfig::from_env()?;
        let redis_url = optional_env("REDIS_URL").map(SecretString::from);
        let sentry_dsn = optional_env("SENTRY_DSN");
        let sentry_environment = optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            content,
            emailjs,
            resend,
            redis_url,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ContentStoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let project_id = require_env("CONTENT_PROJECT_ID")?;
        let api_url = optional_env("CONTENT_API_URL")
            .unwrap_or_else(|| format!("https://{project_id}.api.sanity.io"));

        Ok(Self {
            project_id,
            dataset: env_or_default("CONTENT_DATASET", "production"),
            api_version: env_or_default("CONTENT_API_VERSION", "2024-01-01"),
            token: optional_secret("CONTENT_API_TOKEN")?,
            api_url,
        })
    }
}

impl EmailJsConfig {
    /// Returns `None` unless both the service ID and public key are set.
    /// Template IDs are checked per endpoint so a partially configured
    /// deployment can still take orders without campaign support.
    fn from_env() -> Option<Self> {
        let service_id = optional_env("EMAILJS_SERVICE_ID")?;
        let public_key = optional_env("EMAILJS_PUBLIC_KEY")?;

        Some(Self {
            service_id,
            public_key,
            order_template_id: optional_env("EMAILJS_TEMPLATE_ID"),
            campaign_template_id: optional_env("EMAILJS_CAMPAIGN_TEMPLATE_ID"),
            order_recipient: env_or_default("ORDER_RECIPIENT_EMAIL", "orders@amarathreads.com"),
            api_url: env_or_default("EMAILJS_API_URL", "https://api.emailjs.com"),
        })
    }
}

impl ResendConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(api_key) = optional_secret("RESEND_API_KEY")? else {
            return Ok(None);
        };

        Ok(Some(Self {
            api_key,
            from_email: env_or_default(
                "RESEND_FROM_EMAIL",
                "Amara Threads <onboarding@resend.dev>",
            ),
            api_url: env_or_default("RESEND_API_URL", "https://api.resend.com"),
        }))
    }
}

// =============================================================================
// Environment helpers
// =============================================================================

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Empty values count as unset so a blank line in `.env` does not
/// masquerade as configuration.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn env_or_default(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Load an optional secret, refusing placeholder or low-entropy values.
fn optional_secret(key: &str) -> Result<Option<SecretString>, ConfigError> {
    optional_env(key)
        .map(|value| {
            validate_secret(key, &value)?;
            Ok(SecretString::from(value))
        })
        .transpose()
}

// =============================================================================
// Secret validation
// =============================================================================

/// Shannon entropy of the value in bits per character.
fn shannon_entropy(value: &str) -> f64 {
    if value.is_empty() {
        return 0.0;
    }

    let mut frequency: HashMap<char, f64> = HashMap::new();
    for c in value.chars() {
        *frequency.entry(c).or_insert(0.0) += 1.0;
    }

    #[allow(clippy::cast_precision_loss)] // secret lengths are far below f64 precision
    let length = value.chars().count() as f64;
    frequency
        .values()
        .map(|count| {
            let p = count / length;
            -p * p.log2()
        })
        .sum()
}

/// A template value left in `.env` shows up as either a known placeholder
/// fragment or a suspiciously uniform string; both are boot errors.
fn validate_secret(var_name: &str, value: &str) -> Result<(), ConfigError> {
    let lowered = value.to_lowercase();
    if let Some(fragment) = PLACEHOLDER_FRAGMENTS
        .iter()
        .find(|fragment| lowered.contains(*fragment))
    {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("looks like a placeholder (contains '{fragment}')"),
        ));
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_SECRET_ENTROPY {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_SECRET_ENTROPY:.1}); use the randomly generated key"
            ),
        ));
    }

    Ok(())
}
