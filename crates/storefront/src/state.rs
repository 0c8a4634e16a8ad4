//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::content::{ContentClient, ContentError};
use crate::services::{EmailJsClient, MailingList, MailingListError, ResendClient, ResendError};

/// Error assembling application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("content client error: {0}")]
    Content(#[from] ContentError),
    #[error("bulk mail client error: {0}")]
    BulkMail(#[from] ResendError),
    #[error("mailing list error: {0}")]
    MailingList(#[from] MailingListError),
}

/// Application state shared across all handlers.
///
/// Cloning is an `Arc` bump; the configuration and every collaborator
/// client live behind one shared allocation.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    content: ContentClient,
    emailjs: Option<EmailJsClient>,
    resend: Option<ResendClient>,
    mailing_list: Option<MailingList>,
}

impl AppState {
    /// Assemble shared state from configuration.
    ///
    /// The content client is always built. The mail clients and the
    /// mailing-list store are only built when their configuration is
    /// present; handlers that need an absent collaborator answer with a
    /// configuration error instead.
    ///
    /// # Errors
    ///
    /// Returns an error if a client fails to build, or if the mailing-list
    /// store is configured but unreachable.
    pub async fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let content = ContentClient::new(&config.content)?;
        let emailjs = config.emailjs.as_ref().map(EmailJsClient::new);
        let resend = config.resend.as_ref().map(ResendClient::new).transpose()?;

        let mailing_list = match config.redis_url.as_ref() {
            Some(url) => Some(MailingList::connect(url).await?),
            None => None,
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                content,
                emailjs,
                resend,
                mailing_list,
            }),
        })
    }

    /// The loaded storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The content store client.
    #[must_use]
    pub fn content(&self) -> &ContentClient {
        &self.inner.content
    }

    /// The transactional mail client, when configured.
    #[must_use]
    pub fn emailjs(&self) -> Option<&EmailJsClient> {
        self.inner.emailjs.as_ref()
    }

    /// The bulk mail client, when configured.
    #[must_use]
    pub fn resend(&self) -> Option<&ResendClient> {
        self.inner.resend.as_ref()
    }

    /// The subscriber store, when configured.
    #[must_use]
    pub fn mailing_list(&self) -> Option<&MailingList> {
        self.inner.mailing_list.as_ref()
    }
}
