//! Redis-backed subscriber store.
//!
//! Membership lives in one set keyed by email address, with a small
//! profile hash per subscriber. The connection manager multiplexes one
//! connection and reconnects on failure, so clones are cheap.

use std::collections::HashMap;

use amara_core::Email;
use chrono::Utc;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Set key holding every subscribed email address.
const SUBSCRIBERS_SET: &str = "subscribers";

/// Errors that can occur when talking to the subscriber store.
#[derive(Debug, Error)]
pub enum MailingListError {
    /// Redis command or connection failed.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Subscriber store backed by Redis.
#[derive(Clone)]
pub struct MailingList {
    connection: ConnectionManager,
}

impl MailingList {
    /// Connect to the subscriber store.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the initial connection
    /// cannot be established.
    pub async fn connect(redis_url: &SecretString) -> Result<Self, MailingListError> {
        let config = ConnectionManagerConfig::new().set_number_of_retries(1);

        let client = Client::open(redis_url.expose_secret())?;
        let connection = client.get_connection_manager_with_config(config).await?;

        Ok(Self { connection })
    }

    /// Hash key holding one subscriber's profile.
    fn profile_key(email: &str) -> String {
        format!("subscriber:{email}")
    }

    /// Record a subscription.
    ///
    /// Re-subscribing an existing address refreshes its profile.
    ///
    /// # Errors
    ///
    /// Returns error if a Redis command fails.
    pub async fn add_subscriber(
        &self,
        email: &Email,
        name: Option<&str>,
    ) -> Result<(), MailingListError> {
        let mut connection = self.connection.clone();

        let _: i64 = connection.sadd(SUBSCRIBERS_SET, email.as_str()).await?;

        let profile = [
            ("name", name.map_or_else(String::new, |n| n.trim().to_string())),
            ("createdAt", Utc::now().timestamp_millis().to_string()),
        ];
        let _: () = connection
            .hset_multiple(Self::profile_key(email.as_str()), &profile)
            .await?;

        Ok(())
    }

    /// Every subscribed email address, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns error if a Redis command fails.
    pub async fn subscriber_emails(&self) -> Result<Vec<String>, MailingListError> {
        let mut connection = self.connection.clone();
        let emails: Vec<String> = connection.smembers(SUBSCRIBERS_SET).await?;
        Ok(emails)
    }

    /// Display name stored for an address, if any.
    ///
    /// # Errors
    ///
    /// Returns error if a Redis command fails.
    pub async fn subscriber_name(&self, email: &str) -> Result<Option<String>, MailingListError> {
        let mut connection = self.connection.clone();
        let profile: HashMap<String, String> =
            connection.hgetall(Self::profile_key(email)).await?;
        Ok(profile.get("name").cloned())
    }
}
