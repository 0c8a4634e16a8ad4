//! Clients for the external services behind the storefront.
//!
//! # Services
//!
//! - `emailjs` - Transactional sends through stored EmailJS templates
//! - `mailing_list` - Redis-backed subscriber set and profiles
//! - `resend` - Bulk newsletter delivery through Resend
//!
//! Each client is cheap to clone and safe to share across handlers.

pub mod emailjs;
pub mod mailing_list;
pub mod resend;

pub use emailjs::{EmailJsClient, EmailJsError};
pub use mailing_list::{MailingList, MailingListError};
pub use resend::{ResendClient, ResendError};

/// Outcome of a fan-out email dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchTally {
    /// Deliveries accepted by the provider.
    pub sent: u32,
    /// Deliveries rejected or errored.
    pub failed: u32,
}
