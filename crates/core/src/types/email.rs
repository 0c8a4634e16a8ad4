//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input exceeds the RFC 5321 length cap.
    #[error("email exceeds {} characters", Email::MAX_LENGTH)]
    TooLong,
    /// The input is not of the form `local@domain`.
    #[error("email must look like local@domain")]
    Malformed,
}

/// A structurally valid email address.
///
/// Validation is deliberately shallow: non-empty local part, an `@`, a
/// non-empty domain, and the RFC 5321 length cap. The mail providers are
/// the real authority on deliverability; this type only keeps obviously
/// broken input out of the subscriber set and order notifications.
///
/// ```
/// use amara_core::Email;
///
/// assert!(Email::parse("wanjiru@amarathreads.com").is_ok());
/// assert!(Email::parse("order.updates+june@posta.co.ke").is_ok());
///
/// assert!(Email::parse("not-an-address").is_err());
/// assert!(Email::parse("@amarathreads.com").is_err());
/// assert!(Email::parse("wanjiru@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email`, accepting the input exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Empty`] for an empty string,
    /// [`EmailError::TooLong`] past the length cap, and
    /// [`EmailError::Malformed`] when either side of the `@` is missing.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong);
        }

        match s.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(s.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// Parse an `Email` after trimming whitespace and lowercasing.
    ///
    /// Mailing-list addresses are stored in normalized form so the same
    /// subscriber typed with different casing is one set member.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Email::parse`], applied to the
    /// normalized input.
    pub fn parse_normalized(s: &str) -> Result<Self, EmailError> {
        Self::parse(&s.trim().to_lowercase())
    }

    /// The address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
