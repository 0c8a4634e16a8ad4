//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Newsletter lifecycle status.
///
/// Maps to the content store's `status` field on newsletter documents.
/// A newsletter is dispatched at most once; the send endpoint flips the
/// document to `Sent` after the fan-out completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NewsletterStatus {
    #[default]
    Draft,
    Sent,
}

impl NewsletterStatus {
    /// Whether this newsletter has already gone out.
    #[must_use]
    pub const fn is_sent(self) -> bool {
        matches!(self, Self::Sent)
    }
}

impl std::fmt::Display for NewsletterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Sent => write!(f, "sent"),
        }
    }
}

impl std::str::FromStr for NewsletterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            _ => Err(format!("invalid newsletter status: {s}")),
        }
    }
}
