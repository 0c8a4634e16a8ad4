//! Type-safe monetary amounts using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount with currency information.
///
/// Catalog prices arrive from the content store as plain JSON numbers in the
/// shop currency; `Money` pairs the decimal amount with its ISO code so
/// formatting and totals stay currency-aware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., shillings, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new monetary amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// An amount in the shop's default currency.
    #[must_use]
    pub const fn shillings(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::KES)
    }
}

impl fmt::Display for Money {
    /// Formats as `KSh 2,500` with thousands grouping, keeping any
    /// fractional digits the amount carries.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.amount.normalize().to_string();
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, frac)) => (i, Some(frac)),
            None => (text.as_str(), None),
        };
        let (sign, digits) = int_part
            .strip_prefix('-')
            .map_or(("", int_part), |rest| ("-", rest));

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{sign}{} {grouped}", self.currency_code.symbol())?;
        if let Some(frac) = frac_part {
            write!(f, ".{frac}")?;
        }
        Ok(())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Kenyan shilling, the shop's default.
    #[default]
    KES,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// The display symbol customers see (`KSh` for shillings).
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::KES => "KSh",
            Self::USD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::KES => "KES",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}
