//! Fixed-point price representation.
//!
//! Monetary amounts are stored as integer minor units (cents) so that
//! repeated cart arithmetic never accumulates floating-point drift. Amounts
//! are converted to [`rust_decimal::Decimal`] only at the display boundary.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A non-negative price in integer minor units with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the smallest currency unit (e.g., cents for USD).
    cents: i64,
    /// ISO 4217 currency code.
    currency: CurrencyCode,
}

impl Price {
    /// Create a price from an amount in minor units.
    #[must_use]
    pub const fn from_cents(cents: i64, currency: CurrencyCode) -> Self {
        Self { cents, currency }
    }

    /// The zero price in the given currency.
    #[must_use]
    pub const fn zero(currency: CurrencyCode) -> Self {
        Self { cents: 0, currency }
    }

    /// Convert a decimal amount in major units (e.g., `9.99` dollars).
    ///
    /// The amount is rounded to two decimal places before conversion.
    /// Returns `None` for negative amounts or amounts too large for `i64`
    /// minor units.
    #[must_use]
    pub fn from_decimal(amount: Decimal, currency: CurrencyCode) -> Option<Self> {
        let cents = amount
            .round_dp(2)
            .checked_mul(Decimal::ONE_HUNDRED)?
            .to_i64()?;
        (cents >= 0).then_some(Self { cents, currency })
    }

    /// Amount in minor units.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Currency of this price.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Whether this is a zero amount.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Amount in major units as a decimal (e.g., `19.98`).
    #[must_use]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.cents, 2)
    }

    /// Multiply by a quantity, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul(&self, quantity: u32) -> Option<Self> {
        let cents = self.cents.checked_mul(i64::from(quantity))?;
        Some(Self {
            cents,
            currency: self.currency,
        })
    }

    /// Add another price, returning `None` on overflow or currency mismatch.
    #[must_use]
    pub fn checked_add(&self, other: Self) -> Option<Self> {
        if self.currency != other.currency {
            return None;
        }
        let cents = self.cents.checked_add(other.cents)?;
        Some(Self {
            cents,
            currency: self.currency,
        })
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.currency.symbol(), self.to_decimal())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}
