//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts travel over the wire in the currency's standard unit (rupees,
//! dollars). The checkout widget wants the smallest unit (paise, cents), so
//! conversion lives here rather than at each call site.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when converting amounts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// The amount is negative.
    #[error("amount cannot be negative: {0}")]
    Negative(Decimal),
    /// The amount does not fit in the minor-unit integer range.
    #[error("amount out of range: {0}")]
    OutOfRange(Decimal),
}

/// ISO 4217 currency codes accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// Number of minor units per major unit (all supported currencies use 100).
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        100
    }

    /// Convert a standard-unit amount to the smallest currency unit.
    ///
    /// Fractions of a minor unit are rounded half-away-from-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative or overflows `i64`.
    pub fn to_minor(self, amount: Decimal) -> Result<i64, CurrencyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CurrencyError::Negative(amount));
        }
        amount
            .checked_mul(Decimal::from(self.minor_units()))
            .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|minor| minor.to_i64())
            .ok_or(CurrencyError::OutOfRange(amount))
    }

    /// Convert a smallest-unit amount back to the standard unit.
    #[must_use]
    pub fn from_minor(self, minor: i64) -> Decimal {
        Decimal::from(minor) / Decimal::from(self.minor_units())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INR" => Ok(Self::INR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display, e.g. `₹1,299.00`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let text = format!("{:.2}", rounded.abs());
        let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        format!(
            "{sign}{}{}.{frac}",
            self.currency_code.symbol(),
            group_thousands(whole)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minor_units() {
        assert_eq!(CurrencyCode::INR.to_minor(Decimal::from(250)).unwrap(), 25_000);
        assert_eq!(
            CurrencyCode::USD.to_minor(Decimal::new(1999, 2)).unwrap(),
            1999
        );
        // 10.005 rounds half away from zero
        assert_eq!(
            CurrencyCode::INR.to_minor(Decimal::new(10_005, 3)).unwrap(),
            1001
        );
        assert_eq!(
            CurrencyCode::INR.to_minor(Decimal::new(10_025, 3)).unwrap(),
            1003
        );
    }

    #[test]
    fn test_to_minor_rejects_negative() {
        assert!(matches!(
            CurrencyCode::INR.to_minor(Decimal::from(-1)),
            Err(CurrencyError::Negative(_))
        ));
    }

    #[test]
    fn test_from_minor() {
        assert_eq!(CurrencyCode::INR.from_minor(25_050), Decimal::new(25_050, 2));
    }

    #[test]
    fn test_price_display() {
        let price = Price::new(Decimal::new(129_900, 2), CurrencyCode::INR);
        assert_eq!(price.display(), "₹1,299.00");

        let price = Price::new(Decimal::from(1_234_567), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$1,234,567.00");

        let price = Price::new(Decimal::new(-505, 2), CurrencyCode::GBP);
        assert_eq!(price.display(), "-£5.05");
    }

    #[test]
    fn test_price_display_agrees_with_minor_units() {
        let amount = Decimal::new(10_025, 3);
        let price = Price::new(amount, CurrencyCode::INR);
        assert_eq!(price.display(), "₹10.03");
        assert_eq!(CurrencyCode::INR.to_minor(amount).unwrap(), 1003);

        let price = Price::new(Decimal::new(-10_025, 3), CurrencyCode::INR);
        assert_eq!(price.display(), "-₹10.03");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("inr".parse::<CurrencyCode>().unwrap(), CurrencyCode::INR);
        assert!("JPY".parse::<CurrencyCode>().is_err());
        assert_eq!(serde_json::to_string(&CurrencyCode::EUR).unwrap(), "\"EUR\"");
    }
}
