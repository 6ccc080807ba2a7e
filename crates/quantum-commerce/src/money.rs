//! Money type for representing monetary values.
//!
//! Amounts are whole counts of the currency's minor unit. Decimal values only
//! appear at the edges (parsing, display, wire formats) and every rate
//! multiplication rounds half-to-even back onto the minor-unit grid.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommerceError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    JPY,
}

impl Currency {
    /// ISO code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::JPY => "JPY",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::CAD => "CA$",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Number of decimal digits in one major unit.
    pub fn minor_exponent(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code, ignoring case.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "CAD" => Some(Currency::CAD),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the currency's minor unit (cents for USD).
    pub amount_minor: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Convert a decimal amount in major units, rounding half-to-even.
    ///
    /// ```
    /// use quantum_commerce::money::{Currency, Money};
    /// use rust_decimal::Decimal;
    /// let price = Money::from_decimal(Decimal::new(29999, 2), Currency::USD).unwrap();
    /// assert_eq!(price.amount_minor, 29999);
    /// ```
    pub fn from_decimal(amount: Decimal, currency: Currency) -> Result<Self, CommerceError> {
        let scale = Decimal::from(10_i64.pow(currency.minor_exponent()));
        let minor = amount
            .checked_mul(scale)
            .ok_or(CommerceError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .ok_or(CommerceError::Overflow)?;
        Ok(Self::new(minor, currency))
    }

    /// The amount in major units, exact.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount_minor, self.currency.minor_exponent())
    }

    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Format with symbol (e.g., "$49.99").
    pub fn display(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = Decimal::new(
            self.amount_minor.saturating_abs(),
            self.currency.minor_exponent(),
        );
        format!("{}{}{}", sign, self.currency.symbol(), magnitude)
    }

    /// Format without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        self.to_decimal().to_string()
    }

    pub fn checked_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    pub fn checked_sub(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        self.amount_minor
            .checked_sub(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Multiply by a whole quantity. Exact.
    pub fn checked_mul(&self, quantity: i64) -> Result<Money, CommerceError> {
        self.amount_minor
            .checked_mul(quantity)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Multiply by a decimal rate (e.g. a tax rate), rounding half-to-even
    /// to the nearest minor unit.
    pub fn multiply_rate(&self, rate: Decimal) -> Result<Money, CommerceError> {
        let minor = Decimal::from(self.amount_minor)
            .checked_mul(rate)
            .ok_or(CommerceError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .ok_or(CommerceError::Overflow)?;
        Ok(Money::new(minor, self.currency))
    }

    /// Sum values that must all be in `currency`.
    pub fn try_sum<'a>(
        values: impl IntoIterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        values
            .into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency,
                got: other.currency,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(minor: i64) -> Money {
        Money::new(minor, Currency::USD)
    }

    #[test]
    fn test_from_decimal_rounds_half_even() {
        let m = Money::from_decimal(Decimal::new(10005, 3), Currency::USD).unwrap();
        assert_eq!(m.amount_minor, 1000); // 10.005 -> 10.00

        let m = Money::from_decimal(Decimal::new(10015, 3), Currency::USD).unwrap();
        assert_eq!(m.amount_minor, 1002); // 10.015 -> 10.02

        let m = Money::from_decimal(Decimal::new(100, 0), Currency::JPY).unwrap();
        assert_eq!(m.amount_minor, 100);
    }

    #[test]
    fn test_to_decimal_is_exact() {
        assert_eq!(usd(4999).to_decimal(), Decimal::new(4999, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(usd(4999).display(), "$49.99");
        assert_eq!(usd(1500).display(), "$15.00");
        assert_eq!(usd(-250).display(), "-$2.50");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
        assert_eq!(usd(5).display_amount(), "0.05");
    }

    #[test]
    fn test_checked_add_and_sub() {
        assert_eq!(usd(1000).checked_add(&usd(500)).unwrap(), usd(1500));
        assert_eq!(usd(1000).checked_sub(&usd(300)).unwrap(), usd(700));
    }

    #[test]
    fn test_currency_mismatch_is_an_error() {
        let err = usd(1000)
            .checked_add(&Money::new(1000, Currency::EUR))
            .unwrap_err();
        assert!(matches!(
            err,
            CommerceError::CurrencyMismatch {
                expected: Currency::USD,
                got: Currency::EUR
            }
        ));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(matches!(
            usd(i64::MAX).checked_add(&usd(1)),
            Err(CommerceError::Overflow)
        ));
        assert!(matches!(
            usd(i64::MAX).checked_mul(2),
            Err(CommerceError::Overflow)
        ));
    }

    #[test]
    fn test_multiply_rate() {
        // 67997 * 0.08 = 5439.76
        assert_eq!(usd(67997).multiply_rate(Decimal::new(8, 2)).unwrap(), usd(5440));
        // 12.5 and 13.5 both land on the even neighbour
        assert_eq!(usd(125).multiply_rate(Decimal::new(1, 1)).unwrap(), usd(12));
        assert_eq!(usd(135).multiply_rate(Decimal::new(1, 1)).unwrap(), usd(14));
    }

    #[test]
    fn test_try_sum() {
        let values = [usd(100), usd(250), usd(50)];
        assert_eq!(Money::try_sum(&values, Currency::USD).unwrap(), usd(400));
        assert_eq!(Money::try_sum(&[], Currency::USD).unwrap(), usd(0));
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code(" EUR "), Some(Currency::EUR));
        assert_eq!(Currency::from_code("XXX"), None);
    }
}
