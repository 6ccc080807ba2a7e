//! Cart pricing.
//!
//! Subtotal is exact integer arithmetic over the lines. Shipping and tax are
//! pluggable policies; tax is the only step that rounds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::error::CommerceError;
use crate::money::{Currency, Money};

/// Computed totals for a set of cart lines.
///
/// `total == subtotal + shipping + tax` holds exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

/// Decides the shipping charge for a cart.
pub trait ShippingPolicy: Send + Sync {
    /// Currency the policy charges in; all lines must match it.
    fn currency(&self) -> Currency;

    fn shipping_for(&self, lines: &[CartLine]) -> Result<Money, CommerceError>;
}

/// Decides the tax rate applied to the subtotal.
pub trait TaxPolicy: Send + Sync {
    fn rate(&self) -> Decimal;

    /// Tax owed on `amount`, rounded half-to-even to the minor unit.
    fn tax_on(&self, amount: &Money) -> Result<Money, CommerceError> {
        amount.multiply_rate(self.rate())
    }
}

/// The same shipping charge for every order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRateShipping {
    pub rate: Money,
    /// Charge the flat rate even when the cart has no lines.
    pub charge_empty_cart: bool,
}

impl FlatRateShipping {
    pub fn new(rate: Money) -> Self {
        Self {
            rate,
            charge_empty_cart: true,
        }
    }
}

impl Default for FlatRateShipping {
    fn default() -> Self {
        Self::new(Money::new(DEFAULT_SHIPPING_MINOR, Currency::USD))
    }
}

impl ShippingPolicy for FlatRateShipping {
    fn currency(&self) -> Currency {
        self.rate.currency
    }

    fn shipping_for(&self, lines: &[CartLine]) -> Result<Money, CommerceError> {
        if lines.is_empty() && !self.charge_empty_cart {
            return Ok(Money::zero(self.rate.currency));
        }
        Ok(self.rate)
    }
}

/// One tax rate for the whole subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRateTax {
    pub rate: Decimal,
}

impl Default for FlatRateTax {
    fn default() -> Self {
        Self {
            rate: default_tax_rate(),
        }
    }
}

impl TaxPolicy for FlatRateTax {
    fn rate(&self) -> Decimal {
        self.rate
    }
}

/// Compute subtotal, shipping, tax and total for `lines`.
pub fn compute_breakdown(
    lines: &[CartLine],
    shipping_policy: &dyn ShippingPolicy,
    tax_policy: &dyn TaxPolicy,
) -> Result<PriceBreakdown, CommerceError> {
    let currency = shipping_policy.currency();

    let mut subtotal = Money::zero(currency);
    for line in lines {
        if line.unit_price.currency != currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency,
                got: line.unit_price.currency,
            });
        }
        subtotal = subtotal.checked_add(&line.line_total()?)?;
    }

    let shipping = shipping_policy.shipping_for(lines)?;
    let tax = tax_policy.tax_on(&subtotal)?;
    let total = subtotal.checked_add(&shipping)?.checked_add(&tax)?;

    Ok(PriceBreakdown {
        subtotal,
        shipping,
        tax,
        total,
    })
}

const DEFAULT_SHIPPING_MINOR: i64 = 1500;

fn default_currency() -> String {
    Currency::USD.code().to_string()
}

fn default_shipping_flat_rate() -> Decimal {
    Decimal::new(DEFAULT_SHIPPING_MINOR, 2)
}

fn default_tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

fn default_true() -> bool {
    true
}

/// Pricing settings as read from the `[pricing]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Store currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Flat shipping charge in major units.
    #[serde(
        default = "default_shipping_flat_rate",
        with = "rust_decimal::serde::float"
    )]
    pub shipping_flat_rate: Decimal,

    /// Tax rate as a fraction (0.08 = 8%).
    #[serde(default = "default_tax_rate", with = "rust_decimal::serde::float")]
    pub tax_rate: Decimal,

    #[serde(default = "default_true")]
    pub charge_shipping_on_empty_cart: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            shipping_flat_rate: default_shipping_flat_rate(),
            tax_rate: default_tax_rate(),
            charge_shipping_on_empty_cart: true,
        }
    }
}

impl PricingConfig {
    pub fn currency(&self) -> Result<Currency, CommerceError> {
        Currency::from_code(&self.currency).ok_or_else(|| {
            CommerceError::validation(format!("unsupported currency: {}", self.currency))
        })
    }

    pub fn shipping_policy(&self) -> Result<FlatRateShipping, CommerceError> {
        let rate = Money::from_decimal(self.shipping_flat_rate, self.currency()?)?;
        if rate.is_negative() {
            return Err(CommerceError::NegativePrice(rate));
        }
        Ok(FlatRateShipping {
            rate,
            charge_empty_cart: self.charge_shipping_on_empty_cart,
        })
    }

    pub fn tax_policy(&self) -> Result<FlatRateTax, CommerceError> {
        if self.tax_rate.is_sign_negative() {
            return Err(CommerceError::validation("tax rate must not be negative"));
        }
        Ok(FlatRateTax {
            rate: self.tax_rate,
        })
    }

    /// Check every setting without building anything.
    pub fn validate(&self) -> Result<(), CommerceError> {
        self.shipping_policy()?;
        self.tax_policy()?;
        Ok(())
    }
}
