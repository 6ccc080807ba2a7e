//! Cart and cart line types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::{CartId, CustomerId, VariantId};
use crate::money::Money;

/// Lifecycle of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartStatus {
    #[default]
    Open,
    Converted,
    Abandoned,
}

impl CartStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartStatus::Open => "OPEN",
            CartStatus::Converted => "CONVERTED",
            CartStatus::Abandoned => "ABANDONED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "OPEN" => Some(CartStatus::Open),
            "CONVERTED" => Some(CartStatus::Converted),
            "ABANDONED" => Some(CartStatus::Abandoned),
            _ => None,
        }
    }
}

/// A shopping cart header. Its lines are stored separately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub id: CartId,
    pub customer_id: Option<CustomerId>,
    /// Browser session that owns an anonymous cart.
    pub session_id: Option<String>,
    pub status: CartStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// A new open cart for a session.
    pub fn for_session(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CartId::generate(),
            customer_id: None,
            session_id: Some(session_id.into()),
            status: CartStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One (cart, variant) entry. There is at most one line per key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    pub cart_id: CartId,
    pub variant_id: VariantId,
    /// Always at least 1 while the line exists.
    pub quantity: i64,
    /// Price per unit as last read from the variant.
    pub unit_price: Money,
}

impl CartLine {
    pub fn new(cart_id: CartId, variant_id: VariantId, quantity: i64, unit_price: Money) -> Self {
        Self {
            cart_id,
            variant_id,
            quantity,
            unit_price,
        }
    }

    /// `unit_price * quantity`, exact.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// Total units across lines, for the cart badge.
pub fn item_count(lines: &[CartLine]) -> i64 {
    lines.iter().map(|l| l.quantity).sum()
}
