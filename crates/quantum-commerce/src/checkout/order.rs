//! Order types and the order status model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::{CartLine, PriceBreakdown, TaxPolicy};
use crate::catalog::ProductVariant;
use crate::error::CommerceError;
use crate::ids::{CartId, CustomerId, LineItemId, OrderId, ProductId, VariantId};
use crate::money::{Currency, Money};

/// Order status as managed from the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, not yet picked up.
    #[default]
    Pending,
    Processing,
    /// Paused, e.g. waiting on the customer.
    #[serde(alias = "ON-HOLD")]
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
    /// Hidden from `quantum orders list` unless `--all` or `--status` is given.
    Archived,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::OnHold,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
        OrderStatus::Failed,
        OrderStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::OnHold => "ON_HOLD",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Refunded => "REFUNDED",
            OrderStatus::Failed => "FAILED",
            OrderStatus::Archived => "ARCHIVED",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::OnHold => "On hold",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
            OrderStatus::Failed => "Failed",
            OrderStatus::Archived => "Archived",
        }
    }

    /// Parse a status name. Accepts `ON-HOLD`, `on_hold` and similar spellings.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_uppercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|s| s.as_str() == normalized)
    }

    /// Counted as "pending" on the order dashboard.
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Statuses reachable under the guarded transition table.
    pub fn guarded_successors(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Processing, OnHold, Cancelled, Failed],
            Processing => &[OnHold, Completed, Cancelled, Failed],
            OnHold => &[Processing, Cancelled],
            Completed => &[Refunded, Archived],
            Cancelled => &[Archived],
            Refunded => &[Archived],
            Failed => &[Pending, Archived],
            Archived => &[],
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which status changes the back office may make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status may be set from any status.
    #[default]
    Unrestricted,
    /// Only the moves in [`OrderStatus::guarded_successors`].
    Guarded,
}

impl TransitionPolicy {
    /// Setting the current status again is always allowed.
    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            TransitionPolicy::Unrestricted => true,
            TransitionPolicy::Guarded => from == to || from.guarded_successors().contains(&to),
        }
    }

    pub fn check(&self, from: OrderStatus, to: OrderStatus) -> Result<(), CommerceError> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(CommerceError::InvalidStatusTransition { from, to })
        }
    }
}

/// A placed order. Monetary fields are frozen at creation; only `status`
/// and `updated_at` change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    /// The cart the order was placed from. Informational only.
    pub cart_id: Option<CartId>,
    pub status: OrderStatus,
    pub currency: Currency,
    pub subtotal: Money,
    /// Always zero; discounts are not supported.
    pub total_discounts: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// A new pending order snapshotting `breakdown`.
    pub fn new(
        customer_id: CustomerId,
        cart_id: Option<CartId>,
        breakdown: &PriceBreakdown,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let currency = breakdown.total.currency;
        Self {
            id: OrderId::generate(),
            customer_id,
            cart_id,
            status: OrderStatus::Pending,
            currency,
            subtotal: breakdown.subtotal,
            total_discounts: Money::zero(currency),
            shipping: breakdown.shipping,
            tax: breakdown.tax,
            total: breakdown.total,
            notes: notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            created_at: now,
            updated_at: now,
        }
    }

    /// The frozen totals as a breakdown.
    pub fn breakdown(&self) -> PriceBreakdown {
        PriceBreakdown {
            subtotal: self.subtotal,
            shipping: self.shipping,
            tax: self.tax,
            total: self.total,
        }
    }
}

/// A cart line frozen onto an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: LineItemId,
    pub order_id: OrderId,
    pub variant_id: VariantId,
    pub product_id: Option<ProductId>,
    pub title: Option<String>,
    pub sku: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    pub unit_tax_amount: Money,
    pub total_discount: Money,
    pub total_price: Money,
}

impl LineItem {
    /// Freeze `line` onto `order_id`. Title, SKU and product come from the
    /// variant when it is still in the catalog.
    pub fn from_cart_line(
        order_id: &OrderId,
        line: &CartLine,
        variant: Option<&ProductVariant>,
        tax_policy: &dyn TaxPolicy,
    ) -> Result<Self, CommerceError> {
        let currency = line.unit_price.currency;
        let taxable = variant.map(|v| v.taxable).unwrap_or(true);
        let unit_tax_amount = if taxable {
            tax_policy.tax_on(&line.unit_price)?
        } else {
            Money::zero(currency)
        };

        Ok(Self {
            id: LineItemId::generate(),
            order_id: order_id.clone(),
            variant_id: line.variant_id.clone(),
            product_id: variant.map(|v| v.product_id.clone()),
            title: variant.and_then(|v| v.title.clone()),
            sku: variant.and_then(|v| v.sku.clone()),
            quantity: line.quantity,
            unit_price: line.unit_price,
            unit_tax_amount,
            total_discount: Money::zero(currency),
            total_price: line.line_total()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::FlatRateTax;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OnHold).unwrap(),
            "\"ON_HOLD\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"ON-HOLD\"").unwrap();
        assert_eq!(parsed, OrderStatus::OnHold);
        assert_eq!(OrderStatus::parse("on-hold"), Some(OrderStatus::OnHold));
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn test_unrestricted_allows_everything() {
        let policy = TransitionPolicy::Unrestricted;
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert!(policy.allows(from, to));
            }
        }
    }

    #[test]
    fn test_guarded_table() {
        let policy = TransitionPolicy::Guarded;
        assert!(policy.allows(OrderStatus::Pending, OrderStatus::Processing));
        assert!(policy.allows(OrderStatus::Completed, OrderStatus::Refunded));
        assert!(policy.allows(OrderStatus::Failed, OrderStatus::Pending));
        assert!(!policy.allows(OrderStatus::Pending, OrderStatus::Refunded));
        assert!(!policy.allows(OrderStatus::Archived, OrderStatus::Pending));
        assert!(policy.allows(OrderStatus::Archived, OrderStatus::Archived));

        let err = policy
            .check(OrderStatus::Cancelled, OrderStatus::Completed)
            .unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InvalidStatusTransition {
                from: OrderStatus::Cancelled,
                to: OrderStatus::Completed
            }
        ));
    }

    #[test]
    fn test_order_snapshots_breakdown() {
        let usd = |m| Money::new(m, Currency::USD);
        let breakdown = PriceBreakdown {
            subtotal: usd(67997),
            shipping: usd(1500),
            tax: usd(5440),
            total: usd(74937),
        };
        let order = Order::new(
            CustomerId::new("cust-1"),
            Some(CartId::new("c1")),
            &breakdown,
            Some("  ".into()),
            Utc::now(),
        );
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.breakdown(), breakdown);
        assert!(order.total_discounts.is_zero());
        assert_eq!(order.notes, None);
    }

    #[test]
    fn test_line_item_without_variant_is_taxed() {
        let line = CartLine::new(
            CartId::new("c1"),
            VariantId::new("gone"),
            2,
            Money::new(18999, Currency::USD),
        );
        let item =
            LineItem::from_cart_line(&OrderId::new("o1"), &line, None, &FlatRateTax::default())
                .unwrap();
        assert_eq!(item.total_price.amount_minor, 37998);
        assert_eq!(item.unit_tax_amount.amount_minor, 1520);
        assert_eq!(item.title, None);
    }
}
