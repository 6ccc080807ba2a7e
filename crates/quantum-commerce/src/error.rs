//! Commerce error types.

use thiserror::Error;

use crate::checkout::{OrderStatus, PartialOrder};
use crate::ids::{CartId, OrderId, ProductId, VariantId};
use crate::money::{Currency, Money};
use crate::store::StoreError;

/// Coarse classification of a [`CommerceError`], for callers that only need
/// to decide how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input or a forbidden transition. Nothing was written.
    Validation,
    /// The addressed record does not exist.
    NotFound,
    /// The store failed or was unreachable.
    Persistence,
    /// Order placement stopped after committing some of its writes.
    PartialOrder,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Persistence => "persistence",
            ErrorKind::PartialOrder => "partial_order",
        }
    }
}

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    #[error("Price must not be negative: {0}")]
    NegativePrice(Money),

    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: Currency, got: Currency },

    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    #[error("Order status cannot change from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("Cart {0} is empty")]
    EmptyCart(CartId),

    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    #[error("Cart {cart_id} has no line for variant {variant_id}")]
    CartLineNotFound { cart_id: CartId, variant_id: VariantId },

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Variant not found: {0}")]
    VariantNotFound(VariantId),

    #[error(transparent)]
    Persistence(#[from] StoreError),

    #[error("{0}")]
    PartialOrder(Box<PartialOrder>),
}

impl CommerceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::Validation(_)
            | CommerceError::InvalidQuantity(_)
            | CommerceError::QuantityExceedsLimit(..)
            | CommerceError::NegativePrice(_)
            | CommerceError::CurrencyMismatch { .. }
            | CommerceError::Overflow
            | CommerceError::InvalidStatusTransition { .. }
            | CommerceError::EmptyCart(_)
            | CommerceError::InvalidCheckoutTransition { .. }
            | CommerceError::CheckoutIncomplete(_) => ErrorKind::Validation,
            CommerceError::CartLineNotFound { .. }
            | CommerceError::OrderNotFound(_)
            | CommerceError::ProductNotFound(_)
            | CommerceError::VariantNotFound(_) => ErrorKind::NotFound,
            CommerceError::Persistence(_) => ErrorKind::Persistence,
            CommerceError::PartialOrder(_) => ErrorKind::PartialOrder,
        }
    }

    /// Shorthand for a [`CommerceError::Validation`] with a message.
    pub fn validation(message: impl Into<String>) -> Self {
        CommerceError::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(CommerceError::InvalidQuantity(0).kind(), ErrorKind::Validation);
        assert_eq!(
            CommerceError::EmptyCart(CartId::new("c1")).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            CommerceError::OrderNotFound(OrderId::new("o1")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CommerceError::from(StoreError::Unavailable("down".into())).kind(),
            ErrorKind::Persistence
        );
    }

    #[test]
    fn test_persistence_is_transparent() {
        let err = CommerceError::from(StoreError::Unavailable("connection reset".into()));
        assert_eq!(err.to_string(), "Store unavailable: connection reset");
    }
}
