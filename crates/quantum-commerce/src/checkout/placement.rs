//! Order placement.
//!
//! Placement is a sequence of writes: customer, order, line items, addresses,
//! then clearing the cart. The order and its line items are built and checked
//! before the first write. A failure after the customer row exists is
//! reported as a [`PartialOrder`] naming what was committed, so an operator
//! can repair it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

use crate::cart::{compute_breakdown, ShippingPolicy, TaxPolicy};
use crate::catalog::ProductVariant;
use crate::checkout::{
    Address, AddressKind, Customer, CustomerDetails, LineItem, Order, OrderAddress,
};
use crate::error::CommerceError;
use crate::ids::{CartId, CustomerId, OrderId, VariantId};
use crate::store::{CatalogOrderStore, StoreError};

/// Everything collected at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutRequest {
    pub cart_id: CartId,
    pub customer: CustomerDetails,
    pub shipping_address: Address,
    /// `None` when billing is the same as shipping.
    pub billing_address: Option<Address>,
    pub notes: Option<String>,
}

impl CheckoutRequest {
    /// Check the customer and addresses. Does not look at the cart.
    pub fn validate(&self) -> Result<(), CommerceError> {
        self.customer.validate()?;
        self.shipping_address.validate(AddressKind::Shipping)?;
        if let Some(billing) = &self.billing_address {
            billing.validate(AddressKind::Billing)?;
        }
        Ok(())
    }
}

/// The writes that make up a placement, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStep {
    Customer,
    Order,
    LineItems,
    Addresses,
    ClearCart,
}

impl PlacementStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementStep::Customer => "customer",
            PlacementStep::Order => "order",
            PlacementStep::LineItems => "line_items",
            PlacementStep::Addresses => "addresses",
            PlacementStep::ClearCart => "clear_cart",
        }
    }
}

impl fmt::Display for PlacementStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order whose placement stopped part way.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "order {} partially placed: {failed_step} failed after {}: {source}",
    display_order(.order_id.as_ref()),
    display_steps(.completed)
)]
pub struct PartialOrder {
    /// `None` when the order row itself was not written.
    pub order_id: Option<OrderId>,
    pub customer_id: CustomerId,
    pub cart_id: CartId,
    /// Steps whose writes were committed.
    pub completed: Vec<PlacementStep>,
    pub failed_step: PlacementStep,
    #[source]
    pub source: StoreError,
}

fn display_order(order_id: Option<&OrderId>) -> String {
    match order_id {
        Some(id) => id.to_string(),
        None => "(not created)".to_string(),
    }
}

fn display_steps(steps: &[PlacementStep]) -> String {
    steps
        .iter()
        .map(PlacementStep::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A successfully placed order and everything written for it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlacedOrder {
    pub order: Order,
    pub customer: Customer,
    pub line_items: Vec<LineItem>,
    pub addresses: Vec<OrderAddress>,
    /// False when the order is complete but its cart lines could not be
    /// removed. The cart should be cleared by hand.
    pub cart_cleared: bool,
}

/// Turn a cart into an order.
pub fn place_order<S: CatalogOrderStore + ?Sized>(
    store: &mut S,
    request: CheckoutRequest,
    shipping_policy: &dyn ShippingPolicy,
    tax_policy: &dyn TaxPolicy,
) -> Result<PlacedOrder, CommerceError> {
    request.validate()?;

    let cart_id = request.cart_id.clone();
    let lines = store.list_cart_lines(&cart_id)?;
    if lines.is_empty() {
        return Err(CommerceError::EmptyCart(cart_id));
    }
    let breakdown = compute_breakdown(&lines, shipping_policy, tax_policy)?;
    let variants: HashMap<VariantId, ProductVariant> = store
        .list_variants(None)?
        .into_iter()
        .map(|v| (v.id.clone(), v))
        .collect();

    let now = Utc::now();
    let customer = request.customer.to_customer(now);
    let mut order = Order::new(
        customer.id.clone(),
        Some(cart_id.clone()),
        &breakdown,
        request.notes.clone(),
        now,
    );
    let mut items = lines
        .iter()
        .map(|line| {
            LineItem::from_cart_line(&order.id, line, variants.get(&line.variant_id), tax_policy)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let customer = store.create_customer(&customer)?;

    let partial = |order_id: Option<&OrderId>,
                   completed: &[PlacementStep],
                   failed_step: PlacementStep,
                   source: StoreError| {
        let partial = PartialOrder {
            order_id: order_id.cloned(),
            customer_id: customer.id.clone(),
            cart_id: cart_id.clone(),
            completed: completed.to_vec(),
            failed_step,
            source,
        };
        warn!(
            order_id = %display_order(partial.order_id.as_ref()),
            customer_id = %partial.customer_id,
            step = %failed_step,
            error = %partial.source,
            "order partially placed"
        );
        CommerceError::PartialOrder(Box::new(partial))
    };

    order.customer_id = customer.id.clone();
    let order = store
        .create_order(&order)
        .map_err(|e| partial(None, &[PlacementStep::Customer], PlacementStep::Order, e))?;
    for item in &mut items {
        item.order_id = order.id.clone();
    }

    let line_items = store.create_line_items(&items).map_err(|e| {
        partial(
            Some(&order.id),
            &[PlacementStep::Customer, PlacementStep::Order],
            PlacementStep::LineItems,
            e,
        )
    })?;

    let mut addresses = vec![OrderAddress::new(
        order.id.clone(),
        AddressKind::Shipping,
        request.shipping_address,
    )];
    if let Some(billing) = request.billing_address {
        addresses.push(OrderAddress::new(order.id.clone(), AddressKind::Billing, billing));
    }
    let addresses = store.create_addresses(&addresses).map_err(|e| {
        partial(
            Some(&order.id),
            &[
                PlacementStep::Customer,
                PlacementStep::Order,
                PlacementStep::LineItems,
            ],
            PlacementStep::Addresses,
            e,
        )
    })?;

    let cart_cleared = match store.clear_cart(&cart_id) {
        Ok(()) => true,
        Err(e) => {
            warn!(order_id = %order.id, cart_id = %cart_id, error = %e, "order placed but cart was not cleared");
            false
        }
    };

    info!(
        order_id = %order.id,
        customer_id = %customer.id,
        total = %order.total,
        lines = line_items.len(),
        "order placed"
    );

    Ok(PlacedOrder {
        order,
        customer,
        line_items,
        addresses,
        cart_cleared,
    })
}
