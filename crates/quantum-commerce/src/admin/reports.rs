//! Order dashboard numbers and search.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::checkout::{Customer, Order, OrderStatus};
use crate::error::CommerceError;
use crate::ids::CustomerId;
use crate::money::{Currency, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderStats {
    pub total_orders: usize,
    /// Sum of order totals, whatever their status.
    pub total_revenue: Money,
    /// Orders still `PENDING` or `PROCESSING`.
    pub pending_orders: usize,
    pub unique_customers: usize,
}

/// Aggregate `orders`. Revenue is reported in `currency`; an order in any
/// other currency is an error.
pub fn order_stats(orders: &[Order], currency: Currency) -> Result<OrderStats, CommerceError> {
    let total_revenue = Money::try_sum(orders.iter().map(|o| &o.total), currency)?;
    let unique_customers = orders
        .iter()
        .map(|o| &o.customer_id)
        .collect::<HashSet<_>>()
        .len();

    Ok(OrderStats {
        total_orders: orders.len(),
        total_revenue,
        pending_orders: orders.iter().filter(|o| o.status.is_open()).count(),
        unique_customers,
    })
}

/// Case-insensitive substring match on order id, customer id, or the
/// customer's name and email, optionally restricted to one status.
///
/// `customers` supplies the names; orders whose customer is not in it can
/// still be found by id.
pub fn search_orders<'a>(
    orders: &'a [Order],
    customers: &[Customer],
    query: &str,
    status: Option<OrderStatus>,
) -> Vec<&'a Order> {
    let needle = query.trim().to_lowercase();
    let names: HashMap<&CustomerId, String> = customers
        .iter()
        .map(|c| {
            let haystack = format!("{} {}", c.display_name(), c.email).to_lowercase();
            (&c.id, haystack)
        })
        .collect();

    orders
        .iter()
        .filter(|o| status.map(|s| o.status == s).unwrap_or(true))
        .filter(|o| {
            needle.is_empty()
                || o.id.as_str().to_lowercase().contains(&needle)
                || o.customer_id.as_str().to_lowercase().contains(&needle)
                || names
                    .get(&o.customer_id)
                    .map(|n| n.contains(&needle))
                    .unwrap_or(false)
        })
        .collect()
}
