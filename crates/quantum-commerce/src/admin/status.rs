//! Order status changes from the back office.

use tracing::info;

use crate::checkout::{Order, OrderStatus, TransitionPolicy};
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::store::CatalogOrderStore;

/// Change an order's status.
///
/// The transition is checked against `policy` before the store is called.
/// `order` is only updated after the store confirms the write, so on any
/// error it still holds the previous status.
pub fn set_status<S: CatalogOrderStore + ?Sized>(
    store: &mut S,
    policy: TransitionPolicy,
    order: &mut Order,
    new_status: OrderStatus,
) -> Result<(), CommerceError> {
    policy.check(order.status, new_status)?;

    let stored = store
        .update_order_status(&order.id, new_status)?
        .ok_or_else(|| CommerceError::OrderNotFound(order.id.clone()))?;

    let previous = order.status;
    order.status = stored.status;
    order.updated_at = stored.updated_at;

    info!(order_id = %order.id, from = %previous, to = %order.status, "order status changed");
    Ok(())
}

/// Look up an order and change its status.
pub fn set_status_by_id<S: CatalogOrderStore + ?Sized>(
    store: &mut S,
    policy: TransitionPolicy,
    order_id: &OrderId,
    new_status: OrderStatus,
) -> Result<Order, CommerceError> {
    let mut order = store
        .find_order(order_id)?
        .ok_or_else(|| CommerceError::OrderNotFound(order_id.clone()))?;
    set_status(store, policy, &mut order, new_status)?;
    Ok(order)
}
