//! Cart line consolidation.
//!
//! Adding the same variant twice grows one line instead of creating a second.
//! Each operation is a read followed by a write against the store; callers
//! serialize access per cart.

use tracing::debug;

use crate::cart::{Cart, CartLine};
use crate::error::CommerceError;
use crate::ids::{CartId, VariantId};
use crate::money::Money;
use crate::store::CatalogOrderStore;

/// Maximum quantity allowed on a single cart line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// Add `quantity` units of a variant to a cart.
///
/// An existing line for the variant has its quantity increased and its unit
/// price refreshed to `unit_price`; otherwise a new line is inserted. Inputs
/// are checked before the store is touched. Whether the variant exists is the
/// caller's concern.
pub fn add_to_cart<S: CatalogOrderStore + ?Sized>(
    store: &mut S,
    cart_id: &CartId,
    variant_id: &VariantId,
    quantity: i64,
    unit_price: Money,
) -> Result<CartLine, CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_LINE {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_LINE,
        ));
    }
    if unit_price.is_negative() {
        return Err(CommerceError::NegativePrice(unit_price));
    }

    match store.find_cart_line(cart_id, variant_id)? {
        Some(existing) => {
            if existing.unit_price.currency != unit_price.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: existing.unit_price.currency,
                    got: unit_price.currency,
                });
            }
            let merged = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            if merged > MAX_QUANTITY_PER_LINE {
                return Err(CommerceError::QuantityExceedsLimit(
                    merged,
                    MAX_QUANTITY_PER_LINE,
                ));
            }

            let line = CartLine::new(cart_id.clone(), variant_id.clone(), merged, unit_price);
            let stored = store
                .update_cart_line(&line)?
                .ok_or_else(|| CommerceError::CartLineNotFound {
                    cart_id: cart_id.clone(),
                    variant_id: variant_id.clone(),
                })?;
            debug!(cart_id = %cart_id, variant_id = %variant_id, quantity = stored.quantity, "merged cart line");
            Ok(stored)
        }
        None => {
            let line = CartLine::new(cart_id.clone(), variant_id.clone(), quantity, unit_price);
            let stored = store.insert_cart_line(&line)?;
            debug!(cart_id = %cart_id, variant_id = %variant_id, quantity, "inserted cart line");
            Ok(stored)
        }
    }
}

/// Overwrite the quantity of a cart line.
///
/// A quantity of zero or less deletes the line (idempotently) and returns
/// `None`. Setting a positive quantity on a line that does not exist is a
/// not-found error.
pub fn set_line_quantity<S: CatalogOrderStore + ?Sized>(
    store: &mut S,
    cart_id: &CartId,
    variant_id: &VariantId,
    new_quantity: i64,
) -> Result<Option<CartLine>, CommerceError> {
    if new_quantity <= 0 {
        store.delete_cart_line(cart_id, variant_id)?;
        debug!(cart_id = %cart_id, variant_id = %variant_id, "removed cart line");
        return Ok(None);
    }
    if new_quantity > MAX_QUANTITY_PER_LINE {
        return Err(CommerceError::QuantityExceedsLimit(
            new_quantity,
            MAX_QUANTITY_PER_LINE,
        ));
    }

    let not_found = || CommerceError::CartLineNotFound {
        cart_id: cart_id.clone(),
        variant_id: variant_id.clone(),
    };

    let mut line = store
        .find_cart_line(cart_id, variant_id)?
        .ok_or_else(not_found)?;
    line.quantity = new_quantity;
    let stored = store.update_cart_line(&line)?.ok_or_else(not_found)?;
    debug!(cart_id = %cart_id, variant_id = %variant_id, quantity = new_quantity, "set cart line quantity");
    Ok(Some(stored))
}

/// All lines of a cart.
pub fn cart_lines<S: CatalogOrderStore + ?Sized>(
    store: &S,
    cart_id: &CartId,
) -> Result<Vec<CartLine>, CommerceError> {
    Ok(store.list_cart_lines(cart_id)?)
}

/// The session's open cart, created on first use.
pub fn open_cart<S: CatalogOrderStore + ?Sized>(
    store: &mut S,
    session_id: &str,
) -> Result<Cart, CommerceError> {
    if session_id.trim().is_empty() {
        return Err(CommerceError::validation("session id is required"));
    }
    if let Some(cart) = store.find_open_cart(session_id)? {
        return Ok(cart);
    }
    let cart = store.create_cart(&Cart::for_session(session_id))?;
    debug!(cart_id = %cart.id, "created cart for session");
    Ok(cart)
}
