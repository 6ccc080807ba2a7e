//! Persistence port.
//!
//! The storefront enforces every business rule itself; a store only reads and
//! writes records. Reads take `&self` and writes take `&mut self`, so a single
//! caller owns a store for the duration of an operation and no locking is
//! involved. Concurrent writers to the same cart see last-write-wins.

use thiserror::Error;

use crate::cart::{Cart, CartLine};
use crate::catalog::{Product, ProductVariant};
use crate::checkout::{Customer, LineItem, Order, OrderAddress, OrderStatus};
use crate::ids::{CartId, OrderId, ProductId, VariantId};

/// Failures reported by a store implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing service could not be reached or timed out.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The backing service refused the operation.
    #[error("Store rejected the operation: {0}")]
    Rejected(String),

    /// A stored record could not be interpreted.
    #[error("Malformed store data: {0}")]
    Malformed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Which products a listing should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductScope {
    /// Published and in stock.
    Storefront,
    /// Everything, including drafts.
    All,
}

/// CRUD over the storefront's tables.
///
/// Listings come back in display order: products newest first, variants by
/// ascending price, orders newest first.
pub trait CatalogOrderStore {
    // Catalog

    fn list_products(&self, scope: ProductScope) -> StoreResult<Vec<Product>>;

    fn list_variants(&self, product_id: Option<&ProductId>) -> StoreResult<Vec<ProductVariant>>;

    fn create_product(&mut self, product: &Product) -> StoreResult<Product>;

    /// Returns `None` when no product has that id.
    fn update_product(&mut self, product: &Product) -> StoreResult<Option<Product>>;

    fn create_variant(&mut self, variant: &ProductVariant) -> StoreResult<ProductVariant>;

    /// Returns `None` when no variant has that id.
    fn update_variant(&mut self, variant: &ProductVariant) -> StoreResult<Option<ProductVariant>>;

    // Carts

    /// The open cart for a browser session, if any.
    fn find_open_cart(&self, session_id: &str) -> StoreResult<Option<Cart>>;

    fn create_cart(&mut self, cart: &Cart) -> StoreResult<Cart>;

    fn find_cart_line(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
    ) -> StoreResult<Option<CartLine>>;

    fn list_cart_lines(&self, cart_id: &CartId) -> StoreResult<Vec<CartLine>>;

    fn insert_cart_line(&mut self, line: &CartLine) -> StoreResult<CartLine>;

    /// Overwrite quantity and unit price. Returns `None` when the line is gone.
    fn update_cart_line(&mut self, line: &CartLine) -> StoreResult<Option<CartLine>>;

    /// Deleting a missing line is not an error.
    fn delete_cart_line(&mut self, cart_id: &CartId, variant_id: &VariantId) -> StoreResult<()>;

    /// Remove every line of a cart.
    fn clear_cart(&mut self, cart_id: &CartId) -> StoreResult<()>;

    // Orders

    fn create_customer(&mut self, customer: &Customer) -> StoreResult<Customer>;

    fn list_customers(&self) -> StoreResult<Vec<Customer>>;

    fn create_order(&mut self, order: &Order) -> StoreResult<Order>;

    fn create_line_items(&mut self, items: &[LineItem]) -> StoreResult<Vec<LineItem>>;

    fn create_addresses(&mut self, addresses: &[OrderAddress]) -> StoreResult<Vec<OrderAddress>>;

    fn find_order(&self, id: &OrderId) -> StoreResult<Option<Order>>;

    fn list_orders(&self) -> StoreResult<Vec<Order>>;

    fn list_line_items(&self, order_id: &OrderId) -> StoreResult<Vec<LineItem>>;

    /// Persist a new status. Returns the stored order, or `None` when no
    /// order has that id.
    fn update_order_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
    ) -> StoreResult<Option<Order>>;
}
