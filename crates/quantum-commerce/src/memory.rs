//! In-memory store.
//!
//! Backs tests and local demos. Individual operations can be made to fail to
//! exercise error paths, and reads and writes are counted.

use chrono::Utc;
use std::cell::Cell;
use std::collections::HashSet;

use crate::cart::{Cart, CartLine, CartStatus};
use crate::catalog::{Product, ProductVariant};
use crate::checkout::{Customer, LineItem, Order, OrderAddress, OrderStatus};
use crate::ids::{CartId, OrderId, ProductId, VariantId};
use crate::store::{CatalogOrderStore, ProductScope, StoreError, StoreResult};

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    ListProducts,
    ListVariants,
    CreateProduct,
    UpdateProduct,
    CreateVariant,
    UpdateVariant,
    FindOpenCart,
    CreateCart,
    FindCartLine,
    ListCartLines,
    InsertCartLine,
    UpdateCartLine,
    DeleteCartLine,
    ClearCart,
    CreateCustomer,
    ListCustomers,
    CreateOrder,
    CreateLineItems,
    CreateAddresses,
    FindOrder,
    ListOrders,
    ListLineItems,
    UpdateOrderStatus,
}

/// A [`CatalogOrderStore`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: Vec<Product>,
    variants: Vec<ProductVariant>,
    carts: Vec<Cart>,
    cart_lines: Vec<CartLine>,
    customers: Vec<Customer>,
    orders: Vec<Order>,
    line_items: Vec<LineItem>,
    addresses: Vec<OrderAddress>,
    failing: HashSet<StoreOperation>,
    reads: Cell<usize>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `operation` fail with [`StoreError::Unavailable`].
    pub fn fail_on(&mut self, operation: StoreOperation) {
        self.failing.insert(operation);
    }

    pub fn clear_failures(&mut self) {
        self.failing.clear();
    }

    /// Read calls made so far, including failed ones.
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    /// Write calls made so far, including failed ones.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn addresses(&self) -> &[OrderAddress] {
        &self.addresses
    }

    fn read(&self, operation: StoreOperation) -> StoreResult<()> {
        self.reads.set(self.reads.get() + 1);
        self.check(operation)
    }

    fn write(&mut self, operation: StoreOperation) -> StoreResult<()> {
        self.writes += 1;
        self.check(operation)
    }

    fn check(&self, operation: StoreOperation) -> StoreResult<()> {
        if self.failing.contains(&operation) {
            return Err(StoreError::Unavailable(format!(
                "injected failure on {:?}",
                operation
            )));
        }
        Ok(())
    }

    fn line_position(&self, cart_id: &CartId, variant_id: &VariantId) -> Option<usize> {
        self.cart_lines
            .iter()
            .position(|l| &l.cart_id == cart_id && &l.variant_id == variant_id)
    }
}

impl CatalogOrderStore for MemoryStore {
    fn list_products(&self, scope: ProductScope) -> StoreResult<Vec<Product>> {
        self.read(StoreOperation::ListProducts)?;
        let mut products: Vec<Product> = self
            .products
            .iter()
            .filter(|p| scope == ProductScope::All || p.is_visible())
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    fn list_variants(&self, product_id: Option<&ProductId>) -> StoreResult<Vec<ProductVariant>> {
        self.read(StoreOperation::ListVariants)?;
        let mut variants: Vec<ProductVariant> = self
            .variants
            .iter()
            .filter(|v| product_id.map(|id| &v.product_id == id).unwrap_or(true))
            .cloned()
            .collect();
        variants.sort_by_key(|v| v.price.amount_minor);
        Ok(variants)
    }

    fn create_product(&mut self, product: &Product) -> StoreResult<Product> {
        self.write(StoreOperation::CreateProduct)?;
        if self.products.iter().any(|p| p.id == product.id) {
            return Err(StoreError::Rejected(format!("duplicate product {}", product.id)));
        }
        self.products.push(product.clone());
        Ok(product.clone())
    }

    fn update_product(&mut self, product: &Product) -> StoreResult<Option<Product>> {
        self.write(StoreOperation::UpdateProduct)?;
        Ok(self
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .map(|existing| {
                *existing = product.clone();
                existing.clone()
            }))
    }

    fn create_variant(&mut self, variant: &ProductVariant) -> StoreResult<ProductVariant> {
        self.write(StoreOperation::CreateVariant)?;
        self.variants.push(variant.clone());
        Ok(variant.clone())
    }

    fn update_variant(&mut self, variant: &ProductVariant) -> StoreResult<Option<ProductVariant>> {
        self.write(StoreOperation::UpdateVariant)?;
        Ok(self
            .variants
            .iter_mut()
            .find(|v| v.id == variant.id)
            .map(|existing| {
                *existing = variant.clone();
                existing.clone()
            }))
    }

    fn find_open_cart(&self, session_id: &str) -> StoreResult<Option<Cart>> {
        self.read(StoreOperation::FindOpenCart)?;
        Ok(self
            .carts
            .iter()
            .find(|c| c.status == CartStatus::Open && c.session_id.as_deref() == Some(session_id))
            .cloned())
    }

    fn create_cart(&mut self, cart: &Cart) -> StoreResult<Cart> {
        self.write(StoreOperation::CreateCart)?;
        self.carts.push(cart.clone());
        Ok(cart.clone())
    }

    fn find_cart_line(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
    ) -> StoreResult<Option<CartLine>> {
        self.read(StoreOperation::FindCartLine)?;
        Ok(self
            .line_position(cart_id, variant_id)
            .map(|i| self.cart_lines[i].clone()))
    }

    fn list_cart_lines(&self, cart_id: &CartId) -> StoreResult<Vec<CartLine>> {
        self.read(StoreOperation::ListCartLines)?;
        Ok(self
            .cart_lines
            .iter()
            .filter(|l| &l.cart_id == cart_id)
            .cloned()
            .collect())
    }

    fn insert_cart_line(&mut self, line: &CartLine) -> StoreResult<CartLine> {
        self.write(StoreOperation::InsertCartLine)?;
        self.cart_lines.push(line.clone());
        Ok(line.clone())
    }

    fn update_cart_line(&mut self, line: &CartLine) -> StoreResult<Option<CartLine>> {
        self.write(StoreOperation::UpdateCartLine)?;
        Ok(match self.line_position(&line.cart_id, &line.variant_id) {
            Some(i) => {
                self.cart_lines[i] = line.clone();
                Some(line.clone())
            }
            None => None,
        })
    }

    fn delete_cart_line(&mut self, cart_id: &CartId, variant_id: &VariantId) -> StoreResult<()> {
        self.write(StoreOperation::DeleteCartLine)?;
        self.cart_lines
            .retain(|l| !(&l.cart_id == cart_id && &l.variant_id == variant_id));
        Ok(())
    }

    fn clear_cart(&mut self, cart_id: &CartId) -> StoreResult<()> {
        self.write(StoreOperation::ClearCart)?;
        self.cart_lines.retain(|l| &l.cart_id != cart_id);
        Ok(())
    }

    fn create_customer(&mut self, customer: &Customer) -> StoreResult<Customer> {
        self.write(StoreOperation::CreateCustomer)?;
        self.customers.push(customer.clone());
        Ok(customer.clone())
    }

    fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        self.read(StoreOperation::ListCustomers)?;
        Ok(self.customers.clone())
    }

    fn create_order(&mut self, order: &Order) -> StoreResult<Order> {
        self.write(StoreOperation::CreateOrder)?;
        self.orders.push(order.clone());
        Ok(order.clone())
    }

    fn create_line_items(&mut self, items: &[LineItem]) -> StoreResult<Vec<LineItem>> {
        self.write(StoreOperation::CreateLineItems)?;
        self.line_items.extend_from_slice(items);
        Ok(items.to_vec())
    }

    fn create_addresses(&mut self, addresses: &[OrderAddress]) -> StoreResult<Vec<OrderAddress>> {
        self.write(StoreOperation::CreateAddresses)?;
        self.addresses.extend_from_slice(addresses);
        Ok(addresses.to_vec())
    }

    fn find_order(&self, id: &OrderId) -> StoreResult<Option<Order>> {
        self.read(StoreOperation::FindOrder)?;
        Ok(self.orders.iter().find(|o| &o.id == id).cloned())
    }

    fn list_orders(&self) -> StoreResult<Vec<Order>> {
        self.read(StoreOperation::ListOrders)?;
        let mut orders = self.orders.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    fn list_line_items(&self, order_id: &OrderId) -> StoreResult<Vec<LineItem>> {
        self.read(StoreOperation::ListLineItems)?;
        Ok(self
            .line_items
            .iter()
            .filter(|i| &i.order_id == order_id)
            .cloned()
            .collect())
    }

    fn update_order_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
    ) -> StoreResult<Option<Order>> {
        self.write(StoreOperation::UpdateOrderStatus)?;
        Ok(self.orders.iter_mut().find(|o| &o.id == id).map(|order| {
            order.status = status;
            order.updated_at = Utc::now();
            order.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    #[test]
    fn test_injected_failure_and_counters() {
        let mut store = MemoryStore::new();
        let line = CartLine::new(
            CartId::new("c1"),
            VariantId::new("v1"),
            1,
            Money::new(100, Currency::USD),
        );
        store.insert_cart_line(&line).unwrap();

        store.fail_on(StoreOperation::ListCartLines);
        assert!(matches!(
            store.list_cart_lines(&line.cart_id),
            Err(StoreError::Unavailable(_))
        ));
        store.clear_failures();
        assert_eq!(store.list_cart_lines(&line.cart_id).unwrap().len(), 1);

        assert_eq!(store.write_count(), 1);
        assert_eq!(store.read_count(), 2);
    }

    #[test]
    fn test_update_missing_line_returns_none() {
        let mut store = MemoryStore::new();
        let line = CartLine::new(
            CartId::new("c1"),
            VariantId::new("v1"),
            1,
            Money::new(100, Currency::USD),
        );
        assert_eq!(store.update_cart_line(&line).unwrap(), None);
    }
}
