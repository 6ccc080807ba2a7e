//! [`CatalogOrderStore`] over the tabular API.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use quantum_commerce::cart::{Cart, CartLine, CartStatus};
use quantum_commerce::catalog::{AvailabilityStatus, Product, ProductVariant};
use quantum_commerce::checkout::{Customer, LineItem, Order, OrderAddress, OrderStatus};
use quantum_commerce::store::{CatalogOrderStore, ProductScope, StoreError, StoreResult};
use quantum_commerce::{CartId, Currency, OrderId, ProductId, VariantId};

use crate::rows::*;
use crate::{ApiRequest, ApiResponse, DataError, Direction, HttpTransport, TabularClient, Transport};

/// Storefront persistence backed by the tabular API.
///
/// Variant, cart-line and line-item tables have no currency column, so they
/// are read in the store's currency (USD unless set).
#[derive(Debug, Clone)]
pub struct TabularStore<T = HttpTransport> {
    client: TabularClient<T>,
    currency: Currency,
}

impl<T: Transport> TabularStore<T> {
    pub fn new(client: TabularClient<T>) -> Self {
        Self {
            client,
            currency: Currency::USD,
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn client(&self) -> &TabularClient<T> {
        &self.client
    }

    fn run(&self, request: ApiRequest) -> StoreResult<ApiResponse> {
        Ok(self.client.execute(&request)?)
    }

    fn rows<R: DeserializeOwned>(&self, request: ApiRequest) -> StoreResult<Vec<R>> {
        Ok(self.run(request)?.rows()?)
    }

    fn first<R: DeserializeOwned>(&self, request: ApiRequest) -> StoreResult<Option<R>> {
        Ok(self.run(request)?.first()?)
    }

    /// Insert one row. Falls back to the written row when nothing is returned.
    fn insert_one<R>(&self, table: &str, row: R, columns: &[&str]) -> StoreResult<R>
    where
        R: Serialize + DeserializeOwned,
    {
        let response = self.run(ApiRequest::insert(table, vec![to_value(&row)?]).returning(columns))?;
        Ok(response.first()?.unwrap_or(row))
    }

    fn insert_many<R>(&self, table: &str, rows: Vec<R>, columns: &[&str]) -> StoreResult<Vec<R>>
    where
        R: Serialize + DeserializeOwned,
    {
        if rows.is_empty() {
            return Ok(rows);
        }
        let data = rows.iter().map(to_value).collect::<StoreResult<Vec<_>>>()?;
        let response = self.run(ApiRequest::insert(table, data).returning(columns))?;
        if response.returned().is_empty() {
            return Ok(rows);
        }
        Ok(response.rows()?)
    }

    /// Run an update. `Ok(None)` when no row matched; the written row when
    /// rows changed but none were returned.
    fn update_one<R>(&self, request: ApiRequest, written: R) -> StoreResult<Option<R>>
    where
        R: DeserializeOwned,
    {
        let response = self.run(request)?;
        match response.first()? {
            Some(row) => Ok(Some(row)),
            None if response.affected_rows > 0 => Ok(Some(written)),
            None => Ok(None),
        }
    }
}

fn to_value<R: Serialize>(row: &R) -> StoreResult<Value> {
    serde_json::to_value(row).map_err(|e| StoreError::from(DataError::from(e)))
}

/// Serialize `row` as an update patch, dropping key columns.
fn patch<R: Serialize>(row: &R, keys: &[&str]) -> StoreResult<Value> {
    let mut value = to_value(row)?;
    if let Value::Object(map) = &mut value {
        for key in keys {
            map.remove(*key);
        }
    }
    Ok(value)
}

fn decode<D>(result: Result<D, DataError>) -> StoreResult<D> {
    result.map_err(StoreError::from)
}

impl<T: Transport> CatalogOrderStore for TabularStore<T> {
    fn list_products(&self, scope: ProductScope) -> StoreResult<Vec<Product>> {
        let mut request = ApiRequest::select(PRODUCTS);
        if scope == ProductScope::Storefront {
            request = request
                .eq("is_published", true)
                .eq("availability_status", AvailabilityStatus::InStock.as_str());
        }
        let rows: Vec<ProductRow> = self.rows(request.order_by("created_at", Direction::Desc))?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn list_variants(&self, product_id: Option<&ProductId>) -> StoreResult<Vec<ProductVariant>> {
        let mut request = ApiRequest::select(PRODUCT_VARIANTS);
        if let Some(id) = product_id {
            request = request.eq("product_id", id.as_str());
        }
        let rows: Vec<VariantRow> = self.rows(request.order_by("price", Direction::Asc))?;
        rows.into_iter()
            .map(|row| decode(row.into_variant(self.currency)))
            .collect()
    }

    fn create_product(&mut self, product: &Product) -> StoreResult<Product> {
        let row = self.insert_one(PRODUCTS, ProductRow::from(product), PRODUCT_COLUMNS)?;
        Ok(row.into())
    }

    fn update_product(&mut self, product: &Product) -> StoreResult<Option<Product>> {
        let row = ProductRow::from(product);
        let request = ApiRequest::update(PRODUCTS, patch(&row, &["id", "created_at"])?)
            .eq("id", product.id.as_str())
            .returning(PRODUCT_COLUMNS);
        Ok(self.update_one(request, row)?.map(Product::from))
    }

    fn create_variant(&mut self, variant: &ProductVariant) -> StoreResult<ProductVariant> {
        let row = self.insert_one(PRODUCT_VARIANTS, VariantRow::from(variant), VARIANT_COLUMNS)?;
        decode(row.into_variant(variant.price.currency))
    }

    fn update_variant(&mut self, variant: &ProductVariant) -> StoreResult<Option<ProductVariant>> {
        let row = VariantRow::from(variant);
        let request = ApiRequest::update(
            PRODUCT_VARIANTS,
            patch(&row, &["id", "product_id", "created_at"])?,
        )
        .eq("id", variant.id.as_str())
        .returning(VARIANT_COLUMNS);
        self.update_one(request, row)?
            .map(|row| decode(row.into_variant(variant.price.currency)))
            .transpose()
    }

    fn find_open_cart(&self, session_id: &str) -> StoreResult<Option<Cart>> {
        let row: Option<CartRow> = self.first(
            ApiRequest::select(CARTS)
                .eq("session_id", session_id)
                .eq("status", CartStatus::Open.as_str())
                .limit(1),
        )?;
        Ok(row.map(Cart::from))
    }

    fn create_cart(&mut self, cart: &Cart) -> StoreResult<Cart> {
        let row = self.insert_one(CARTS, CartRow::from(cart), CART_COLUMNS)?;
        debug!(cart_id = %row.id, "created cart");
        Ok(row.into())
    }

    fn find_cart_line(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
    ) -> StoreResult<Option<CartLine>> {
        let row: Option<CartItemRow> = self.first(
            ApiRequest::select(CART_ITEMS)
                .eq("cart_id", cart_id.as_str())
                .eq("variant_id", variant_id.as_str())
                .limit(1),
        )?;
        row.map(|row| decode(row.into_line(self.currency)))
            .transpose()
    }

    fn list_cart_lines(&self, cart_id: &CartId) -> StoreResult<Vec<CartLine>> {
        let rows: Vec<CartItemRow> =
            self.rows(ApiRequest::select(CART_ITEMS).eq("cart_id", cart_id.as_str()))?;
        rows.into_iter()
            .map(|row| decode(row.into_line(self.currency)))
            .collect()
    }

    fn insert_cart_line(&mut self, line: &CartLine) -> StoreResult<CartLine> {
        let row = self.insert_one(CART_ITEMS, CartItemRow::from(line), CART_ITEM_COLUMNS)?;
        decode(row.into_line(line.unit_price.currency))
    }

    fn update_cart_line(&mut self, line: &CartLine) -> StoreResult<Option<CartLine>> {
        let row = CartItemRow::from(line);
        let request = ApiRequest::update(CART_ITEMS, patch(&row, &["cart_id", "variant_id"])?)
            .eq("cart_id", line.cart_id.as_str())
            .eq("variant_id", line.variant_id.as_str())
            .returning(CART_ITEM_COLUMNS);
        self.update_one(request, row)?
            .map(|row| decode(row.into_line(line.unit_price.currency)))
            .transpose()
    }

    fn delete_cart_line(&mut self, cart_id: &CartId, variant_id: &VariantId) -> StoreResult<()> {
        self.run(
            ApiRequest::delete(CART_ITEMS)
                .eq("cart_id", cart_id.as_str())
                .eq("variant_id", variant_id.as_str()),
        )?;
        Ok(())
    }

    fn clear_cart(&mut self, cart_id: &CartId) -> StoreResult<()> {
        let response = self.run(ApiRequest::delete(CART_ITEMS).eq("cart_id", cart_id.as_str()))?;
        debug!(%cart_id, removed = response.affected_rows, "cleared cart");
        Ok(())
    }

    fn create_customer(&mut self, customer: &Customer) -> StoreResult<Customer> {
        let row = self.insert_one(CUSTOMERS, CustomerRow::from(customer), CUSTOMER_COLUMNS)?;
        Ok(row.into())
    }

    fn create_order(&mut self, order: &Order) -> StoreResult<Order> {
        let row = self.insert_one(ORDERS, OrderRow::from(order), ORDER_COLUMNS)?;
        decode(Order::try_from(row))
    }

    fn create_line_items(&mut self, items: &[LineItem]) -> StoreResult<Vec<LineItem>> {
        let currency = items
            .first()
            .map(|item| item.unit_price.currency)
            .unwrap_or(self.currency);
        let rows = self.insert_many(
            LINE_ITEMS,
            items.iter().map(LineItemRow::from).collect(),
            LINE_ITEM_COLUMNS,
        )?;
        rows.into_iter()
            .map(|row| decode(row.into_line_item(currency)))
            .collect()
    }

    fn create_addresses(&mut self, addresses: &[OrderAddress]) -> StoreResult<Vec<OrderAddress>> {
        let rows = self.insert_many(
            ORDER_ADDRESSES,
            addresses.iter().map(AddressRow::from).collect(),
            ADDRESS_COLUMNS,
        )?;
        Ok(rows.into_iter().map(OrderAddress::from).collect())
    }

    fn find_order(&self, id: &OrderId) -> StoreResult<Option<Order>> {
        let row: Option<OrderRow> =
            self.first(ApiRequest::select(ORDERS).eq("id", id.as_str()).limit(1))?;
        row.map(|row| decode(Order::try_from(row))).transpose()
    }

    fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let rows: Vec<CustomerRow> = self.rows(ApiRequest::select(CUSTOMERS))?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let rows: Vec<OrderRow> =
            self.rows(ApiRequest::select(ORDERS).order_by("created_at", Direction::Desc))?;
        rows.into_iter()
            .map(|row| decode(Order::try_from(row)))
            .collect()
    }

    fn list_line_items(&self, order_id: &OrderId) -> StoreResult<Vec<LineItem>> {
        let rows: Vec<LineItemRow> =
            self.rows(ApiRequest::select(LINE_ITEMS).eq("order_id", order_id.as_str()))?;
        rows.into_iter()
            .map(|row| decode(row.into_line_item(self.currency)))
            .collect()
    }

    fn update_order_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
    ) -> StoreResult<Option<Order>> {
        let request = ApiRequest::update(
            ORDERS,
            json!({ "status": status, "updated_at": Utc::now() }),
        )
        .eq("id", id.as_str())
        .returning(ORDER_COLUMNS);

        let response = self.run(request)?;
        match response.first::<OrderRow>()? {
            Some(row) => decode(Order::try_from(row)).map(Some),
            None if response.affected_rows > 0 => self.find_order(id),
            None => Ok(None),
        }
    }
}
