//! Table row shapes and their mapping to storefront records.
//!
//! Monetary columns are decimal major units on the wire; the domain keeps
//! integer minor units. Tables without a `currency` column are read in the
//! store's configured currency.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quantum_commerce::cart::{Cart, CartLine, CartStatus};
use quantum_commerce::catalog::{parse_tags, AvailabilityStatus, Product, ProductVariant};
use quantum_commerce::checkout::{
    Address, AddressKind, Customer, LineItem, Order, OrderAddress, OrderStatus,
};
use quantum_commerce::{
    AddressId, CartId, Currency, CustomerId, LineItemId, Money, OrderId, ProductId, VariantId,
};

use crate::DataError;

pub const PRODUCTS: &str = "products";
pub const PRODUCT_VARIANTS: &str = "product_variants";
pub const CARTS: &str = "carts";
pub const CART_ITEMS: &str = "cart_items";
pub const CUSTOMERS: &str = "customers";
pub const ORDERS: &str = "orders";
pub const LINE_ITEMS: &str = "line_items";
pub const ORDER_ADDRESSES: &str = "order_addresses";

pub const PRODUCT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "image_url",
    "is_published",
    "availability_status",
    "tags",
    "created_at",
    "updated_at",
];

pub const VARIANT_COLUMNS: &[&str] = &[
    "id",
    "product_id",
    "title",
    "description",
    "image_url",
    "sku",
    "price",
    "compare_at_price",
    "taxable",
    "created_at",
    "updated_at",
];

pub const CART_COLUMNS: &[&str] = &[
    "id",
    "customer_id",
    "session_id",
    "status",
    "created_at",
    "updated_at",
];

pub const CART_ITEM_COLUMNS: &[&str] = &["cart_id", "variant_id", "quantity", "unit_price"];

pub const CUSTOMER_COLUMNS: &[&str] = &[
    "id",
    "email",
    "first_name",
    "last_name",
    "phone",
    "created_at",
    "updated_at",
];

pub const ORDER_COLUMNS: &[&str] = &[
    "id",
    "customer_id",
    "cart_id",
    "status",
    "currency",
    "subtotal_price",
    "total_discounts",
    "total_tax",
    "shipping_price",
    "total_price",
    "notes",
    "created_at",
    "updated_at",
];

pub const LINE_ITEM_COLUMNS: &[&str] = &[
    "id",
    "order_id",
    "variant_id",
    "product_id",
    "title",
    "sku",
    "quantity",
    "unit_price",
    "unit_tax_amount",
    "total_discount",
    "total_price",
];

pub const ADDRESS_COLUMNS: &[&str] = &[
    "id",
    "order_id",
    "type",
    "first_name",
    "last_name",
    "company",
    "phone",
    "line1",
    "line2",
    "city",
    "region",
    "postal_code",
    "country_code",
];

fn to_money(amount: Decimal, currency: Currency, column: &str) -> Result<Money, DataError> {
    Money::from_decimal(amount, currency)
        .map_err(|e| DataError::Decode(format!("{}: {}", column, e)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub is_published: bool,
    pub availability_status: AvailabilityStatus,
    #[serde(default)]
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            image_url: p.image_url.clone(),
            is_published: p.is_published,
            availability_status: p.availability,
            tags: (!p.tags.is_empty()).then(|| p.tags.join(",")),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            is_published: row.is_published,
            availability: row.availability_status,
            tags: row.tags.as_deref().map(parse_tags).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRow {
    pub id: VariantId,
    pub product_id: ProductId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub compare_at_price: Option<Decimal>,
    #[serde(default = "default_taxable")]
    pub taxable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_taxable() -> bool {
    true
}

impl From<&ProductVariant> for VariantRow {
    fn from(v: &ProductVariant) -> Self {
        Self {
            id: v.id.clone(),
            product_id: v.product_id.clone(),
            title: v.title.clone(),
            description: v.description.clone(),
            image_url: v.image_url.clone(),
            sku: v.sku.clone(),
            price: v.price.to_decimal(),
            compare_at_price: v.compare_at_price.map(|m| m.to_decimal()),
            taxable: v.taxable,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

impl VariantRow {
    pub fn into_variant(self, currency: Currency) -> Result<ProductVariant, DataError> {
        Ok(ProductVariant {
            price: to_money(self.price, currency, "price")?,
            compare_at_price: self
                .compare_at_price
                .map(|amount| to_money(amount, currency, "compare_at_price"))
                .transpose()?,
            id: self.id,
            product_id: self.product_id,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            sku: self.sku,
            taxable: self.taxable,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartRow {
    pub id: CartId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub session_id: Option<String>,
    pub status: CartStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Cart> for CartRow {
    fn from(c: &Cart) -> Self {
        Self {
            id: c.id.clone(),
            customer_id: c.customer_id.clone(),
            session_id: c.session_id.clone(),
            status: c.status,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Cart {
            id: row.id,
            customer_id: row.customer_id,
            session_id: row.session_id,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemRow {
    pub cart_id: CartId,
    pub variant_id: VariantId,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl From<&CartLine> for CartItemRow {
    fn from(line: &CartLine) -> Self {
        Self {
            cart_id: line.cart_id.clone(),
            variant_id: line.variant_id.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_decimal(),
        }
    }
}

impl CartItemRow {
    pub fn into_line(self, currency: Currency) -> Result<CartLine, DataError> {
        let unit_price = to_money(self.unit_price, currency, "unit_price")?;
        Ok(CartLine::new(
            self.cart_id,
            self.variant_id,
            self.quantity,
            unit_price,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: CustomerId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerRow {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id.clone(),
            email: c.email.clone(),
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            phone: c.phone.clone(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: OrderId,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub cart_id: Option<CartId>,
    pub status: OrderStatus,
    pub currency: Currency,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_discounts: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderRow {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id.clone(),
            customer_id: o.customer_id.clone(),
            cart_id: o.cart_id.clone(),
            status: o.status,
            currency: o.currency,
            subtotal_price: o.subtotal.to_decimal(),
            total_discounts: o.total_discounts.to_decimal(),
            total_tax: o.tax.to_decimal(),
            shipping_price: o.shipping.to_decimal(),
            total_price: o.total.to_decimal(),
            notes: o.notes.clone(),
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = DataError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let currency = row.currency;
        Ok(Order {
            subtotal: to_money(row.subtotal_price, currency, "subtotal_price")?,
            total_discounts: to_money(row.total_discounts, currency, "total_discounts")?,
            shipping: to_money(row.shipping_price, currency, "shipping_price")?,
            tax: to_money(row.total_tax, currency, "total_tax")?,
            total: to_money(row.total_price, currency, "total_price")?,
            id: row.id,
            customer_id: row.customer_id,
            cart_id: row.cart_id,
            status: row.status,
            currency,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRow {
    pub id: LineItemId,
    pub order_id: OrderId,
    pub variant_id: VariantId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl From<&LineItem> for LineItemRow {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            order_id: item.order_id.clone(),
            variant_id: item.variant_id.clone(),
            product_id: item.product_id.clone(),
            title: item.title.clone(),
            sku: item.sku.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price.to_decimal(),
            unit_tax_amount: item.unit_tax_amount.to_decimal(),
            total_discount: item.total_discount.to_decimal(),
            total_price: item.total_price.to_decimal(),
        }
    }
}

impl LineItemRow {
    pub fn into_line_item(self, currency: Currency) -> Result<LineItem, DataError> {
        Ok(LineItem {
            unit_price: to_money(self.unit_price, currency, "unit_price")?,
            unit_tax_amount: to_money(self.unit_tax_amount, currency, "unit_tax_amount")?,
            total_discount: to_money(self.total_discount, currency, "total_discount")?,
            total_price: to_money(self.total_price, currency, "total_price")?,
            id: self.id,
            order_id: self.order_id,
            variant_id: self.variant_id,
            product_id: self.product_id,
            title: self.title,
            sku: self.sku,
            quantity: self.quantity,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRow {
    pub id: AddressId,
    pub order_id: OrderId,
    #[serde(rename = "type")]
    pub kind: AddressKind,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country_code: String,
}

impl From<&OrderAddress> for AddressRow {
    fn from(a: &OrderAddress) -> Self {
        let address = &a.address;
        Self {
            id: a.id.clone(),
            order_id: a.order_id.clone(),
            kind: a.kind,
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            company: address.company.clone(),
            phone: address.phone.clone(),
            line1: address.line1.clone(),
            line2: address.line2.clone(),
            city: address.city.clone(),
            region: address.region.clone(),
            postal_code: address.postal_code.clone(),
            country_code: address.country_code.clone(),
        }
    }
}

impl From<AddressRow> for OrderAddress {
    fn from(row: AddressRow) -> Self {
        OrderAddress {
            id: row.id,
            order_id: row.order_id,
            kind: row.kind,
            address: Address {
                first_name: row.first_name,
                last_name: row.last_name,
                company: row.company,
                phone: row.phone,
                line1: row.line1,
                line2: row.line2,
                city: row.city,
                region: row.region,
                postal_code: row.postal_code,
                country_code: row.country_code,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variant_price_is_major_units_on_the_wire() {
        let row: VariantRow = serde_json::from_value(json!({
            "id": "v1",
            "product_id": "p1",
            "title": "Medium",
            "price": 299.99,
            "compare_at_price": null,
            "taxable": true,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        let variant = row.clone().into_variant(Currency::USD).unwrap();
        assert_eq!(variant.price.amount_minor, 29999);
        assert_eq!(variant.compare_at_price, None);

        let back = serde_json::to_value(VariantRow::from(&variant)).unwrap();
        assert_eq!(back["price"], json!(299.99));
    }

    #[test]
    fn test_product_tags_round_through_comma_column() {
        let row: ProductRow = serde_json::from_value(json!({
            "id": "p1",
            "name": "Quantum Flux Jacket",
            "is_published": true,
            "availability_status": "IN_STOCK",
            "tags": "outerwear, limited,outerwear",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-02T00:00:00Z"
        }))
        .unwrap();
        let product = Product::from(row);
        assert_eq!(product.tags, vec!["outerwear", "limited"]);
        assert_eq!(
            ProductRow::from(&product).tags.as_deref(),
            Some("outerwear,limited")
        );
    }

    #[test]
    fn test_order_row_reads_legacy_on_hold_status() {
        let row: OrderRow = serde_json::from_value(json!({
            "id": "o1",
            "customer_id": "cu1",
            "status": "ON-HOLD",
            "currency": "USD",
            "subtotal_price": 679.97,
            "total_discounts": 0,
            "total_tax": 54.4,
            "shipping_price": 15,
            "total_price": 749.37,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        let order = Order::try_from(row).unwrap();
        assert_eq!(order.status, OrderStatus::OnHold);
        assert_eq!(order.tax.amount_minor, 5440);
        assert_eq!(order.total.amount_minor, 74937);
        assert_eq!(order.cart_id, None);
    }

    #[test]
    fn test_address_kind_uses_type_column() {
        let address = OrderAddress::new(
            OrderId::new("o1"),
            AddressKind::Billing,
            Address::new("42 Nebula Ave", "Roswell", "NM", "88201"),
        );
        let value = serde_json::to_value(AddressRow::from(&address)).unwrap();
        assert_eq!(value["type"], "BILLING");
        assert_eq!(value["country_code"], "US");

        let row: AddressRow = serde_json::from_value(value).unwrap();
        assert_eq!(OrderAddress::from(row), address);
    }

    #[test]
    fn test_unknown_status_fails_to_decode() {
        let result: Result<CartRow, _> = serde_json::from_value(json!({
            "id": "c1",
            "status": "LOST",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }));
        assert!(result.is_err());
    }
}
