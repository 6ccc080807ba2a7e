//! Storefront core for the Quantum alien clothing store.
//!
//! - **Catalog**: products, variants, storefront listings, back-office edits
//! - **Cart**: line consolidation and the price calculator
//! - **Checkout**: customers, addresses, payment stub, order placement
//! - **Admin**: order status changes, order and catalog reporting
//!
//! Persistence goes through the [`store::CatalogOrderStore`] trait. The store
//! holds data only; every rule lives here.
//!
//! # Example
//!
//! ```rust
//! use quantum_commerce::prelude::*;
//!
//! let mut shop = Storefront::new(MemoryStore::new());
//! let cart = CartId::new("cart-1");
//! let jacket = VariantId::new("jacket-m");
//! let hoodie = VariantId::new("hoodie-l");
//!
//! add_to_cart(shop.store_mut(), &cart, &jacket, 1, Money::new(29999, Currency::USD)).unwrap();
//! add_to_cart(shop.store_mut(), &cart, &hoodie, 2, Money::new(18999, Currency::USD)).unwrap();
//!
//! let totals = shop.cart_breakdown(&cart).unwrap();
//! assert_eq!(totals.total.display(), "$749.37");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod memory;
pub mod store;
pub mod storefront;

pub use error::{CommerceError, ErrorKind};
pub use ids::*;
pub use money::{Currency, Money};
pub use storefront::Storefront;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, ErrorKind};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    pub use crate::catalog::{
        AvailabilityStatus, CatalogStats, PriceRange, Product, ProductDraft, ProductVariant,
        VariantDraft,
    };

    pub use crate::cart::{
        add_to_cart, compute_breakdown, set_line_quantity, Cart, CartLine, FlatRateShipping,
        FlatRateTax, PriceBreakdown, PricingConfig, ShippingPolicy, TaxPolicy,
    };

    pub use crate::checkout::{
        Address, AddressKind, CheckoutFlow, CheckoutRequest, CheckoutStep, CustomerDetails,
        LineItem, Order, OrderStatus, PartialOrder, PlacedOrder, TransitionPolicy,
    };

    pub use crate::admin::OrderStats;
    pub use crate::memory::MemoryStore;
    pub use crate::store::{CatalogOrderStore, ProductScope, StoreError};
    pub use crate::storefront::Storefront;
}
