//! Storefront facade.
//!
//! Bundles a store with the pricing and status policies so callers do not
//! have to thread them through every call.

use tracing::debug;

use crate::admin::{self, OrderStats};
use crate::cart::{
    self, compute_breakdown, Cart, CartLine, FlatRateShipping, FlatRateTax, PriceBreakdown,
    PricingConfig, ShippingPolicy, TaxPolicy,
};
use crate::catalog::{self, CatalogStats, Product};
use crate::checkout::{
    place_order, CheckoutFlow, CheckoutRequest, CheckoutStep, Order, OrderStatus,
    PaymentConfirmation, PaymentGateway, PlacedOrder, StubPaymentGateway, TransitionPolicy,
};
use crate::error::CommerceError;
use crate::ids::{CartId, OrderId, VariantId};
use crate::store::CatalogOrderStore;

pub struct Storefront<S> {
    store: S,
    shipping: Box<dyn ShippingPolicy>,
    tax: Box<dyn TaxPolicy>,
    payments: Box<dyn PaymentGateway + Send + Sync>,
    transitions: TransitionPolicy,
}

impl<S: CatalogOrderStore> Storefront<S> {
    /// Flat $15 shipping, 8% tax, stub payments, unrestricted status changes.
    pub fn new(store: S) -> Self {
        Self {
            store,
            shipping: Box::new(FlatRateShipping::default()),
            tax: Box::new(FlatRateTax::default()),
            payments: Box::new(StubPaymentGateway),
            transitions: TransitionPolicy::default(),
        }
    }

    pub fn from_config(
        store: S,
        pricing: &PricingConfig,
        transitions: TransitionPolicy,
    ) -> Result<Self, CommerceError> {
        Ok(Self {
            shipping: Box::new(pricing.shipping_policy()?),
            tax: Box::new(pricing.tax_policy()?),
            transitions,
            ..Self::new(store)
        })
    }

    pub fn with_shipping_policy(mut self, policy: impl ShippingPolicy + 'static) -> Self {
        self.shipping = Box::new(policy);
        self
    }

    pub fn with_tax_policy(mut self, policy: impl TaxPolicy + 'static) -> Self {
        self.tax = Box::new(policy);
        self
    }

    pub fn with_payment_gateway(
        mut self,
        gateway: impl PaymentGateway + Send + Sync + 'static,
    ) -> Self {
        self.payments = Box::new(gateway);
        self
    }

    pub fn with_transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.transitions = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn transition_policy(&self) -> TransitionPolicy {
        self.transitions
    }

    // Catalog

    pub fn products(&self) -> Result<Vec<Product>, CommerceError> {
        catalog::storefront_products(&self.store)
    }

    pub fn catalog_stats(&self) -> Result<CatalogStats, CommerceError> {
        let products = catalog::all_products(&self.store)?;
        let variants = catalog::variants(&self.store, None)?;
        Ok(catalog::catalog_stats(&products, &variants))
    }

    // Cart

    pub fn open_cart(&mut self, session_id: &str) -> Result<Cart, CommerceError> {
        cart::open_cart(&mut self.store, session_id)
    }

    /// Add a variant at its current catalog price.
    pub fn add_to_cart(
        &mut self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Result<CartLine, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let variant = catalog::find_variant(&self.store, variant_id)?;
        cart::add_to_cart(&mut self.store, cart_id, variant_id, quantity, variant.price)
    }

    pub fn set_line_quantity(
        &mut self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Result<Option<CartLine>, CommerceError> {
        cart::set_line_quantity(&mut self.store, cart_id, variant_id, quantity)
    }

    pub fn cart_lines(&self, cart_id: &CartId) -> Result<Vec<CartLine>, CommerceError> {
        cart::cart_lines(&self.store, cart_id)
    }

    /// Current totals for a cart. Recomputed on every call.
    pub fn cart_breakdown(&self, cart_id: &CartId) -> Result<PriceBreakdown, CommerceError> {
        let lines = self.cart_lines(cart_id)?;
        self.quote(&lines)
    }

    /// Price arbitrary lines with this storefront's policies.
    pub fn quote(&self, lines: &[CartLine]) -> Result<PriceBreakdown, CommerceError> {
        compute_breakdown(lines, self.shipping.as_ref(), self.tax.as_ref())
    }

    // Checkout

    /// Authorize the cart total and record it on the flow.
    pub fn authorize_payment(
        &self,
        flow: &mut CheckoutFlow,
    ) -> Result<PaymentConfirmation, CommerceError> {
        let breakdown = self.cart_breakdown(&flow.cart_id)?;
        let confirmation = self.payments.authorize(&breakdown.total)?;
        flow.record_payment(confirmation.clone());
        Ok(confirmation)
    }

    pub fn place_order(&mut self, request: CheckoutRequest) -> Result<PlacedOrder, CommerceError> {
        place_order(&mut self.store, request, self.shipping.as_ref(), self.tax.as_ref())
    }

    /// Place the order for a flow that reached `Processing`, then complete it.
    pub fn complete_checkout(
        &mut self,
        flow: &mut CheckoutFlow,
    ) -> Result<PlacedOrder, CommerceError> {
        if flow.step != CheckoutStep::Processing {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: flow.step.as_str().to_string(),
                to: CheckoutStep::Complete.as_str().to_string(),
            });
        }
        let placed = self.place_order(flow.to_request()?)?;
        flow.complete(placed.order.id.clone())?;
        debug!(order_id = %placed.order.id, "checkout complete");
        Ok(placed)
    }

    // Back office

    pub fn orders(&self) -> Result<Vec<Order>, CommerceError> {
        Ok(self.store.list_orders()?)
    }

    pub fn order_stats(&self) -> Result<OrderStats, CommerceError> {
        let orders = self.orders()?;
        admin::order_stats(&orders, self.shipping.currency())
    }

    pub fn set_order_status(
        &mut self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, CommerceError> {
        admin::set_status_by_id(&mut self.store, self.transitions, order_id, status)
    }
}
