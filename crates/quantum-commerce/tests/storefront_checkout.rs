//! End-to-end storefront walk: catalog, cart, checkout, back office.

use quantum_commerce::catalog::{price_range, save_product, storefront_products};
use quantum_commerce::checkout::StubPaymentGateway;
use quantum_commerce::memory::StoreOperation;
use quantum_commerce::prelude::*;

fn usd(minor: i64) -> Money {
    Money::new(minor, Currency::USD)
}

fn seeded_shop() -> (Storefront<MemoryStore>, VariantId, VariantId) {
    let mut store = MemoryStore::new();

    let jacket = save_product(
        &mut store,
        None,
        ProductDraft {
            name: "Quantum Flux Jacket".into(),
            description: Some("Phase-shifting outerwear".into()),
            is_published: true,
            availability: AvailabilityStatus::InStock,
            tags: vec!["outerwear".into()],
            ..Default::default()
        },
        vec![
            VariantDraft::new("Medium", usd(29999)),
            VariantDraft::new("X-Large", usd(31999)),
        ],
    )
    .unwrap();

    let hoodie = save_product(
        &mut store,
        None,
        ProductDraft {
            name: "Nebula Hoodie".into(),
            is_published: true,
            availability: AvailabilityStatus::InStock,
            ..Default::default()
        },
        vec![VariantDraft::new("Large", usd(18999))],
    )
    .unwrap();

    assert_eq!(
        price_range(&jacket.variants).unwrap().display(),
        "$299.99 - $319.99"
    );

    (
        Storefront::new(store),
        jacket.variants[0].id.clone(),
        hoodie.variants[0].id.clone(),
    )
}

fn fill_flow(flow: &mut CheckoutFlow) {
    flow.set_customer(CustomerDetails {
        email: "mira@kepler.example".into(),
        first_name: "Mira".into(),
        last_name: "Vex".into(),
        phone: Some("+1 555 0100".into()),
    });
    flow.set_shipping_address(Address::new("42 Nebula Ave", "Roswell", "NM", "88201"));
}

#[test]
fn checkout_happy_path() {
    let (mut shop, jacket, hoodie) = seeded_shop();
    assert_eq!(storefront_products(shop.store()).unwrap().len(), 2);

    let cart = shop.open_cart("session-abc").unwrap();
    shop.add_to_cart(&cart.id, &jacket, 1).unwrap();
    shop.add_to_cart(&cart.id, &hoodie, 1).unwrap();
    shop.add_to_cart(&cart.id, &hoodie, 1).unwrap();

    let totals = shop.cart_breakdown(&cart.id).unwrap();
    assert_eq!(totals.total.amount_minor, 74937);

    let mut flow = CheckoutFlow::new(cart.id.clone());
    fill_flow(&mut flow);
    flow.advance().unwrap();
    let payment = shop.authorize_payment(&mut flow).unwrap();
    assert!(payment.token.starts_with("pi_test_"));
    assert_eq!(payment.amount, totals.total);
    flow.advance().unwrap();

    let placed = shop.complete_checkout(&mut flow).unwrap();
    assert_eq!(flow.step, CheckoutStep::Complete);
    assert_eq!(flow.order_id.as_ref(), Some(&placed.order.id));
    assert_eq!(placed.order.total, totals.total);
    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert!(placed.cart_cleared);

    let titles: Vec<_> = placed
        .line_items
        .iter()
        .filter_map(|item| item.title.clone())
        .collect();
    assert!(titles.contains(&"Medium".to_string()));
    assert!(titles.contains(&"Large".to_string()));

    assert!(shop.cart_lines(&cart.id).unwrap().is_empty());
    let stats = shop.order_stats().unwrap();
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.total_revenue.amount_minor, 74937);
    assert_eq!(stats.pending_orders, 1);
}

#[test]
fn unknown_variant_cannot_be_added() {
    let (mut shop, _, _) = seeded_shop();
    let cart = shop.open_cart("session-x").unwrap();
    let err = shop
        .add_to_cart(&cart.id, &VariantId::new("ghost"), 1)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn checkout_on_empty_cart_is_rejected() {
    let (mut shop, _, _) = seeded_shop();
    let cart = shop.open_cart("session-empty").unwrap();
    let mut flow = CheckoutFlow::new(cart.id.clone());
    fill_flow(&mut flow);
    flow.advance().unwrap();
    shop.authorize_payment(&mut flow).unwrap();
    flow.advance().unwrap();

    let writes = shop.store().write_count();
    let err = shop.complete_checkout(&mut flow).unwrap_err();
    assert!(matches!(err, CommerceError::EmptyCart(_)));
    assert_eq!(shop.store().write_count(), writes);
    assert_eq!(flow.step, CheckoutStep::Processing);
}

#[test]
fn status_change_failure_is_not_visible_on_reread() {
    let (mut shop, jacket, _) = seeded_shop();
    let cart = shop.open_cart("session-s").unwrap();
    shop.add_to_cart(&cart.id, &jacket, 1).unwrap();
    let placed = shop
        .place_order(CheckoutRequest {
            cart_id: cart.id.clone(),
            customer: CustomerDetails {
                email: "oort@cloud.example".into(),
                first_name: "Oort".into(),
                last_name: "Cloud".into(),
                phone: None,
            },
            shipping_address: Address::new("1 Rim Rd", "Tucson", "AZ", "85701"),
            billing_address: None,
            notes: None,
        })
        .unwrap();

    shop.store_mut().fail_on(StoreOperation::UpdateOrderStatus);
    let err = shop
        .set_order_status(&placed.order.id, OrderStatus::Completed)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);

    shop.store_mut().clear_failures();
    let reread = shop.store().find_order(&placed.order.id).unwrap().unwrap();
    assert_eq!(reread.status, OrderStatus::Pending);

    let updated = shop
        .set_order_status(&placed.order.id, OrderStatus::Completed)
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Completed);
    assert_eq!(updated.total, placed.order.total);
}

#[test]
fn guarded_storefront_blocks_illegal_moves() {
    let (shop, jacket, _) = seeded_shop();
    let mut shop = shop
        .with_transition_policy(TransitionPolicy::Guarded)
        .with_payment_gateway(StubPaymentGateway);
    let cart = shop.open_cart("session-g").unwrap();
    shop.add_to_cart(&cart.id, &jacket, 1).unwrap();

    let mut flow = CheckoutFlow::new(cart.id.clone());
    fill_flow(&mut flow);
    flow.advance().unwrap();
    shop.authorize_payment(&mut flow).unwrap();
    flow.advance().unwrap();
    let placed = shop.complete_checkout(&mut flow).unwrap();

    let err = shop
        .set_order_status(&placed.order.id, OrderStatus::Refunded)
        .unwrap_err();
    assert!(matches!(err, CommerceError::InvalidStatusTransition { .. }));

    shop.set_order_status(&placed.order.id, OrderStatus::Processing)
        .unwrap();
    shop.set_order_status(&placed.order.id, OrderStatus::Completed)
        .unwrap();
    let refunded = shop
        .set_order_status(&placed.order.id, OrderStatus::Refunded)
        .unwrap();
    assert_eq!(refunded.status, OrderStatus::Refunded);
}
