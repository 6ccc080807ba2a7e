//! Storefront operations driven through the tabular store, checking what goes
//! over the wire.

use serde_json::{json, Value};

use quantum_commerce::checkout::PlacementStep;
use quantum_commerce::prelude::*;
use quantum_data::{DataError, RecordingTransport, TabularClient, TabularStore};

fn shop() -> Storefront<TabularStore<RecordingTransport>> {
    let client = TabularClient::new(
        RecordingTransport::new(),
        "https://api.example.com",
        "tenant-1",
    );
    Storefront::new(TabularStore::new(client))
}

fn wire(shop: &Storefront<TabularStore<RecordingTransport>>) -> &RecordingTransport {
    shop.store().client().transport()
}

fn variant_row(id: &str, price: f64) -> Value {
    json!({
        "id": id,
        "product_id": "p1",
        "title": format!("Size {}", id),
        "sku": format!("SKU-{}", id),
        "price": price,
        "taxable": true,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
}

fn request() -> CheckoutRequest {
    CheckoutRequest {
        cart_id: CartId::new("c1"),
        customer: CustomerDetails {
            email: "mira@kepler.example".into(),
            first_name: "Mira".into(),
            last_name: "Vex".into(),
            phone: None,
        },
        shipping_address: Address::new("42 Nebula Ave", "Roswell", "NM", "88201"),
        billing_address: None,
        notes: Some("leave at the airlock".into()),
    }
}

fn queue_cart_and_catalog(transport: &RecordingTransport) {
    transport
        .push_rows(vec![
            json!({"cart_id": "c1", "variant_id": "v1", "quantity": 1, "unit_price": 299.99}),
            json!({"cart_id": "c1", "variant_id": "v2", "quantity": 2, "unit_price": 189.99}),
        ])
        .push_rows(vec![variant_row("v2", 189.99), variant_row("v1", 299.99)]);
}

#[test]
fn repeated_add_selects_then_updates() {
    let mut shop = shop();
    wire(&shop)
        .push_rows(vec![
            json!({"cart_id": "c1", "variant_id": "v1", "quantity": 2, "unit_price": 10.0}),
        ])
        .push_affected(1);

    let line = add_to_cart(
        shop.store_mut(),
        &CartId::new("c1"),
        &VariantId::new("v1"),
        3,
        Money::new(1000, Currency::USD),
    )
    .unwrap();
    assert_eq!(line.quantity, 5);

    let bodies = wire(&shop).bodies();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0]["operation"], "select");
    assert_eq!(bodies[1]["operation"], "update");
    assert_eq!(bodies[1]["data"][0]["quantity"], 5);
    assert_eq!(
        bodies[1]["where_conditions"],
        json!([
            {"column": "cart_id", "op": "eq", "value": "c1"},
            {"column": "variant_id", "op": "eq", "value": "v1"}
        ])
    );
}

#[test]
fn first_add_inserts_with_unit_price() {
    let mut shop = shop();
    wire(&shop).push_rows(vec![]).push_affected(1);

    add_to_cart(
        shop.store_mut(),
        &CartId::new("c1"),
        &VariantId::new("v1"),
        1,
        Money::new(29999, Currency::USD),
    )
    .unwrap();

    let bodies = wire(&shop).bodies();
    assert_eq!(bodies[1]["operation"], "insert");
    assert_eq!(
        bodies[1]["data"],
        json!([{"cart_id": "c1", "variant_id": "v1", "quantity": 1, "unit_price": 299.99}])
    );
}

#[test]
fn zero_quantity_deletes_line() {
    let mut shop = shop();
    let removed = set_line_quantity(
        shop.store_mut(),
        &CartId::new("c1"),
        &VariantId::new("v1"),
        0,
    )
    .unwrap();
    assert_eq!(removed, None);

    let bodies = wire(&shop).bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["operation"], "delete");
    assert_eq!(bodies[0]["table"], "cart_items");
}

#[test]
fn placement_writes_in_order() {
    let mut shop = shop();
    queue_cart_and_catalog(wire(&shop));

    let placed = shop.place_order(request()).unwrap();
    assert_eq!(placed.order.subtotal.amount_minor, 67997);
    assert_eq!(placed.order.total.amount_minor, 74937);
    assert_eq!(placed.line_items.len(), 2);
    assert!(placed.cart_cleared);

    let bodies = wire(&shop).bodies();
    let steps: Vec<(String, String)> = bodies
        .iter()
        .map(|b| {
            (
                b["operation"].as_str().unwrap_or_default().to_string(),
                b["table"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    assert_eq!(
        steps,
        vec![
            ("select".to_string(), "cart_items".to_string()),
            ("select".to_string(), "product_variants".to_string()),
            ("insert".to_string(), "customers".to_string()),
            ("insert".to_string(), "orders".to_string()),
            ("insert".to_string(), "line_items".to_string()),
            ("insert".to_string(), "order_addresses".to_string()),
            ("delete".to_string(), "cart_items".to_string()),
        ]
    );

    let order = &bodies[3]["data"][0];
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["currency"], "USD");
    assert_eq!(order["total_price"], json!(749.37));
    assert_eq!(order["shipping_price"], json!(15.0));
    assert_eq!(order["notes"], "leave at the airlock");

    let items = bodies[4]["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["sku"], "SKU-v1");

    assert_eq!(bodies[5]["data"][0]["type"], "SHIPPING");
}

#[test]
fn line_item_failure_reports_partial_order() {
    let mut shop = shop();
    queue_cart_and_catalog(wire(&shop));
    wire(&shop)
        .push_affected(1)
        .push_affected(1)
        .push_error(DataError::Http {
            status: 503,
            message: "maintenance".into(),
        });

    let err = shop.place_order(request()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PartialOrder);
    let CommerceError::PartialOrder(partial) = err else {
        panic!("expected a partial order");
    };
    assert_eq!(partial.failed_step, PlacementStep::LineItems);
    assert_eq!(
        partial.completed,
        vec![PlacementStep::Customer, PlacementStep::Order]
    );
    assert!(matches!(partial.source, StoreError::Unavailable(_)));

    // Nothing after the failure was attempted.
    assert_eq!(wire(&shop).requests().len(), 5);
}

#[test]
fn rejected_customer_insert_is_persistence_error() {
    let mut shop = shop();
    queue_cart_and_catalog(wire(&shop));
    wire(&shop).push_raw(quantum_data::RawResponse::new(
        200,
        br#"{"success": false, "error": "duplicate key value violates unique constraint"}"#
            .to_vec(),
    ));

    let err = shop.place_order(request()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert!(matches!(
        err,
        CommerceError::Persistence(StoreError::Rejected(_))
    ));
}

#[test]
fn order_insert_failure_names_the_customer_row() {
    let mut shop = shop();
    queue_cart_and_catalog(wire(&shop));
    wire(&shop).push_affected(1).push_error(DataError::Http {
        status: 503,
        message: "maintenance".into(),
    });

    let err = shop.place_order(request()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PartialOrder);
    let CommerceError::PartialOrder(partial) = err else {
        panic!("expected a partial order");
    };
    assert_eq!(partial.order_id, None);
    assert_eq!(partial.failed_step, PlacementStep::Order);
    assert_eq!(partial.completed, vec![PlacementStep::Customer]);

    let bodies = wire(&shop).bodies();
    assert_eq!(bodies[2]["data"][0]["id"], json!(partial.customer_id.as_str()));
    assert_eq!(wire(&shop).requests().len(), 4);
}
