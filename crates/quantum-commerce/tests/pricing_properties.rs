//! Properties of the price calculator and cart consolidation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use quantum_commerce::prelude::*;

fn lines_from(cart: &str, items: &[(i64, i64)]) -> Vec<CartLine> {
    items
        .iter()
        .enumerate()
        .map(|(i, &(price, quantity))| {
            CartLine::new(
                CartId::new(cart),
                VariantId::new(format!("v{}", i)),
                quantity,
                Money::new(price, Currency::USD),
            )
        })
        .collect()
}

fn breakdown(lines: &[CartLine], tax_basis_points: i64) -> PriceBreakdown {
    let tax = FlatRateTax {
        rate: Decimal::new(tax_basis_points, 4),
    };
    compute_breakdown(lines, &FlatRateShipping::default(), &tax).unwrap()
}

#[test]
fn prop_total_is_exact_sum_of_parts() {
    proptest!(|(
        items in prop::collection::vec((0i64..=10_000_000, 1i64..=9999), 0..=20),
        tax_basis_points in 0i64..=2500
    )| {
        let lines = lines_from("c1", &items);
        let b = breakdown(&lines, tax_basis_points);
        prop_assert_eq!(
            b.total.amount_minor,
            b.subtotal.amount_minor + b.shipping.amount_minor + b.tax.amount_minor
        );
        prop_assert!(b.tax.amount_minor >= 0);
    });
}

#[test]
fn prop_subtotal_is_linear_over_disjoint_lines() {
    proptest!(|(
        left in prop::collection::vec((0i64..=1_000_000, 1i64..=9999), 0..=10),
        right in prop::collection::vec((0i64..=1_000_000, 1i64..=9999), 0..=10)
    )| {
        let a = lines_from("a", &left);
        let b = lines_from("b", &right);
        let mut both = a.clone();
        both.extend(b.iter().cloned());

        prop_assert_eq!(
            breakdown(&both, 800).subtotal.amount_minor,
            breakdown(&a, 800).subtotal.amount_minor + breakdown(&b, 800).subtotal.amount_minor
        );
    });
}

#[test]
fn prop_repeated_adds_sum_quantities_into_one_line() {
    proptest!(|(quantities in prop::collection::vec(1i64..=100, 1..=30))| {
        let mut store = MemoryStore::new();
        let cart = CartId::new("c1");
        let variant = VariantId::new("v1");
        for &q in &quantities {
            add_to_cart(&mut store, &cart, &variant, q, Money::new(2500, Currency::USD)).unwrap();
        }

        let lines = store.list_cart_lines(&cart).unwrap();
        prop_assert_eq!(lines.len(), 1);
        prop_assert_eq!(lines[0].quantity, quantities.iter().sum::<i64>());
    });
}

#[test]
fn reference_cart_totals() {
    let lines = lines_from("c1", &[(29999, 1), (18999, 2)]);
    let b = breakdown(&lines, 800);
    assert_eq!(b.subtotal.amount_minor, 67997);
    assert_eq!(b.shipping.amount_minor, 1500);
    assert_eq!(b.tax.amount_minor, 5440);
    assert_eq!(b.total.amount_minor, 74937);
}

#[test]
fn add_two_then_three_gives_five() {
    let mut store = MemoryStore::new();
    let cart = CartId::new("c1");
    let v1 = VariantId::new("v1");
    add_to_cart(&mut store, &cart, &v1, 2, Money::new(1000, Currency::USD)).unwrap();
    add_to_cart(&mut store, &cart, &v1, 3, Money::new(1000, Currency::USD)).unwrap();

    let lines = store.list_cart_lines(&cart).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 5);

    set_line_quantity(&mut store, &cart, &v1, 0).unwrap();
    assert_eq!(store.find_cart_line(&cart, &v1).unwrap(), None);
}
