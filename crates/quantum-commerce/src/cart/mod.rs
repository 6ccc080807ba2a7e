//! Shopping cart module.
//!
//! Cart lines, line consolidation, and the price calculator.

mod consolidation;
mod line;
mod pricing;

pub use consolidation::{add_to_cart, cart_lines, open_cart, set_line_quantity, MAX_QUANTITY_PER_LINE};
pub use line::{item_count, Cart, CartLine, CartStatus};
pub use pricing::{
    compute_breakdown, FlatRateShipping, FlatRateTax, PriceBreakdown, PricingConfig,
    ShippingPolicy, TaxPolicy,
};
