//! Checkout module.
//!
//! Customer details, addresses, the payment stub, order placement and the
//! order status model.

mod address;
mod customer;
mod flow;
mod order;
mod payment;
mod placement;

pub use address::{Address, AddressKind, OrderAddress};
pub use customer::{Customer, CustomerDetails};
pub use flow::{CheckoutFlow, CheckoutStep};
pub use order::{LineItem, Order, OrderStatus, TransitionPolicy};
pub use payment::{PaymentConfirmation, PaymentGateway, StubPaymentGateway};
pub use placement::{place_order, CheckoutRequest, PartialOrder, PlacedOrder, PlacementStep};
