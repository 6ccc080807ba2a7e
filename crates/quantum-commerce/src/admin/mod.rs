//! Back-office operations on orders.

mod reports;
mod status;

pub use reports::{order_stats, search_orders, OrderStats};
pub use status::{set_status, set_status_by_id};
