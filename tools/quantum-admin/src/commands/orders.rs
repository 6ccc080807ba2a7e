//! Order back-office commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use serde::Serialize;

use quantum_commerce::admin::search_orders;
use quantum_commerce::checkout::{LineItem, Order, OrderStatus};
use quantum_commerce::store::CatalogOrderStore;
use quantum_commerce::{CommerceError, OrderId};

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::{short_id, status_badge};

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command {
        OrdersCommand::List { status, all, limit } => {
            list_orders(status.as_deref(), all, limit, ctx).await
        }
        OrdersCommand::Stats => show_stats(ctx).await,
        OrdersCommand::Search { query, status } => {
            search(&query, status.as_deref(), ctx).await
        }
        OrdersCommand::Show { id } => show_order(&id, ctx).await,
        OrdersCommand::SetStatus { id, status, yes } => set_status(&id, &status, yes, ctx).await,
    }
}

fn parse_status(value: &str) -> Result<OrderStatus> {
    match OrderStatus::parse(value) {
        Some(status) => Ok(status),
        None => {
            let known: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
            bail!(
                "Unknown order status '{}'. Expected one of: {}",
                value,
                known.join(", ")
            )
        }
    }
}

/// Orders for `orders list`. Archived orders only show up with `--all` or
/// an explicit status filter.
fn select_orders(
    orders: &[Order],
    status: Option<OrderStatus>,
    all: bool,
    limit: Option<usize>,
) -> Vec<&Order> {
    let mut shown: Vec<&Order> = search_orders(orders, &[], "", status)
        .into_iter()
        .filter(|o| all || status.is_some() || o.status != OrderStatus::Archived)
        .collect();
    if let Some(limit) = limit {
        shown.truncate(limit);
    }
    shown
}

async fn list_orders(
    status: Option<&str>,
    all: bool,
    limit: Option<usize>,
    ctx: &Context,
) -> Result<()> {
    let status = status.map(parse_status).transpose()?;
    let orders = ctx
        .with_storefront("Loading orders...", |shop| shop.orders())
        .await?;

    let shown = select_orders(&orders, status, all, limit);
    print_orders(&shown, ctx);
    Ok(())
}

async fn search(query: &str, status: Option<&str>, ctx: &Context) -> Result<()> {
    let status = status.map(parse_status).transpose()?;
    let (orders, customers) = ctx
        .with_storefront("Searching orders...", |shop| {
            Ok((shop.orders()?, shop.store().list_customers()?))
        })
        .await?;

    let matches = search_orders(&orders, &customers, query, status);
    if matches.is_empty() && !ctx.output.is_json() {
        ctx.output.info(&format!("No orders match '{}'", query));
        return Ok(());
    }
    print_orders(&matches, ctx);
    Ok(())
}

fn print_orders(orders: &[&Order], ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return;
    }

    ctx.output.header(&format!("Orders ({})", orders.len()));
    let widths = [10, 10, 12, 12, 18];
    ctx.output
        .table_row(&["ORDER", "CUSTOMER", "STATUS", "TOTAL", "PLACED"], &widths);
    for order in orders {
        let id = short_id(order.id.as_str());
        let customer = short_id(order.customer_id.as_str());
        let status = status_badge(order.status);
        let total = order.total.display();
        let placed = order.created_at.format("%Y-%m-%d %H:%M").to_string();
        ctx.output
            .table_row(&[&id, &customer, &status, &total, &placed], &widths);
    }
}

async fn show_stats(ctx: &Context) -> Result<()> {
    let stats = ctx
        .with_storefront("Crunching order numbers...", |shop| shop.order_stats())
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&stats);
        return Ok(());
    }

    ctx.output.header("Orders");
    ctx.output.kv("orders", &stats.total_orders.to_string());
    ctx.output.kv("revenue", &stats.total_revenue.display());
    ctx.output.kv("pending", &stats.pending_orders.to_string());
    ctx.output.kv("customers", &stats.unique_customers.to_string());
    Ok(())
}

#[derive(Serialize)]
struct OrderDetail {
    order: Order,
    line_items: Vec<LineItem>,
}

async fn show_order(id: &str, ctx: &Context) -> Result<()> {
    let order_id = OrderId::new(id);
    let detail = ctx
        .with_storefront("Loading order...", move |shop| {
            let order = shop
                .store()
                .find_order(&order_id)?
                .ok_or_else(|| CommerceError::OrderNotFound(order_id.clone()))?;
            let line_items = shop.store().list_line_items(&order_id)?;
            Ok(OrderDetail { order, line_items })
        })
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&detail);
        return Ok(());
    }

    let order = &detail.order;
    ctx.output.header(&format!("Order {}", order.id));
    ctx.output.kv("status", &status_badge(order.status));
    ctx.output.kv("customer", order.customer_id.as_str());
    ctx.output.kv("placed", &order.created_at.to_rfc3339());
    if let Some(notes) = &order.notes {
        ctx.output.kv("notes", notes);
    }

    ctx.output.header("Items");
    let widths = [28, 14, 5, 12, 12];
    ctx.output
        .table_row(&["ITEM", "SKU", "QTY", "UNIT", "TOTAL"], &widths);
    for item in &detail.line_items {
        let title = item
            .title
            .clone()
            .unwrap_or_else(|| item.variant_id.to_string());
        let sku = item.sku.clone().unwrap_or_default();
        let quantity = item.quantity.to_string();
        let unit = item.unit_price.display();
        let total = item.total_price.display();
        ctx.output
            .table_row(&[&title, &sku, &quantity, &unit, &total], &widths);
    }

    ctx.output.header("Totals");
    ctx.output.kv("subtotal", &order.subtotal.display());
    ctx.output.kv("shipping", &order.shipping.display());
    ctx.output.kv("tax", &order.tax.display());
    ctx.output.kv("total", &order.total.display());
    Ok(())
}

async fn set_status(id: &str, status: &str, yes: bool, ctx: &Context) -> Result<()> {
    let new_status = parse_status(status)?;
    let order_id = OrderId::new(id);

    let lookup_id = order_id.clone();
    let order = ctx
        .with_storefront("Loading order...", move |shop| {
            shop.store()
                .find_order(&lookup_id)?
                .ok_or(CommerceError::OrderNotFound(lookup_id))
        })
        .await?;

    if order.status == new_status {
        ctx.output
            .info(&format!("Order {} is already {}", order.id, new_status.display_name()));
        return Ok(());
    }

    let policy = ctx.config.orders.status_transitions;
    if !policy.allows(order.status, new_status) {
        let allowed: Vec<&str> = order
            .status
            .guarded_successors()
            .iter()
            .map(|s| s.as_str())
            .collect();
        bail!(
            "Cannot move order {} from {} to {} (allowed: {})",
            order.id,
            order.status,
            new_status,
            if allowed.is_empty() {
                "none".to_string()
            } else {
                allowed.join(", ")
            }
        );
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Change order {} from {} to {}?",
                order.id,
                order.status.display_name(),
                new_status.display_name()
            ))
            .default(true)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            ctx.output.info("Status change cancelled");
            return Ok(());
        }
    }

    let updated = ctx
        .with_storefront("Updating order...", move |shop| {
            shop.set_order_status(&order_id, new_status)
        })
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&updated);
        return Ok(());
    }

    ctx.output.success(&format!(
        "Order {} is now {}",
        updated.id,
        status_badge(updated.status)
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quantum_commerce::cart::PriceBreakdown;
    use quantum_commerce::{Currency, CustomerId, Money};

    fn order(id: &str, status: OrderStatus) -> Order {
        let usd = Money::new(1000, Currency::USD);
        let breakdown = PriceBreakdown {
            subtotal: usd,
            shipping: Money::zero(Currency::USD),
            tax: Money::zero(Currency::USD),
            total: usd,
        };
        let mut order = Order::new(CustomerId::new("cust-1"), None, &breakdown, None, Utc::now());
        order.id = OrderId::new(id);
        order.status = status;
        order
    }

    #[test]
    fn test_parse_status_accepts_loose_spellings() {
        assert_eq!(parse_status("on-hold").unwrap(), OrderStatus::OnHold);
        assert_eq!(parse_status("completed").unwrap(), OrderStatus::Completed);
    }

    #[test]
    fn test_parse_status_lists_known_values() {
        let err = parse_status("shipped").unwrap_err().to_string();
        assert!(err.contains("shipped"));
        assert!(err.contains("ON_HOLD"));
    }

    #[test]
    fn test_select_orders_hides_archived_by_default() {
        let orders = vec![
            order("o-1", OrderStatus::Pending),
            order("o-2", OrderStatus::Archived),
            order("o-3", OrderStatus::Completed),
        ];

        let ids = |shown: Vec<&Order>| -> Vec<String> {
            shown.iter().map(|o| o.id.to_string()).collect()
        };
        assert_eq!(ids(select_orders(&orders, None, false, None)), vec!["o-1", "o-3"]);
        assert_eq!(ids(select_orders(&orders, None, true, None)).len(), 3);
        assert_eq!(
            ids(select_orders(&orders, Some(OrderStatus::Archived), false, None)),
            vec!["o-2"]
        );
        assert_eq!(ids(select_orders(&orders, None, true, Some(1))), vec!["o-1"]);
    }
}
