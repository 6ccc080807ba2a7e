//! Price a basket without touching any cart.

use std::str::FromStr;

use anyhow::{anyhow, bail, Context as _, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use quantum_commerce::cart::{compute_breakdown, CartLine, PriceBreakdown, MAX_QUANTITY_PER_LINE};
use quantum_commerce::catalog;
use quantum_commerce::{CartId, Money, VariantId};

use super::QuoteArgs;
use crate::context::Context;

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let items = args
        .items
        .iter()
        .map(|raw| parse_item(raw))
        .collect::<Result<Vec<_>>>()?;

    let quote = if args.offline {
        offline_quote(&items, ctx)?
    } else {
        catalog_quote(items, ctx).await?
    };

    print_quote(&quote, ctx);
    Ok(())
}

/// `KEY:QTY` as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuoteItem {
    key: String,
    quantity: i64,
}

fn parse_item(raw: &str) -> Result<QuoteItem> {
    let (key, quantity) = raw
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("Expected ITEM:QTY, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("Missing item before ':' in '{}'", raw);
    }
    let quantity: i64 = quantity
        .trim()
        .parse()
        .with_context(|| format!("Invalid quantity in '{}'", raw))?;
    if quantity <= 0 || quantity > MAX_QUANTITY_PER_LINE {
        bail!(
            "Quantity in '{}' must be between 1 and {}",
            raw,
            MAX_QUANTITY_PER_LINE
        );
    }
    Ok(QuoteItem {
        key: key.to_string(),
        quantity,
    })
}

#[derive(Debug, Serialize)]
struct Quote {
    lines: Vec<QuoteLine>,
    breakdown: PriceBreakdown,
}

#[derive(Debug, Serialize)]
struct QuoteLine {
    item: String,
    quantity: i64,
    unit_price: Money,
    line_total: Money,
}

fn quote_cart() -> CartId {
    CartId::new("quote")
}

/// Repeated keys are merged into one line, the way a cart would.
fn merge_lines(lines: Vec<(String, CartLine)>) -> Vec<(String, CartLine)> {
    let mut merged: Vec<(String, CartLine)> = Vec::with_capacity(lines.len());
    for (label, line) in lines {
        match merged.iter_mut().find(|(_, l)| l.variant_id == line.variant_id) {
            Some((_, existing)) => {
                existing.quantity += line.quantity;
                existing.unit_price = line.unit_price;
            }
            None => merged.push((label, line)),
        }
    }
    merged
}

fn build_quote(lines: Vec<(String, CartLine)>, breakdown: PriceBreakdown) -> Result<Quote> {
    let lines = lines
        .into_iter()
        .map(|(item, line)| -> Result<QuoteLine> {
            Ok(QuoteLine {
                line_total: line.line_total()?,
                item,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Quote { lines, breakdown })
}

/// Treat each key as a unit price in the configured currency.
fn offline_quote(items: &[QuoteItem], ctx: &Context) -> Result<Quote> {
    let pricing = &ctx.config.pricing;
    let currency = pricing.currency()?;

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let price = Decimal::from_str(&item.key)
            .with_context(|| format!("'{}' is not a price", item.key))?;
        let unit_price = Money::from_decimal(price, currency)?;
        if unit_price.is_negative() {
            bail!("Price '{}' is negative", item.key);
        }
        let line = CartLine::new(
            quote_cart(),
            VariantId::new(item.key.clone()),
            item.quantity,
            unit_price,
        );
        lines.push((unit_price.display(), line));
    }

    let lines = merge_lines(lines);
    let cart_lines: Vec<CartLine> = lines.iter().map(|(_, l)| l.clone()).collect();
    let breakdown = compute_breakdown(
        &cart_lines,
        &pricing.shipping_policy()?,
        &pricing.tax_policy()?,
    )?;
    build_quote(lines, breakdown)
}

/// Look each key up as a variant and use its catalog price.
async fn catalog_quote(items: Vec<QuoteItem>, ctx: &Context) -> Result<Quote> {
    let (lines, breakdown) = ctx
        .with_storefront("Pricing items...", move |shop| {
            let mut lines = Vec::with_capacity(items.len());
            for item in &items {
                let variant = catalog::find_variant(shop.store(), &VariantId::new(item.key.clone()))?;
                let label = variant.sku.clone().unwrap_or_else(|| item.key.clone());
                let line = CartLine::new(quote_cart(), variant.id, item.quantity, variant.price);
                lines.push((label, line));
            }
            let lines = merge_lines(lines);
            let cart_lines: Vec<CartLine> = lines.iter().map(|(_, l)| l.clone()).collect();
            let breakdown = shop.quote(&cart_lines)?;
            Ok((lines, breakdown))
        })
        .await?;
    build_quote(lines, breakdown)
}

fn print_quote(quote: &Quote, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(quote);
        return;
    }

    ctx.output.header("Quote");
    let widths = [24, 5, 12, 12];
    ctx.output.table_row(&["ITEM", "QTY", "UNIT", "TOTAL"], &widths);
    for line in &quote.lines {
        let quantity = line.quantity.to_string();
        let unit = line.unit_price.display();
        let total = line.line_total.display();
        ctx.output
            .table_row(&[&line.item, &quantity, &unit, &total], &widths);
    }

    ctx.output.info("");
    ctx.output.kv("subtotal", &quote.breakdown.subtotal.display());
    ctx.output.kv("shipping", &quote.breakdown.shipping.display());
    ctx.output.kv("tax", &quote.breakdown.tax.display());
    ctx.output.kv("total", &quote.breakdown.total.display());
}
