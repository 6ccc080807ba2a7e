//! Catalog commands.

use anyhow::Result;
use serde::Serialize;

use quantum_commerce::catalog::{
    self, price_range, search_products, AvailabilityStatus, PriceRange, Product, ProductVariant,
};

use super::{ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::{availability_badge, short_id};

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ProductsCommand::List { all } => list_products(all, ctx).await,
        ProductsCommand::Stats => show_stats(ctx).await,
        ProductsCommand::Search { query } => search(&query, ctx).await,
    }
}

/// One row of the product table.
#[derive(Debug, Serialize)]
struct ProductSummary {
    id: String,
    name: String,
    published: bool,
    availability: AvailabilityStatus,
    variants: usize,
    price_range: Option<PriceRange>,
}

fn summarize(products: &[&Product], variants: &[ProductVariant]) -> Vec<ProductSummary> {
    products
        .iter()
        .map(|product| {
            let own: Vec<ProductVariant> = variants
                .iter()
                .filter(|v| v.product_id == product.id)
                .cloned()
                .collect();
            ProductSummary {
                id: product.id.to_string(),
                name: product.name.clone(),
                published: product.is_published,
                availability: product.availability,
                variants: own.len(),
                price_range: price_range(&own),
            }
        })
        .collect()
}

async fn list_products(all: bool, ctx: &Context) -> Result<()> {
    let (products, variants) = ctx
        .with_storefront("Loading catalog...", move |shop| {
            let products = if all {
                catalog::all_products(shop.store())?
            } else {
                shop.products()?
            };
            let variants = catalog::variants(shop.store(), None)?;
            Ok((products, variants))
        })
        .await?;

    let refs: Vec<&Product> = products.iter().collect();
    print_products(&summarize(&refs, &variants), ctx);
    Ok(())
}

async fn search(query: &str, ctx: &Context) -> Result<()> {
    let (products, variants) = ctx
        .with_storefront("Searching catalog...", |shop| {
            let products = catalog::all_products(shop.store())?;
            let variants = catalog::variants(shop.store(), None)?;
            Ok((products, variants))
        })
        .await?;

    let matches = search_products(&products, query);
    if matches.is_empty() && !ctx.output.is_json() {
        ctx.output.info(&format!("No products match '{}'", query));
        return Ok(());
    }
    print_products(&summarize(&matches, &variants), ctx);
    Ok(())
}

fn print_products(rows: &[ProductSummary], ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return;
    }

    ctx.output.header(&format!("Products ({})", rows.len()));
    let widths = [10, 28, 10, 14, 9, 20];
    ctx.output.table_row(
        &["ID", "NAME", "PUBLISHED", "AVAILABILITY", "VARIANTS", "PRICE"],
        &widths,
    );
    for row in rows {
        let id = short_id(&row.id);
        let published = if row.published { "yes" } else { "no" };
        let availability = availability_badge(row.availability);
        let variants = row.variants.to_string();
        let price = row
            .price_range
            .map(|r| r.display())
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[&id, &row.name, published, &availability, &variants, &price],
            &widths,
        );
    }
}

async fn show_stats(ctx: &Context) -> Result<()> {
    let stats = ctx
        .with_storefront("Counting catalog...", |shop| shop.catalog_stats())
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&stats);
        return Ok(());
    }

    ctx.output.header("Catalog");
    ctx.output.kv("products", &stats.total_products.to_string());
    ctx.output.kv("published", &stats.published_products.to_string());
    ctx.output.kv("variants", &stats.total_variants.to_string());
    Ok(())
}
