//! Catalog queries and back-office product editing.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{Product, ProductDraft, ProductVariant, VariantDraft};
use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::Money;
use crate::store::{CatalogOrderStore, ProductScope};

/// Products shoppers can browse: published and in stock, newest first.
pub fn storefront_products<S: CatalogOrderStore + ?Sized>(
    store: &S,
) -> Result<Vec<Product>, CommerceError> {
    let mut products = store.list_products(ProductScope::Storefront)?;
    // Don't trust the backend's filter blindly.
    products.retain(Product::is_visible);
    sort_newest_first(&mut products);
    debug!(count = products.len(), "loaded storefront products");
    Ok(products)
}

/// Every product including drafts, newest first.
pub fn all_products<S: CatalogOrderStore + ?Sized>(
    store: &S,
) -> Result<Vec<Product>, CommerceError> {
    let mut products = store.list_products(ProductScope::All)?;
    sort_newest_first(&mut products);
    Ok(products)
}

/// Variants ordered by ascending price, optionally for one product.
pub fn variants<S: CatalogOrderStore + ?Sized>(
    store: &S,
    product_id: Option<&ProductId>,
) -> Result<Vec<ProductVariant>, CommerceError> {
    let mut variants = store.list_variants(product_id)?;
    if let Some(product_id) = product_id {
        variants.retain(|v| &v.product_id == product_id);
    }
    variants.sort_by_key(|v| v.price.amount_minor);
    Ok(variants)
}

/// Look up a single variant by id.
pub fn find_variant<S: CatalogOrderStore + ?Sized>(
    store: &S,
    variant_id: &VariantId,
) -> Result<ProductVariant, CommerceError> {
    store
        .list_variants(None)?
        .into_iter()
        .find(|v| &v.id == variant_id)
        .ok_or_else(|| CommerceError::VariantNotFound(variant_id.clone()))
}

fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Lowest and highest variant price of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

impl PriceRange {
    /// "$10.00 - $25.00", or a single price when all variants cost the same.
    pub fn display(&self) -> String {
        if self.min == self.max {
            self.min.display()
        } else {
            format!("{} - {}", self.min.display(), self.max.display())
        }
    }
}

/// `None` for a product without variants.
pub fn price_range(variants: &[ProductVariant]) -> Option<PriceRange> {
    let min = variants.iter().map(|v| v.price).min_by_key(|m| m.amount_minor)?;
    let max = variants.iter().map(|v| v.price).max_by_key(|m| m.amount_minor)?;
    Some(PriceRange { min, max })
}

/// Case-insensitive match on name or description. An empty query matches all.
pub fn search_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p
                    .description
                    .as_deref()
                    .map(|d| d.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .collect()
}

/// Headline numbers for the product dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CatalogStats {
    pub total_products: usize,
    pub published_products: usize,
    pub total_variants: usize,
}

pub fn catalog_stats(products: &[Product], variants: &[ProductVariant]) -> CatalogStats {
    CatalogStats {
        total_products: products.len(),
        published_products: products.iter().filter(|p| p.is_published).count(),
        total_variants: variants.len(),
    }
}

/// A product together with its variants, as saved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedProduct {
    pub product: Product,
    pub variants: Vec<ProductVariant>,
}

/// Create a product (when `existing` is `None`) or update one, along with its
/// variants. Drafts carrying an `id` update that variant; the rest are created.
///
/// All drafts are validated before anything is written.
pub fn save_product<S: CatalogOrderStore + ?Sized>(
    store: &mut S,
    existing: Option<&ProductId>,
    draft: ProductDraft,
    variant_drafts: Vec<VariantDraft>,
) -> Result<SavedProduct, CommerceError> {
    draft.validate()?;
    if variant_drafts.is_empty() {
        return Err(CommerceError::validation(
            "a product needs at least one variant",
        ));
    }
    for variant in &variant_drafts {
        variant.validate()?;
    }

    let now = Utc::now();
    let product = match existing {
        None => store.create_product(&draft.into_product(ProductId::generate(), now))?,
        Some(id) => {
            let current = store
                .list_products(ProductScope::All)?
                .into_iter()
                .find(|p| &p.id == id)
                .ok_or_else(|| CommerceError::ProductNotFound(id.clone()))?;
            store
                .update_product(&draft.apply_to(&current, now))?
                .ok_or_else(|| CommerceError::ProductNotFound(id.clone()))?
        }
    };

    let current_variants = match existing {
        Some(id) => store.list_variants(Some(id))?,
        None => Vec::new(),
    };

    let mut saved = Vec::with_capacity(variant_drafts.len());
    for variant_draft in variant_drafts {
        let variant = match variant_draft.id.clone() {
            Some(id) => {
                let created_at = current_variants
                    .iter()
                    .find(|v| v.id == id)
                    .map(|v| v.created_at)
                    .ok_or_else(|| CommerceError::VariantNotFound(id.clone()))?;
                let mut variant = variant_draft.into_variant(id.clone(), product.id.clone(), now);
                variant.created_at = created_at;
                store
                    .update_variant(&variant)?
                    .ok_or(CommerceError::VariantNotFound(id))?
            }
            None => store.create_variant(&variant_draft.into_variant(
                VariantId::generate(),
                product.id.clone(),
                now,
            ))?,
        };
        saved.push(variant);
    }

    info!(
        product_id = %product.id,
        variants = saved.len(),
        created = existing.is_none(),
        "saved product"
    );

    Ok(SavedProduct {
        product,
        variants: saved,
    })
}
