//! Catalog module.
//!
//! Products, their variants, storefront listings and back-office editing.

mod listing;
mod product;

pub use listing::{
    all_products, catalog_stats, find_variant, price_range, save_product, search_products,
    storefront_products, variants, CatalogStats, PriceRange, SavedProduct,
};
pub use product::{
    parse_tags, AvailabilityStatus, Product, ProductDraft, ProductVariant, VariantDraft,
};
