//! Product and variant types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::Money;

/// Stock availability shown on the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    #[default]
    InStock,
    OutOfStock,
    Discontinued,
}

impl AvailabilityStatus {
    pub const ALL: [AvailabilityStatus; 3] = [
        AvailabilityStatus::InStock,
        AvailabilityStatus::OutOfStock,
        AvailabilityStatus::Discontinued,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::InStock => "IN_STOCK",
            AvailabilityStatus::OutOfStock => "OUT_OF_STOCK",
            AvailabilityStatus::Discontinued => "DISCONTINUED",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AvailabilityStatus::InStock => "In stock",
            AvailabilityStatus::OutOfStock => "Out of stock",
            AvailabilityStatus::Discontinued => "Discontinued",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// A catalog product. Prices live on its variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Drafts are hidden from the storefront.
    pub is_published: bool,
    pub availability: AvailabilityStatus,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether shoppers can see and buy this product.
    pub fn is_visible(&self) -> bool {
        self.is_published && self.availability == AvailabilityStatus::InStock
    }
}

/// A purchasable variant of a product (size, colour, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub price: Money,
    /// Original price shown struck through.
    pub compare_at_price: Option<Money>,
    pub taxable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductVariant {
    /// Whether the variant is shown as discounted.
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .map(|compare| compare.amount_minor > self.price.amount_minor)
            .unwrap_or(false)
    }
}

/// Editable product fields, as submitted from the back office.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub availability: AvailabilityStatus,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::validation("product name is required"));
        }
        Ok(())
    }

    /// Build a new product record from this draft.
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            description: non_empty(self.description),
            image_url: non_empty(self.image_url),
            is_published: self.is_published,
            availability: self.availability,
            tags: normalize_tags(self.tags),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply this draft over an existing product, keeping its id and creation time.
    pub fn apply_to(self, existing: &Product, now: DateTime<Utc>) -> Product {
        let mut product = self.into_product(existing.id.clone(), now);
        product.created_at = existing.created_at;
        product
    }
}

/// Editable variant fields. `id` is set when editing an existing variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantDraft {
    pub id: Option<VariantId>,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    #[serde(default = "default_taxable")]
    pub taxable: bool,
}

fn default_taxable() -> bool {
    true
}

impl VariantDraft {
    /// A new, taxable variant with just a title and price.
    pub fn new(title: impl Into<String>, price: Money) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            image_url: None,
            sku: None,
            price,
            compare_at_price: None,
            taxable: true,
        }
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.title.trim().is_empty() {
            return Err(CommerceError::validation("variant title is required"));
        }
        if self.price.is_negative() {
            return Err(CommerceError::NegativePrice(self.price));
        }
        if let Some(compare) = self.compare_at_price {
            if compare.is_negative() {
                return Err(CommerceError::NegativePrice(compare));
            }
            if compare.currency != self.price.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: self.price.currency,
                    got: compare.currency,
                });
            }
        }
        Ok(())
    }

    pub fn into_variant(
        self,
        id: VariantId,
        product_id: ProductId,
        now: DateTime<Utc>,
    ) -> ProductVariant {
        ProductVariant {
            id,
            product_id,
            title: Some(self.title.trim().to_string()),
            description: non_empty(self.description),
            image_url: non_empty(self.image_url),
            sku: non_empty(self.sku),
            price: self.price,
            compare_at_price: self.compare_at_price,
            taxable: self.taxable,
            created_at: now,
            updated_at: now,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Split the comma-separated tag column used by the tabular API.
pub fn parse_tags(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(',').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_availability_parse() {
        assert_eq!(
            AvailabilityStatus::parse("out_of_stock"),
            Some(AvailabilityStatus::OutOfStock)
        );
        assert_eq!(AvailabilityStatus::parse("SOLD"), None);
        assert_eq!(
            serde_json::to_string(&AvailabilityStatus::InStock).unwrap(),
            "\"IN_STOCK\""
        );
    }

    #[test]
    fn test_product_draft_requires_name() {
        let draft = ProductDraft {
            name: "   ".into(),
            ..Default::default()
        };
        assert!(matches!(draft.validate(), Err(CommerceError::Validation(_))));
    }

    #[test]
    fn test_variant_draft_validation() {
        let ok = VariantDraft::new("Nebula Hoodie / M", Money::new(4999, Currency::USD));
        assert!(ok.validate().is_ok());
        assert!(ok.taxable);

        let untitled = VariantDraft::new("", Money::new(4999, Currency::USD));
        assert!(untitled.validate().is_err());

        let negative = VariantDraft::new("Tee", Money::new(-1, Currency::USD));
        assert!(matches!(
            negative.validate(),
            Err(CommerceError::NegativePrice(_))
        ));

        let mut bad_compare = VariantDraft::new("Tee", Money::new(100, Currency::USD));
        bad_compare.compare_at_price = Some(Money::new(-5, Currency::USD));
        assert!(bad_compare.validate().is_err());
    }

    #[test]
    fn test_draft_trims_and_dedupes() {
        let now = Utc::now();
        let product = ProductDraft {
            name: " Zorbian Tee ".into(),
            description: Some("  ".into()),
            tags: vec!["alien".into(), " alien".into(), "".into(), "tee".into()],
            ..Default::default()
        }
        .into_product(ProductId::new("p1"), now);

        assert_eq!(product.name, "Zorbian Tee");
        assert_eq!(product.description, None);
        assert_eq!(product.tags, vec!["alien".to_string(), "tee".to_string()]);
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("space, glow ,,space"), vec!["space", "glow"]);
        assert!(parse_tags("").is_empty());
    }
}
