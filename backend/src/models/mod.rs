//! Domain models handed to (and received from) the catalog API.
//!
//! - [`Product`] - one catalog product with its variations and images
//! - [`Variation`] - one sellable size/color combination with its own stock
//! - [`Image`] - product image reference
//! - [`Size`] - a measurement or a size label
//! - [`Category`] - nationality / category / subcategory triplet

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sheet::format_number;

/// Separator between the three parts of the category cell.
pub const CATEGORY_SEPARATOR: &str = ">";

// =============================================================================
// Category
// =============================================================================

/// Category triplet as chosen in the seller center.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub nationality: String,
    pub category: String,
    pub sub_category: String,
}

impl Category {
    /// Parse `Nacional > Roupas > Camisetas`.
    ///
    /// Returns `None` unless there are exactly three non-empty parts.
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split(CATEGORY_SEPARATOR).map(str::trim).collect();
        match parts.as_slice() {
            [nationality, category, sub_category]
                if !nationality.is_empty() && !category.is_empty() && !sub_category.is_empty() =>
            {
                Some(Self {
                    nationality: nationality.to_string(),
                    category: category.to_string(),
                    sub_category: sub_category.to_string(),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {sep} {} {sep} {}",
            self.nationality,
            self.category,
            self.sub_category,
            sep = CATEGORY_SEPARATOR
        )
    }
}

// =============================================================================
// Size
// =============================================================================

/// Variation size: a measurement (shoe number, ml, g) or a label (P, M, G).
///
/// The sheet has one text cell for both, so a label that reads as a number
/// (`Label("38")`) comes back from a sheet as `Measure(38.0)`. Both serialize
/// to the same cell text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Size {
    Measure(f64),
    Label(String),
}

impl Size {
    /// Plain numbers become measurements, anything else a label.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Size::Measure(n),
            _ => Size::Label(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Size::Measure(n) => f.write_str(&format_number(*n)),
            Size::Label(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// Variation
// =============================================================================

/// One sellable configuration of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub size: Size,
    pub stock: u32,
    pub color: String,
    /// Only present when true.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gluten_free: Option<bool>,
    /// Only present when true.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lactose_free: Option<bool>,
}

impl Variation {
    pub fn new(size: Size, stock: u32, color: impl Into<String>) -> Self {
        Self {
            size,
            stock,
            color: color.into(),
            gluten_free: None,
            lactose_free: None,
        }
    }
}

// =============================================================================
// Image
// =============================================================================

/// Product image. `id` stays empty until the API stores the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub alt_text: String,
    pub url: String,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product with all of its variations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Persisted identifier; absent for products not yet created.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub grouper_id: String,
    #[serde(flatten)]
    pub category: Category,
    pub name: String,
    pub brand: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ean: Option<String>,
    pub sku: String,
    pub gender: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub discount_price: Option<f64>,
    pub height: f64,
    pub width: f64,
    pub length: f64,
    pub weight: f64,
    pub variations: Vec<Variation>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Product {
    /// Sum of stock over all variations.
    pub fn total_stock(&self) -> u64 {
        self.variations.iter().map(|v| v.stock as u64).sum()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        let category = Category::parse(" Nacional > Roupas >Camisetas ").unwrap();
        assert_eq!(category.nationality, "Nacional");
        assert_eq!(category.category, "Roupas");
        assert_eq!(category.sub_category, "Camisetas");
        assert_eq!(category.to_string(), "Nacional > Roupas > Camisetas");
    }

    #[test]
    fn test_category_parse_rejects_partial() {
        assert!(Category::parse("Nacional > Roupas").is_none());
        assert!(Category::parse("Nacional >  > Camisetas").is_none());
        assert!(Category::parse("a > b > c > d").is_none());
        assert!(Category::parse("").is_none());
    }

    #[test]
    fn test_size_parse() {
        assert_eq!(Size::parse("42"), Size::Measure(42.0));
        assert_eq!(Size::parse("P"), Size::Label("P".into()));
        assert_eq!(Size::Measure(38.0).to_string(), "38");
        assert_eq!(Size::Label("GG".into()).to_string(), "GG");
    }

    #[test]
    fn test_variation_flags_omitted() {
        let variation = Variation::new(Size::Label("M".into()), 3, "azul");
        let json = serde_json::to_value(&variation).unwrap();
        assert_eq!(json["size"], "M");
        assert_eq!(json["stock"], 3);
        assert!(json.get("glutenFree").is_none());
        assert!(json.get("lactoseFree").is_none());
    }

    #[test]
    fn test_product_serialization_shape() {
        let product = Product {
            id: None,
            grouper_id: "G1".into(),
            category: Category::parse("Nacional > Roupas > Camisetas").unwrap(),
            name: "Shirt".into(),
            brand: "Acme".into(),
            description: "Cotton shirt".into(),
            ean: None,
            sku: "SH-1".into(),
            gender: "Unissex".into(),
            price: 50.0,
            discount_price: None,
            height: 5.0,
            width: 20.0,
            length: 30.0,
            weight: 0.3,
            variations: vec![Variation::new(Size::Label("P".into()), 5, "blue")],
            images: vec![],
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["grouperId"], "G1");
        assert_eq!(json["subCategory"], "Camisetas");
        assert!(json.get("id").is_none());
        assert!(json.get("discountPrice").is_none());
        assert_eq!(product.total_stock(), 5);

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, product);
    }
}
