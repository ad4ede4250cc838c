//! Field validation for import rows, and schema validation for products.
//!
//! # Row validation
//!
//! Each column has a rule in [`FIELD_RULES`]; every rule is a pure predicate
//! over one [`Cell`]. The promotional-price default is a separate step,
//! [`apply_discount_default`], run before validation so the predicates never
//! touch the row.
//!
//! A failing row yields one [`FieldFailure`] per failing field, carrying
//! the grouper id and sheet row number so the caller can render it with
//! [`messages`].
//!
//! # Product validation
//!
//! Assembled products are checked against the catalog API contract
//! (`schemas/product.json`, JSON Schema Draft 7) before hand-off.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine::sheet::{Column, ImportRow};
//! use vitrine::validation::validate_row;
//!
//! let row = ImportRow::new(2).with(Column::Name, "Camiseta");
//! let failures = validate_row(&row).unwrap_err();
//! assert!(!failures.is_empty());
//! ```

pub mod messages;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::models::Category;
use crate::sheet::{Cell, Column, ImportRow};

/// Longest accepted product description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1800;

/// Image slots that must be filled: cover plus one detail image.
pub const REQUIRED_IMAGES: usize = 2;

// =============================================================================
// Predicates
// =============================================================================

/// Not empty and not blank.
pub fn value_defined(value: &Cell) -> bool {
    value.is_defined()
}

/// Present and at most [`DESCRIPTION_MAX_CHARS`] characters.
pub fn description_validate(value: &Cell) -> bool {
    value.is_defined() && value.char_len() <= DESCRIPTION_MAX_CHARS
}

/// Nationality, category and subcategory all present.
pub fn catalogue_validate(value: &Cell) -> bool {
    value
        .as_text()
        .and_then(|raw| Category::parse(&raw))
        .is_some()
}

/// A missing promotional price never blocks an import.
pub fn discount_validate(_value: &Cell) -> bool {
    true
}

/// Cover image and first detail image are both filled.
pub fn images_validate(images: &[Cell]) -> bool {
    images.len() >= REQUIRED_IMAGES && images[..REQUIRED_IMAGES].iter().all(value_defined)
}

/// Present and a non-negative number.
pub fn number_validate(value: &Cell) -> bool {
    value.as_number().is_some_and(|n| n >= 0.0)
}

/// Empty, or a non-negative number.
pub fn optional_number_validate(value: &Cell) -> bool {
    !value.is_defined() || number_validate(value)
}

/// Present and a non-negative whole number.
pub fn stock_validate(value: &Cell) -> bool {
    value.as_stock().is_some()
}

// =============================================================================
// Discount default
// =============================================================================

/// Fill the promotional price with the full price when the row asked for a
/// promotion without typing a value. Rows without the flag are untouched.
pub fn apply_discount_default(row: &mut ImportRow) {
    if row.discount {
        row.discount_price = row.price.clone();
    }
}

// =============================================================================
// Rule registry
// =============================================================================

/// Validation rule attached to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Defined,
    Description,
    Catalogue,
    Number,
    OptionalNumber,
    Stock,
    Discount,
}

impl Rule {
    pub fn check(self, value: &Cell) -> bool {
        match self {
            Rule::Defined => value_defined(value),
            Rule::Description => description_validate(value),
            Rule::Catalogue => catalogue_validate(value),
            Rule::Number => number_validate(value),
            Rule::OptionalNumber => optional_number_validate(value),
            Rule::Stock => stock_validate(value),
            Rule::Discount => discount_validate(value),
        }
    }
}

/// Column rules, in template order. Images are checked as a whole by
/// [`images_validate`].
pub const FIELD_RULES: &[(Column, Rule)] = &[
    (Column::Category, Rule::Catalogue),
    (Column::Name, Rule::Defined),
    (Column::Brand, Rule::Defined),
    (Column::GrouperId, Rule::Defined),
    (Column::Size, Rule::Defined),
    (Column::Color, Rule::Defined),
    (Column::Stock, Rule::Stock),
    (Column::Description, Rule::Description),
    (Column::Sku, Rule::Defined),
    (Column::Price, Rule::Number),
    (Column::DiscountPrice, Rule::Discount),
    (Column::DiscountPrice, Rule::OptionalNumber),
    (Column::Height, Rule::Number),
    (Column::Width, Rule::Number),
    (Column::Length, Rule::Number),
    (Column::Weight, Rule::Number),
    (Column::Gender, Rule::Defined),
];

// =============================================================================
// Failures
// =============================================================================

/// What failed: a single column, or the image slots as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Column(Column),
    Images,
}

impl Field {
    /// Header text shown to the seller.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Column(column) => column.header(),
            Field::Images => "Imagens",
        }
    }
}

/// Failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// The value does not satisfy the field's rule.
    Invalid,
    /// A product-level value differs from the first row of its group.
    Divergent,
}

/// One field failure on one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFailure {
    pub field: Field,
    pub kind: FailureKind,
    pub grouper_id: Option<String>,
    pub row_number: usize,
}

impl FieldFailure {
    pub fn invalid(field: Field, row: &ImportRow) -> Self {
        Self {
            field,
            kind: FailureKind::Invalid,
            grouper_id: row.grouping_key(),
            row_number: row.row_number,
        }
    }

    pub fn divergent(column: Column, row: &ImportRow) -> Self {
        Self {
            field: Field::Column(column),
            kind: FailureKind::Divergent,
            grouper_id: row.grouping_key(),
            row_number: row.row_number,
        }
    }

    pub fn title(&self) -> &'static str {
        messages::template(self.field, self.kind).title
    }

    pub fn message(&self) -> String {
        messages::template(self.field, self.kind).render(
            self.grouper_id.as_deref(),
            self.row_number,
            self.field.label(),
        )
    }
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}

/// Validate one row against every rule.
///
/// # Returns
/// * `Ok(())` if every field passes
/// * `Err(failures)` with one entry per failing field, in template order
pub fn validate_row(row: &ImportRow) -> Result<(), Vec<FieldFailure>> {
    let mut failures: Vec<FieldFailure> = Vec::new();

    for (column, rule) in FIELD_RULES {
        let field = Field::Column(*column);
        if !rule.check(row.cell(*column)) && !failures.iter().any(|f| f.field == field) {
            failures.push(FieldFailure::invalid(field, row));
        }
    }

    if !images_validate(&row.images) {
        failures.push(FieldFailure::invalid(Field::Images, row));
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

// =============================================================================
// Product schema
// =============================================================================

/// Validate a JSON value against a JSON Schema (Draft 7).
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(errors)` with one message per violation
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn product_schema() -> Result<Value, Vec<String>> {
    serde_json::from_str(include_str!("../../schemas/product.json"))
        .map_err(|e| vec![format!("Invalid embedded schema: {}", e)])
}

/// Validate a serialized product against the catalog API contract.
pub fn validate_product(data: &Value) -> Result<(), Vec<String>> {
    let schema = product_schema()?;
    validate(&schema, data)
}

/// Quick check against the product schema.
pub fn is_valid_product(data: &Value) -> bool {
    match product_schema() {
        Ok(schema) => jsonschema::draft7::is_valid(&schema, data),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_row() -> ImportRow {
        ImportRow::new(2)
            .with(Column::Category, "Nacional > Roupas > Camisetas")
            .with(Column::Name, "Shirt")
            .with(Column::Brand, "Acme")
            .with(Column::GrouperId, "G1")
            .with(Column::Size, "P")
            .with(Column::Color, "blue")
            .with(Column::Stock, "5")
            .with(Column::Description, "Cotton shirt")
            .with(Column::Sku, "SH-1")
            .with(Column::Price, "50")
            .with(Column::Height, "5")
            .with(Column::Width, "20")
            .with(Column::Length, "30")
            .with(Column::Weight, "0,3")
            .with(Column::Gender, "Unissex")
            .with(Column::Image1, "a.png")
            .with(Column::Image2, "b.png")
    }

    #[test]
    fn test_value_defined() {
        assert!(value_defined(&Cell::from("x")));
        assert!(value_defined(&Cell::Number(0.0)));
        assert!(!value_defined(&Cell::Empty));
        assert!(!value_defined(&Cell::Text("".into())));
    }

    #[test]
    fn test_description_length_limit() {
        let at_limit = "a".repeat(DESCRIPTION_MAX_CHARS);
        let over_limit = "a".repeat(DESCRIPTION_MAX_CHARS + 1);
        assert!(description_validate(&Cell::from(at_limit)));
        assert!(!description_validate(&Cell::from(over_limit)));
        assert!(!description_validate(&Cell::Empty));
        // Characters, not bytes
        assert!(description_validate(&Cell::from("ç".repeat(DESCRIPTION_MAX_CHARS))));
    }

    #[test]
    fn test_catalogue_validate() {
        assert!(catalogue_validate(&Cell::from("Nacional > Roupas > Camisetas")));
        assert!(!catalogue_validate(&Cell::from("Nacional > Roupas")));
        assert!(!catalogue_validate(&Cell::Empty));
    }

    #[test]
    fn test_images_gate() {
        assert!(!images_validate(&[Cell::from("a.png")]));
        assert!(images_validate(&[Cell::from("a.png"), Cell::from("b.png")]));
        assert!(!images_validate(&[]));
        assert!(!images_validate(&[Cell::Empty, Cell::from("b.png")]));
    }

    #[test]
    fn test_discount_always_passes() {
        assert!(discount_validate(&Cell::Empty));
        assert!(discount_validate(&Cell::from("sim")));
    }

    #[test]
    fn test_discount_default_with_flag() {
        let mut row = complete_row();
        row.discount = true;
        apply_discount_default(&mut row);
        assert_eq!(row.discount_price, Cell::from("50"));
        assert!(validate_row(&row).is_ok());
    }

    #[test]
    fn test_discount_default_without_flag() {
        let mut row = complete_row().with(Column::DiscountPrice, "39,90");
        apply_discount_default(&mut row);
        assert_eq!(row.discount_price, Cell::from("39,90"));

        let mut row = complete_row();
        apply_discount_default(&mut row);
        assert_eq!(row.discount_price, Cell::Empty);
    }

    #[test]
    fn test_complete_row_passes() {
        assert!(validate_row(&complete_row()).is_ok());
    }

    #[test]
    fn test_failures_in_template_order() {
        let row = complete_row()
            .with(Column::Brand, "")
            .with(Column::Stock, "-2")
            .with(Column::Image2, "");
        let failures = validate_row(&row).unwrap_err();
        let fields: Vec<Field> = failures.iter().map(|f| f.field).collect();
        assert_eq!(
            fields,
            vec![Field::Column(Column::Brand), Field::Column(Column::Stock), Field::Images]
        );
        assert!(failures.iter().all(|f| f.kind == FailureKind::Invalid));
        assert!(failures.iter().all(|f| f.row_number == 2));
        assert!(failures.iter().all(|f| f.grouper_id.as_deref() == Some("G1")));
    }

    #[test]
    fn test_missing_grouper_rejected() {
        let row = complete_row().with(Column::GrouperId, "");
        let failures = validate_row(&row).unwrap_err();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, Field::Column(Column::GrouperId));
        assert_eq!(failures[0].grouper_id, None);
    }

    #[test]
    fn test_bad_discount_number_reported_once() {
        let row = complete_row().with(Column::DiscountPrice, "abc");
        let failures = validate_row(&row).unwrap_err();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, Field::Column(Column::DiscountPrice));
    }

    #[test]
    fn test_failure_display() {
        let row = complete_row().with(Column::Name, "");
        let failures = validate_row(&row).unwrap_err();
        let text = failures[0].to_string();
        assert!(text.starts_with("Nome obrigatório"));
        assert!(text.contains("G1"));
        assert!(text.contains("linha 2"));
    }

    #[test]
    fn test_product_schema() {
        let product = json!({
            "grouperId": "G1",
            "nationality": "Nacional",
            "category": "Roupas",
            "subCategory": "Camisetas",
            "name": "Shirt",
            "brand": "Acme",
            "description": "Cotton shirt",
            "sku": "SH-1",
            "gender": "Unissex",
            "price": 50.0,
            "height": 5.0,
            "width": 20.0,
            "length": 30.0,
            "weight": 0.3,
            "variations": [{ "size": "P", "stock": 5, "color": "blue" }],
            "images": [
                { "id": "", "name": "Shirt-0", "altText": "Shirt", "url": "a.png" },
                { "id": "", "name": "Shirt-1", "altText": "Shirt", "url": "b.png" }
            ]
        });
        assert!(validate_product(&product).is_ok());
        assert!(is_valid_product(&product));

        let mut no_variations = product.clone();
        no_variations["variations"] = json!([]);
        assert!(!is_valid_product(&no_variations));

        let mut one_image = product.clone();
        one_image["images"].as_array_mut().unwrap().pop();
        assert!(!is_valid_product(&one_image));

        let mut negative_stock = product;
        negative_stock["variations"][0]["stock"] = json!(-1);
        let errors = validate_product(&negative_stock).unwrap_err();
        assert!(!errors.is_empty());
    }
}
