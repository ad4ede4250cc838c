//! Assemble one product from the rows of one group.
//!
//! Product-level fields come from the first row of the group; each row
//! contributes exactly one variation, in row order. Rows are expected to
//! agree on product-level fields; [`check_group_consistency`] reports the
//! ones that don't.

use crate::models::{Category, Image, Product, Size, Variation};
use crate::sheet::{Cell, Column, ImportRow, SHARED_COLUMNS};
use crate::validation::FieldFailure;

use super::grouper::group_by;

/// Columns compared numerically when checking group consistency.
const NUMERIC_COLUMNS: [Column; 6] = [
    Column::Price,
    Column::DiscountPrice,
    Column::Height,
    Column::Width,
    Column::Length,
    Column::Weight,
];

/// Build one product from a group of rows.
///
/// Returns `None` only for an empty group. Cells that do not parse (possible
/// when validation was skipped) fall back to empty strings and zeros.
pub fn assemble_product(group: &[ImportRow]) -> Option<Product> {
    let first = group.first()?;
    let name = text(&first.name);

    let images = first
        .image_urls()
        .into_iter()
        .enumerate()
        .map(|(index, url)| Image {
            id: String::new(),
            name: format!("{}-{}", name, index),
            alt_text: name.clone(),
            url,
        })
        .collect();

    let variations = group.iter().map(variation_from_row).collect();

    Some(Product {
        id: first.product_id.as_text(),
        grouper_id: text(&first.grouper_id),
        category: first
            .category
            .as_text()
            .and_then(|raw| Category::parse(&raw))
            .unwrap_or_default(),
        name,
        brand: text(&first.brand),
        description: text(&first.description),
        ean: first.ean.as_text(),
        sku: text(&first.sku),
        gender: text(&first.gender),
        price: number(&first.price),
        discount_price: first.discount_price.as_number(),
        height: number(&first.height),
        width: number(&first.width),
        length: number(&first.length),
        weight: number(&first.weight),
        variations,
        images,
    })
}

/// Group rows by grouper id and assemble one product per group, in
/// first-seen order.
///
/// Rows without a grouper id cannot belong to any product and are left out;
/// [`crate::transform::pipeline::import_rows`] reports them instead.
pub fn assemble_products(rows: Vec<ImportRow>) -> Vec<Product> {
    group_by(rows, |row| row.grouping_key())
        .into_iter()
        .filter(|(key, _)| key.is_some())
        .filter_map(|(_, group)| assemble_product(&group))
        .collect()
}

/// Report every product-level cell that differs from the group's first row.
pub fn check_group_consistency(group: &[ImportRow]) -> Vec<FieldFailure> {
    let Some((first, rest)) = group.split_first() else {
        return Vec::new();
    };

    let mut failures = Vec::new();
    for row in rest {
        for column in SHARED_COLUMNS {
            if !same_value(column, first.cell(column), row.cell(column)) {
                failures.push(FieldFailure::divergent(column, row));
            }
        }
    }
    failures
}

fn variation_from_row(row: &ImportRow) -> Variation {
    let mut variation = Variation::new(size(&row.size), row.stock.as_stock().unwrap_or(0), text(&row.color));
    if row.gluten_free.is_truthy() {
        variation.gluten_free = Some(true);
    }
    if row.lactose_free.is_truthy() {
        variation.lactose_free = Some(true);
    }
    variation
}

fn same_value(column: Column, a: &Cell, b: &Cell) -> bool {
    if NUMERIC_COLUMNS.contains(&column) {
        if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
            return x == y;
        }
    }
    a.as_text() == b.as_text()
}

fn size(cell: &Cell) -> Size {
    match cell {
        Cell::Number(n) => Size::Measure(*n),
        other => Size::parse(&text(other)),
    }
}

fn text(cell: &Cell) -> String {
    cell.as_text().unwrap_or_default()
}

fn number(cell: &Cell) -> f64 {
    cell.as_number().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FailureKind, Field};

    fn shirt_row(row_number: usize, size: &str, stock: u32) -> ImportRow {
        ImportRow::new(row_number)
            .with(Column::Category, "Nacional > Roupas > Camisetas")
            .with(Column::Name, "Shirt")
            .with(Column::Brand, "Acme")
            .with(Column::GrouperId, "G1")
            .with(Column::Size, size)
            .with(Column::Color, "blue")
            .with(Column::Stock, stock)
            .with(Column::Description, "Cotton shirt")
            .with(Column::Sku, "SH-1")
            .with(Column::Price, "50")
            .with(Column::Height, "5")
            .with(Column::Width, "20")
            .with(Column::Length, "30")
            .with(Column::Weight, "0,3")
            .with(Column::Gender, "Unissex")
            .with(Column::Image1, "https://cdn/shirt-front.png")
            .with(Column::Image2, "https://cdn/shirt-back.png")
    }

    #[test]
    fn test_shirt_scenario() {
        let group = vec![shirt_row(2, "P", 5), shirt_row(3, "M", 3)];
        let product = assemble_product(&group).unwrap();

        assert_eq!(product.name, "Shirt");
        assert_eq!(product.grouper_id, "G1");
        assert_eq!(product.price, 50.0);
        assert_eq!(
            product.variations,
            vec![
                Variation::new(Size::Label("P".into()), 5, "blue"),
                Variation::new(Size::Label("M".into()), 3, "blue"),
            ]
        );
    }

    #[test]
    fn test_one_variation_per_row_in_order() {
        let sizes = ["PP", "P", "M", "G", "GG"];
        let group: Vec<ImportRow> = sizes
            .iter()
            .enumerate()
            .map(|(i, s)| shirt_row(i + 2, s, i as u32))
            .collect();
        let product = assemble_product(&group).unwrap();

        assert_eq!(product.variations.len(), sizes.len());
        for (variation, expected) in product.variations.iter().zip(sizes) {
            assert_eq!(variation.size, Size::Label(expected.to_string()));
        }
    }

    #[test]
    fn test_images_named_after_product() {
        let group = vec![shirt_row(2, "P", 5).with(Column::Image4, "https://cdn/shirt-tag.png")];
        let product = assemble_product(&group).unwrap();

        let names: Vec<&str> = product.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Shirt-0", "Shirt-1", "Shirt-2"]);
        assert!(product.images.iter().all(|i| i.alt_text == "Shirt" && i.id.is_empty()));
        assert_eq!(product.images[2].url, "https://cdn/shirt-tag.png");
    }

    #[test]
    fn test_flags_only_when_truthy() {
        let group = vec![
            shirt_row(2, "P", 5).with(Column::GlutenFree, "sim"),
            shirt_row(3, "M", 3).with(Column::LactoseFree, "não"),
        ];
        let product = assemble_product(&group).unwrap();

        assert_eq!(product.variations[0].gluten_free, Some(true));
        assert_eq!(product.variations[0].lactose_free, None);
        assert_eq!(product.variations[1].gluten_free, None);
        assert_eq!(product.variations[1].lactose_free, None);
    }

    #[test]
    fn test_numeric_size_is_measure() {
        let group = vec![shirt_row(2, "42", 1)];
        let product = assemble_product(&group).unwrap();
        assert_eq!(product.variations[0].size, Size::Measure(42.0));
    }

    #[test]
    fn test_identifier_from_first_row() {
        let group = vec![
            shirt_row(2, "P", 5).with(Column::ProductId, "prod-77"),
            shirt_row(3, "M", 3).with(Column::ProductId, "prod-77"),
        ];
        let product = assemble_product(&group).unwrap();
        assert_eq!(product.id.as_deref(), Some("prod-77"));
        assert_eq!(product.category.sub_category, "Camisetas");
        assert!((product.weight - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_group() {
        assert!(assemble_product(&[]).is_none());
    }

    #[test]
    fn test_assemble_products_skips_keyless_rows() {
        let rows = vec![
            shirt_row(2, "P", 5),
            shirt_row(3, "U", 1).with(Column::GrouperId, ""),
            shirt_row(4, "M", 3),
        ];
        let products = assemble_products(rows);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].variations.len(), 2);
    }

    #[test]
    fn test_consistent_group() {
        let group = vec![shirt_row(2, "P", 5), shirt_row(3, "M", 3).with(Column::Price, "50,00")];
        assert!(check_group_consistency(&group).is_empty());
    }

    #[test]
    fn test_divergent_group_flagged() {
        let group = vec![
            shirt_row(2, "P", 5),
            shirt_row(3, "M", 3).with(Column::Name, "T-Shirt"),
            shirt_row(4, "G", 1).with(Column::Price, "55"),
        ];
        let failures = check_group_consistency(&group);

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].field, Field::Column(Column::Name));
        assert_eq!(failures[0].row_number, 3);
        assert_eq!(failures[1].field, Field::Column(Column::Price));
        assert_eq!(failures[1].row_number, 4);
        assert!(failures.iter().all(|f| f.kind == FailureKind::Divergent));

        // First row still wins when assembling
        assert_eq!(assemble_product(&group).unwrap().name, "Shirt");
    }
}
