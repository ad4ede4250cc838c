//! Project products back to flat template rows for spreadsheet export.
//!
//! ```text
//! Product G1 "Shirt"             →  Flat rows (one per variation)
//! ┌──────────────────────┐         ┌──────────────────────────────┐
//! │ name, price, images  │         │ G1, Shirt, 50, P, 5, a.png   │
//! │ variations: [P, M]   │    →    │ G1, Shirt, 50, M, 3, a.png   │
//! └──────────────────────┘         └──────────────────────────────┘
//! ```
//!
//! The header row written here is the import template, so an exported sheet
//! goes back through the importer unchanged.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use crate::error::{ExportError, ExportResult};
use crate::models::{Category, Product, Variation};
use crate::sheet::{format_number, Column, COLUMNS, COLUMN_COUNT, IMAGE_COLUMNS};

/// Text written in flag columns for "yes".
pub const FLAG_YES: &str = "Sim";

/// Options for spreadsheet export.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Field delimiter
    pub delimiter: char,

    /// Write the Required/Optional row under the header
    pub include_requirement_row: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: ';',
            include_requirement_row: true,
        }
    }
}

/// One denormalized template row: 26 cells in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    cells: Vec<String>,
}

impl FlatRow {
    fn from_fn(f: impl Fn(Column) -> String) -> Self {
        Self {
            cells: COLUMNS.iter().map(|c| f(*c)).collect(),
        }
    }

    pub fn get(&self, column: Column) -> &str {
        &self.cells[column.index()]
    }

    /// Cells in column order.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

impl Serialize for FlatRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(COLUMN_COUNT))?;
        for (column, cell) in COLUMNS.iter().zip(&self.cells) {
            map.serialize_entry(column.header(), cell)?;
        }
        map.end()
    }
}

/// The template header row.
pub fn header_row() -> FlatRow {
    FlatRow::from_fn(|c| c.header().to_string())
}

/// Required/Optional marker for every column.
pub fn requirement_row() -> FlatRow {
    FlatRow::from_fn(|c| c.requirement().as_str().to_string())
}

/// One flat row per variation, product fields repeated on each.
pub fn project_for_export(product: &Product) -> Vec<FlatRow> {
    product
        .variations
        .iter()
        .map(|variation| FlatRow::from_fn(|column| export_cell(product, variation, column)))
        .collect()
}

fn export_cell(product: &Product, variation: &Variation, column: Column) -> String {
    match column {
        Column::Category => category_cell(&product.category),
        Column::Name => product.name.clone(),
        Column::Brand => product.brand.clone(),
        Column::GrouperId => product.grouper_id.clone(),
        Column::Size => variation.size.to_string(),
        Column::Color => variation.color.clone(),
        Column::Stock => variation.stock.to_string(),
        Column::Description => product.description.clone(),
        Column::Ean => product.ean.clone().unwrap_or_default(),
        Column::Sku => product.sku.clone(),
        Column::Price => format_number(product.price),
        Column::DiscountPrice => product.discount_price.map(format_number).unwrap_or_default(),
        Column::Height => format_number(product.height),
        Column::Width => format_number(product.width),
        Column::Length => format_number(product.length),
        Column::Weight => format_number(product.weight),
        Column::Gender => product.gender.clone(),
        Column::LactoseFree => flag_cell(variation.lactose_free),
        Column::GlutenFree => flag_cell(variation.gluten_free),
        Column::ProductId => product.id.clone().unwrap_or_default(),
        image => IMAGE_COLUMNS
            .iter()
            .position(|c| *c == image)
            .and_then(|slot| product.images.get(slot))
            .map(|img| img.url.clone())
            .unwrap_or_default(),
    }
}

fn category_cell(category: &Category) -> String {
    if *category == Category::default() {
        String::new()
    } else {
        category.to_string()
    }
}

fn flag_cell(flag: Option<bool>) -> String {
    if flag == Some(true) {
        FLAG_YES.to_string()
    } else {
        String::new()
    }
}

/// Write header, optional requirement row, and every product's rows as CSV.
pub fn write_csv(products: &[Product], options: &ExportOptions) -> ExportResult<Vec<u8>> {
    if !options.delimiter.is_ascii() {
        return Err(ExportError::InvalidDelimiter(options.delimiter));
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter as u8)
        .from_writer(Vec::new());

    writer.write_record(header_row().cells())?;
    if options.include_requirement_row {
        writer.write_record(requirement_row().cells())?;
    }
    for product in products {
        for row in project_for_export(product) {
            writer.write_record(row.cells())?;
        }
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::other(e.to_string())))
}
