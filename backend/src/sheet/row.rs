//! One parsed spreadsheet row, as a closed record.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::columns::{Column, COLUMNS, IMAGE_COLUMNS};

/// One data row of the import template.
///
/// Rows that belong to the same product share a grouper id and are expected
/// to carry identical product-level cells; see
/// [`crate::transform::assembler::check_group_consistency`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    /// Sheet row number (1-based, the header is row 1).
    pub row_number: usize,
    /// Seller asked for a promotional price without typing one.
    #[serde(default)]
    pub discount: bool,

    pub category: Cell,
    pub name: Cell,
    pub brand: Cell,
    pub grouper_id: Cell,
    pub size: Cell,
    pub color: Cell,
    pub stock: Cell,
    pub description: Cell,
    pub ean: Cell,
    pub sku: Cell,
    pub price: Cell,
    pub discount_price: Cell,
    pub height: Cell,
    pub width: Cell,
    pub length: Cell,
    pub weight: Cell,
    pub gender: Cell,
    pub lactose_free: Cell,
    pub gluten_free: Cell,
    pub images: [Cell; 6],
    pub product_id: Cell,
}

impl ImportRow {
    /// An empty row at the given sheet row number.
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            ..Self::default()
        }
    }

    /// Set one cell, builder style.
    pub fn with(mut self, column: Column, value: impl Into<Cell>) -> Self {
        *self.cell_mut(column) = value.into();
        self
    }

    /// Build a row from positional cells (template order).
    ///
    /// Missing trailing cells are empty and extra cells are ignored.
    ///
    /// The promotional-price cell may hold a marker instead of a price. A
    /// yes-marker (`sim`, `x`, ...) sets [`ImportRow::discount`]; a no-marker
    /// (`não`, `false`, `0`, ...) clears it. Either way the slot is left empty.
    /// A zero price counts as a no-marker.
    pub fn from_cells(row_number: usize, cells: Vec<Cell>) -> Self {
        let mut row = Self::new(row_number);
        for (column, cell) in COLUMNS.iter().zip(cells) {
            *row.cell_mut(*column) = cell;
        }

        if let Some(discount) = discount_marker(&row.discount_price) {
            row.discount = discount;
            row.discount_price = Cell::Empty;
        }

        row
    }

    /// Build a row from raw text fields, as read from a delimited file.
    pub fn from_fields<S: AsRef<str>>(row_number: usize, fields: &[S]) -> Self {
        let cells = fields.iter().map(|f| Cell::from_raw(f.as_ref())).collect();
        Self::from_cells(row_number, cells)
    }

    pub fn cell(&self, column: Column) -> &Cell {
        match column {
            Column::Category => &self.category,
            Column::Name => &self.name,
            Column::Brand => &self.brand,
            Column::GrouperId => &self.grouper_id,
            Column::Size => &self.size,
            Column::Color => &self.color,
            Column::Stock => &self.stock,
            Column::Description => &self.description,
            Column::Ean => &self.ean,
            Column::Sku => &self.sku,
            Column::Price => &self.price,
            Column::DiscountPrice => &self.discount_price,
            Column::Height => &self.height,
            Column::Width => &self.width,
            Column::Length => &self.length,
            Column::Weight => &self.weight,
            Column::Gender => &self.gender,
            Column::LactoseFree => &self.lactose_free,
            Column::GlutenFree => &self.gluten_free,
            Column::Image1 => &self.images[0],
            Column::Image2 => &self.images[1],
            Column::Image3 => &self.images[2],
            Column::Image4 => &self.images[3],
            Column::Image5 => &self.images[4],
            Column::Image6 => &self.images[5],
            Column::ProductId => &self.product_id,
        }
    }

    pub fn cell_mut(&mut self, column: Column) -> &mut Cell {
        match column {
            Column::Category => &mut self.category,
            Column::Name => &mut self.name,
            Column::Brand => &mut self.brand,
            Column::GrouperId => &mut self.grouper_id,
            Column::Size => &mut self.size,
            Column::Color => &mut self.color,
            Column::Stock => &mut self.stock,
            Column::Description => &mut self.description,
            Column::Ean => &mut self.ean,
            Column::Sku => &mut self.sku,
            Column::Price => &mut self.price,
            Column::DiscountPrice => &mut self.discount_price,
            Column::Height => &mut self.height,
            Column::Width => &mut self.width,
            Column::Length => &mut self.length,
            Column::Weight => &mut self.weight,
            Column::Gender => &mut self.gender,
            Column::LactoseFree => &mut self.lactose_free,
            Column::GlutenFree => &mut self.gluten_free,
            Column::Image1 => &mut self.images[0],
            Column::Image2 => &mut self.images[1],
            Column::Image3 => &mut self.images[2],
            Column::Image4 => &mut self.images[3],
            Column::Image5 => &mut self.images[4],
            Column::Image6 => &mut self.images[5],
            Column::ProductId => &mut self.product_id,
        }
    }

    /// The grouper id, if filled in.
    pub fn grouping_key(&self) -> Option<String> {
        self.grouper_id.as_text()
    }

    /// Image URLs in slot order, skipping empty slots.
    pub fn image_urls(&self) -> Vec<String> {
        IMAGE_COLUMNS
            .iter()
            .filter_map(|c| self.cell(*c).as_text())
            .collect()
    }
}

/// Read a promotional-price cell as a yes/no marker, if it is one.
fn discount_marker(cell: &Cell) -> Option<bool> {
    match cell.as_number() {
        Some(n) if n == 0.0 => Some(false),
        Some(_) => None,
        None if cell.is_truthy() => Some(true),
        None if cell.is_falsy() => Some(false),
        None => None,
    }
}
