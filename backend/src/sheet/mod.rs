//! The import template: columns, cells and rows.

pub mod cell;
pub mod columns;
pub mod row;

pub use cell::{format_number, parse_number, Cell};
pub use columns::{Column, Requirement, COLUMNS, COLUMN_COUNT, IMAGE_COLUMNS, SHARED_COLUMNS};
pub use row::ImportRow;
