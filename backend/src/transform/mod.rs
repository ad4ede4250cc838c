//! Transformation module.
//!
//! This module turns template rows into catalog products and back:
//! - Grouper: rows sharing a grouper id
//! - Assembler: one product per group, one variation per row
//! - Export: products back to flat template rows
//! - Pipeline: validation, grouping and assembly in one call

pub mod assembler;
pub mod export;
pub mod grouper;
pub mod pipeline;

pub use assembler::{assemble_product, assemble_products, check_group_consistency};
pub use export::{header_row, project_for_export, requirement_row, write_csv, ExportOptions, FlatRow};
pub use grouper::{group_by, Groups};
pub use pipeline::*;
