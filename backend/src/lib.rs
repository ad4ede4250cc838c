//! # Vitrine - seller center spreadsheet import and export
//!
//! Vitrine reads the product spreadsheet sellers fill in (one row per
//! variation) and turns it into catalog products ready for the API. It also
//! writes products back into the same template so sellers can edit them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV sheet  │────▶│   Parser    │────▶│  Validate   │────▶│  Products   │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │  + Group    │     │   (JSON)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!        ▲                                                           │
//!        └───────────────────────── Export ◀─────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vitrine::{import_file, ImportOptions};
//!
//! let report = import_file("produtos.csv", &ImportOptions::default()).unwrap();
//! println!("Imported {} products", report.products.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`logs`] - Progress log broadcaster
//! - [`sheet`] - Template columns, cells and rows
//! - [`models`] - Domain models (Product, Variation, Image)
//! - [`parser`] - CSV parsing with auto-detection
//! - [`validation`] - Field rules, failure messages, API schema
//! - [`transform`] - Grouping, assembly, export and pipeline

// Core modules
pub mod error;
pub mod logs;
pub mod models;
pub mod sheet;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Transformation
pub mod transform;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ExportError, PipelineError, PipelineResult, SheetError, SheetResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Category, Image, Product, Size, Variation};

// =============================================================================
// Re-exports - Sheet
// =============================================================================

pub use sheet::{Cell, Column, ImportRow, Requirement, COLUMNS, COLUMN_COUNT};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_bytes,
    parse_bytes_auto,
    parse_file_auto,
    SheetData,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    apply_discount_default,
    is_valid_product,
    validate_product,
    validate_row,
    FailureKind,
    Field,
    FieldFailure,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    assemble_product,
    check_group_consistency,
    group_by,
    project_for_export,
    write_csv,
    ExportOptions,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    default_export_file_name,
    export_products,
    import_bytes,
    import_file,
    import_rows,
    ImportOptions,
    ImportReport,
    ImportStats,
    SchemaFailure,
};
