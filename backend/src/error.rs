//! Error types for the Vitrine import/export pipeline.
//!
//! - [`SheetError`] - reading, decoding and splitting a spreadsheet file
//! - [`ExportError`] - writing flat rows back to a spreadsheet
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Per-field validation failures are not errors: they are collected as
//! [`crate::validation::FieldFailure`] values and reported alongside the
//! products that did make it through.

use thiserror::Error;

// =============================================================================
// Sheet Parsing Errors
// =============================================================================

/// Errors while reading a spreadsheet export.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode bytes with the detected encoding.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Malformed delimited content.
    #[error("Line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Empty file.
    #[error("Spreadsheet is empty")]
    EmptyFile,

    /// Header row present but has fewer columns than the template.
    #[error("Header row has {found} columns, template expects {expected}")]
    ShortHeader { found: usize, expected: usize },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while serializing flat rows.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer failure.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the writer failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The delimiter cannot be represented as a single byte.
    #[error("Delimiter '{0}' is not a single-byte character")]
    InvalidDelimiter(char),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// Returned by [`crate::transform::pipeline::import_bytes`] and friends.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Spreadsheet parsing error.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No data rows to import.
    #[error("No rows to import")]
    EmptyInput,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for sheet parsing.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let sheet_err = SheetError::EmptyFile;
        let pipeline_err: PipelineError = sheet_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        let export_err = ExportError::InvalidDelimiter('→');
        let pipeline_err: PipelineError = export_err.into();
        assert!(pipeline_err.to_string().contains("single-byte"));
    }

    #[test]
    fn test_parse_error_format() {
        let err = SheetError::ParseError {
            line: 7,
            message: "unterminated quote".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Line 7"));
        assert!(msg.contains("unterminated quote"));
    }
}
