//! High-level import/export API.
//!
//! Import runs every step in order:
//!
//! 1. Fill promotional prices the seller asked for
//! 2. Validate each row
//! 3. Group rows by grouper id
//! 4. Reject groups with invalid or divergent rows
//! 5. Assemble one product per group
//! 6. Check each product against the catalog API schema
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine::transform::pipeline::{import_file, ImportOptions};
//!
//! let report = import_file("produtos.csv", &ImportOptions::from_env())?;
//! println!("{} products, {} failures", report.products.len(), report.failures.len());
//! ```

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use super::assembler::{assemble_product, check_group_consistency};
use super::export::{write_csv, ExportOptions};
use super::grouper::group_by;
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::Product;
use crate::parser::parse_bytes;
use crate::sheet::{Column, ImportRow};
use crate::validation::{apply_discount_default, validate_product, validate_row, Field, FieldFailure};

/// Options for the import pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    /// Use this delimiter instead of detecting it
    pub delimiter: Option<char>,

    /// Skip field validation (rows without a grouper id are still rejected)
    pub skip_validation: bool,

    /// Keep groups whose rows disagree on product fields (first row wins)
    pub allow_divergent_groups: bool,

    /// Check assembled products against the catalog API schema
    pub check_schema: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            skip_validation: false,
            allow_divergent_groups: false,
            check_schema: true,
        }
    }
}

impl ImportOptions {
    /// Defaults overridden by `VITRINE_*` environment variables.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(delimiter) = std::env::var("VITRINE_DELIMITER")
            .ok()
            .and_then(|v| parse_delimiter(&v))
        {
            options.delimiter = Some(delimiter);
        }
        if let Some(v) = env_flag("VITRINE_SKIP_VALIDATION") {
            options.skip_validation = v;
        }
        if let Some(v) = env_flag("VITRINE_ALLOW_DIVERGENT_GROUPS") {
            options.allow_divergent_groups = v;
        }
        if let Some(v) = env_flag("VITRINE_CHECK_SCHEMA") {
            options.check_schema = v;
        }
        options
    }
}

/// Parse a delimiter setting; `tab` and `\t` mean a tab.
pub fn parse_delimiter(raw: &str) -> Option<char> {
    match raw {
        "tab" | "\\t" | "\t" => Some('\t'),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Counters for one import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub rows: usize,
    pub valid_rows: usize,
    pub rejected_rows: usize,
    pub groups: usize,
    pub products: usize,
    pub variations: usize,
    pub total_stock: u64,
}

/// Schema violations for one assembled product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFailure {
    pub grouper_id: String,
    pub errors: Vec<String>,
}

/// Result of one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Unique job identifier
    pub job_id: String,

    pub generated_at: DateTime<Utc>,

    /// Products ready for the catalog API
    pub products: Vec<Product>,

    /// Field failures, in row order per group
    pub failures: Vec<FieldFailure>,

    /// Products that failed the API schema
    pub schema_failures: Vec<SchemaFailure>,

    pub stats: ImportStats,
}

impl ImportReport {
    /// "ready" when nothing was rejected, "warning" when some products made
    /// it through, "error" when none did.
    pub fn status(&self) -> &'static str {
        if self.products.is_empty() {
            "error"
        } else if self.failures.is_empty() && self.schema_failures.is_empty() {
            "ready"
        } else {
            "warning"
        }
    }
}

/// Import a spreadsheet file.
pub fn import_file<P: AsRef<Path>>(path: P, options: &ImportOptions) -> PipelineResult<ImportReport> {
    log_info(format!("📖 Reading {}...", path.as_ref().display()));
    let bytes = std::fs::read(path.as_ref()).map_err(crate::error::SheetError::from)?;
    import_bytes(&bytes, options)
}

/// Import raw spreadsheet bytes (CSV, any common encoding).
pub fn import_bytes(bytes: &[u8], options: &ImportOptions) -> PipelineResult<ImportReport> {
    log_info("Detecting encoding and separator...");
    let sheet = parse_bytes(bytes, options.delimiter)?;
    log_success(format!("Detected encoding: {}", sheet.encoding));
    log_success(format!("Separator: '{}'", format_delimiter(sheet.delimiter)));
    log_success(format!("Read {} rows", sheet.records.len()));

    let rows = sheet.import_rows()?;
    import_rows(rows, options)
}

/// Run validation, grouping and assembly over already-parsed rows.
pub fn import_rows(rows: Vec<ImportRow>, options: &ImportOptions) -> PipelineResult<ImportReport> {
    if rows.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut stats = ImportStats {
        rows: rows.len(),
        ..ImportStats::default()
    };
    let mut failures: Vec<FieldFailure> = Vec::new();

    // Steps 1-2: defaults, then validation
    log_info("✔️  Validating rows...");
    let checked: Vec<(ImportRow, bool)> = rows
        .into_iter()
        .map(|mut row| {
            apply_discount_default(&mut row);
            let valid = if options.skip_validation {
                true
            } else {
                match validate_row(&row) {
                    Ok(()) => true,
                    Err(errs) => {
                        failures.extend(errs);
                        false
                    }
                }
            };
            (row, valid)
        })
        .collect();
    stats.valid_rows = checked.iter().filter(|(_, valid)| *valid).count();
    if options.skip_validation {
        log_info_indent("(validation skipped)", 1);
    } else if stats.valid_rows == stats.rows {
        log_success(format!("All {} rows valid", stats.rows));
    } else {
        log_warning(format!("{} of {} rows invalid", stats.rows - stats.valid_rows, stats.rows));
    }

    // Step 3: group
    log_info("📦 Grouping by grouper id...");
    let groups = group_by(checked, |(row, _)| row.grouping_key());

    let mut products = Vec::new();
    for (key, group) in groups {
        let Some(grouper_id) = key else {
            // Validation already reported these unless it was skipped
            if options.skip_validation {
                failures.extend(
                    group
                        .iter()
                        .map(|(row, _)| FieldFailure::invalid(Field::Column(Column::GrouperId), row)),
                );
            }
            log_warning(format!("{} rows without grouper id", group.len()));
            stats.rejected_rows += group.len();
            continue;
        };
        stats.groups += 1;

        let all_valid = group.iter().all(|(_, valid)| *valid);
        let group_rows: Vec<ImportRow> = group.into_iter().map(|(row, _)| row).collect();

        // Step 4: reject invalid or divergent groups
        if !all_valid {
            log_warning(format!("Group {} rejected (invalid rows)", grouper_id));
            stats.rejected_rows += group_rows.len();
            continue;
        }

        let divergences = check_group_consistency(&group_rows);
        if !divergences.is_empty() {
            failures.extend(divergences);
            if !options.allow_divergent_groups {
                log_warning(format!("Group {} rejected (rows disagree on product fields)", grouper_id));
                stats.rejected_rows += group_rows.len();
                continue;
            }
            log_warning(format!("Group {} has divergent rows, using the first one", grouper_id));
        }

        // Step 5: assemble
        if let Some(product) = assemble_product(&group_rows) {
            products.push(product);
        }
    }
    log_success(format!("{} products assembled", products.len()));

    // Step 6: API schema
    let mut schema_failures = Vec::new();
    if options.check_schema {
        log_info("✔️  Checking products against catalog schema...");
        let mut accepted = Vec::with_capacity(products.len());
        for product in products {
            let value = serde_json::to_value(&product)?;
            match validate_product(&value) {
                Ok(()) => accepted.push(product),
                Err(errors) => {
                    log_error(format!("Product {}: {}", product.grouper_id, errors.join(", ")));
                    stats.rejected_rows += product.variations.len();
                    schema_failures.push(SchemaFailure {
                        grouper_id: product.grouper_id.clone(),
                        errors,
                    });
                }
            }
        }
        products = accepted;
        if schema_failures.is_empty() {
            log_success("All products match the catalog schema");
        }
    }

    stats.products = products.len();
    stats.variations = products.iter().map(|p| p.variations.len()).sum();
    stats.total_stock = products.iter().map(Product::total_stock).sum();

    Ok(ImportReport {
        job_id: Uuid::new_v4().to_string(),
        generated_at: Utc::now(),
        products,
        failures,
        schema_failures,
        stats,
    })
}

/// Export products as a CSV import template filled with their rows.
pub fn export_products(products: &[Product], options: &ExportOptions) -> PipelineResult<Vec<u8>> {
    log_info(format!("📤 Exporting {} products...", products.len()));
    let bytes = write_csv(products, options)?;
    let rows: usize = products.iter().map(|p| p.variations.len()).sum();
    log_success(format!("Wrote {} rows", rows));
    Ok(bytes)
}

/// Default export file name, stamped with today's date.
pub fn default_export_file_name() -> String {
    format!("produtos-{}.csv", Local::now().format("%Y%m%d"))
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}
