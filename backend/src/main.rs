//! Vitrine CLI - seller center spreadsheet import and export
//!
//! # Main Commands
//!
//! ```bash
//! vitrine import produtos.csv -o products.json   # Sheet to catalog products
//! vitrine export products.json -o exports/       # Products back to the template
//! vitrine template -o modelo.csv                 # Empty import template
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! vitrine parse produtos.csv       # Just parse the sheet to JSON
//! vitrine validate produtos.csv    # Report field failures without importing
//! ```
//!
//! Any command takes `--log-json progress.jsonl` to keep the pipeline
//! progress as JSON lines.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use vitrine::logs::{drain, LogEntry, LOG_BROADCASTER};
use vitrine::transform::pipeline::parse_delimiter;
use vitrine::{
    default_export_file_name, export_products, import_file, parse_bytes, ExportOptions,
    ImportOptions, ImportReport, Product,
};

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Import and export seller center product spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Also write pipeline progress to this file, one JSON entry per line
    #[arg(long, global = true, value_name = "FILE")]
    log_json: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a sheet and output its records as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long, value_parser = delimiter_arg)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate every row of a sheet and list the failures
    Validate {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long, value_parser = delimiter_arg)]
        delimiter: Option<char>,
    },

    /// Full import: sheet → validated, grouped catalog products
    Import {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long, value_parser = delimiter_arg)]
        delimiter: Option<char>,

        /// Output file for products (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the full import report (failures, stats) to this file
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Skip field validation
        #[arg(long)]
        no_validate: bool,

        /// Keep groups whose rows disagree (first row wins)
        #[arg(long)]
        allow_divergent: bool,
    },

    /// Export products JSON back to the spreadsheet template
    Export {
        /// Input JSON file (array of products)
        input: PathBuf,

        /// Output file or directory (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// CSV delimiter
        #[arg(short, long, default_value = ";", value_parser = delimiter_arg)]
        delimiter: char,

        /// Leave out the Required/Optional row
        #[arg(long)]
        no_requirement_row: bool,
    },

    /// Write an empty import template
    Template {
        /// Output file or directory (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// CSV delimiter
        #[arg(short, long, default_value = ";", value_parser = delimiter_arg)]
        delimiter: char,
    },
}

fn delimiter_arg(raw: &str) -> Result<char, String> {
    parse_delimiter(raw).ok_or_else(|| format!("invalid delimiter: '{}'", raw))
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut progress = cli.log_json.as_ref().map(|_| LOG_BROADCASTER.subscribe());

    let result = match cli.command {
        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter, output.as_deref()),

        Commands::Validate { input, delimiter } => cmd_validate(&input, delimiter),

        Commands::Import {
            input,
            delimiter,
            output,
            report,
            no_validate,
            allow_divergent,
        } => {
            let mut options = ImportOptions::from_env();
            if delimiter.is_some() {
                options.delimiter = delimiter;
            }
            options.skip_validation |= no_validate;
            options.allow_divergent_groups |= allow_divergent;
            cmd_import(&input, &options, output.as_deref(), report.as_deref())
        }

        Commands::Export {
            input,
            output,
            delimiter,
            no_requirement_row,
        } => {
            let options = ExportOptions {
                delimiter,
                include_requirement_row: !no_requirement_row,
            };
            cmd_export(&input, &options, output.as_deref())
        }

        Commands::Template { output, delimiter } => {
            let options = ExportOptions {
                delimiter,
                include_requirement_row: true,
            };
            cmd_template(&options, output.as_deref())
        }
    };

    if let (Some(path), Some(receiver)) = (cli.log_json.as_deref(), progress.as_mut()) {
        if let Err(e) = write_json_log(path, &drain(receiver)) {
            eprintln!("❌ Error writing log: {}", e);
        }
    }

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn write_json_log(path: &Path, entries: &[LogEntry]) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&serde_json::to_string(entry)?);
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing sheet: {}", input.display());

    let bytes = fs::read(input)?;
    let sheet = parse_bytes(&bytes, delimiter)?;

    eprintln!("   Encoding: {}", sheet.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(sheet.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", sheet.headers.join(", "));
    eprintln!("✅ Parsed {} records", sheet.records.len());

    let json = serde_json::to_string_pretty(&sheet.records_as_json())?;
    write_output(json.as_bytes(), output)?;

    Ok(())
}

fn cmd_validate(input: &Path, delimiter: Option<char>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let options = ImportOptions {
        delimiter,
        check_schema: false,
        ..ImportOptions::default()
    };
    let report = import_file(input, &options)?;

    if report.failures.is_empty() {
        eprintln!("\n✅ All {} rows valid!", report.stats.rows);
        return Ok(());
    }

    eprintln!();
    for failure in &report.failures {
        eprintln!("❌ {}", failure);
    }
    eprintln!(
        "\n📊 Results: {} rows, {} valid, {} failures",
        report.stats.rows,
        report.stats.valid_rows,
        report.failures.len()
    );

    Err(format!("{} validation failures", report.failures.len()).into())
}

fn cmd_import(
    input: &Path,
    options: &ImportOptions,
    output: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let report = import_file(input, options)?;
    print_summary(&report);

    let products_json = serde_json::to_string_pretty(&report.products)?;
    write_output(products_json.as_bytes(), output)?;

    if let Some(path) = report_path {
        let report_json = serde_json::to_string_pretty(&report)?;
        fs::write(path, report_json)?;
        eprintln!("💾 Report saved to: {}", path.display());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn print_summary(report: &ImportReport) {
    let stats = &report.stats;
    eprintln!("\n📦 Job {}", report.job_id);
    eprintln!("   Rows: {} ({} rejected)", stats.rows, stats.rejected_rows);
    eprintln!("   Groups: {}", stats.groups);
    eprintln!("   Products: {}", stats.products);
    eprintln!("   Variations: {}", stats.variations);
    eprintln!("   Total stock: {}", stats.total_stock);

    if !report.failures.is_empty() {
        eprintln!("\n⚠️  {} failures:", report.failures.len());
        for failure in report.failures.iter().take(10) {
            eprintln!("   - {}", failure);
        }
        if report.failures.len() > 10 {
            eprintln!("   ... and {} more", report.failures.len() - 10);
        }
    }

    for schema in &report.schema_failures {
        eprintln!("\n❌ Product {} rejected by the API schema:", schema.grouper_id);
        for err in schema.errors.iter().take(3) {
            eprintln!("   - {}", err);
        }
    }
}

fn cmd_export(
    input: &Path,
    options: &ExportOptions,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📤 Reading products: {}", input.display());

    let content = fs::read_to_string(input)?;
    let products: Vec<Product> = serde_json::from_str(&content)?;

    let bytes = export_products(&products, options)?;
    let target = output.map(resolve_export_path);
    write_output(&bytes, target.as_deref())?;

    Ok(())
}

fn cmd_template(options: &ExportOptions, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = export_products(&[], options)?;
    let target = output.map(resolve_export_path);
    write_output(&bytes, target.as_deref())?;
    Ok(())
}

/// A directory gets the dated default file name.
fn resolve_export_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(default_export_file_name())
    } else {
        path.to_path_buf()
    }
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &[u8], path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content)?;
            if !content.ends_with(b"\n") {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
