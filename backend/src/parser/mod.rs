//! Delimited spreadsheet reader with encoding and delimiter auto-detection.
//!
//! Sellers upload whatever their spreadsheet tool exported: UTF-8 or
//! Latin-1, semicolon or comma separated. Cells are read by position and
//! turned into [`ImportRow`]s; header text is kept for display only.

use serde_json::{json, Map, Value};
use std::path::Path;

use crate::error::{SheetError, SheetResult};
use crate::sheet::{ImportRow, Requirement, COLUMN_COUNT};

/// Parsed sheet with detection metadata.
#[derive(Debug, Clone)]
pub struct SheetData {
    /// Column headers as written in the file
    pub headers: Vec<String>,
    /// Data records with their 1-based line numbers
    pub records: Vec<(usize, Vec<String>)>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

impl SheetData {
    /// Records as JSON objects keyed by header.
    pub fn records_as_json(&self) -> Vec<Value> {
        self.records
            .iter()
            .map(|(_, fields)| {
                let mut obj = Map::new();
                for (i, header) in self.headers.iter().enumerate() {
                    let value = fields.get(i).map(String::as_str).unwrap_or("");
                    obj.insert(header.clone(), json!(value));
                }
                Value::Object(obj)
            })
            .collect()
    }

    /// Data records as import rows.
    ///
    /// The file must have at least the template's 26 columns. The
    /// Required/Optional row of an exported template is skipped.
    pub fn import_rows(&self) -> SheetResult<Vec<ImportRow>> {
        if self.headers.len() < COLUMN_COUNT {
            return Err(SheetError::ShortHeader {
                found: self.headers.len(),
                expected: COLUMN_COUNT,
            });
        }

        Ok(self
            .records
            .iter()
            .filter(|(_, fields)| !is_requirement_row(fields))
            .map(|(line, fields)| ImportRow::from_fields(*line, fields))
            .collect())
    }
}

/// True for the template's Required/Optional marker row.
fn is_requirement_row(fields: &[String]) -> bool {
    let markers = [Requirement::Required.as_str(), Requirement::Optional.as_str()];
    let mut filled = fields.iter().map(|f| f.trim()).filter(|f| !f.is_empty()).peekable();
    filled.peek().is_some() && filled.all(|f| markers.contains(&f))
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Labels encoding_rs does not know fall back to Windows-1252, the usual
/// export encoding of Excel in Brazil. Malformed input is an error.
pub fn decode_content(bytes: &[u8], encoding: &str) -> SheetResult<String> {
    let codec = match encoding.to_lowercase().as_str() {
        // ISO-8859-15 keeps é/ç/ã where Latin-1 has them
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15,
        label => encoding_rs::Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::WINDOWS_1252),
    };

    let (decoded, _, had_errors) = codec.decode(bytes);
    if had_errors {
        return Err(SheetError::EncodingError(format!(
            "content is not valid {}",
            codec.name()
        )));
    }

    // Excel likes to prepend a BOM
    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ';';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse a spreadsheet file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let sheet = parse_file_auto("/path/to/produtos.csv")?;
/// println!("Encoding: {}, Delimiter: '{}'", sheet.encoding, sheet.delimiter);
/// println!("Records: {}", sheet.records.len());
/// ```
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> SheetResult<SheetData> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Parse raw bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> SheetResult<SheetData> {
    parse_bytes(bytes, None)
}

/// Parse raw bytes, detecting the delimiter only when none is given.
pub fn parse_bytes(bytes: &[u8], delimiter: Option<char>) -> SheetResult<SheetData> {
    if bytes.is_empty() {
        return Err(SheetError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    parse_string(&content, delimiter, encoding)
}

/// Parse decoded content with an explicit delimiter.
pub fn parse_string(content: &str, delimiter: char, encoding: String) -> SheetResult<SheetData> {
    if !delimiter.is_ascii() {
        return Err(SheetError::ParseError {
            line: 1,
            message: format!("Delimiter '{}' is not a single-byte character", delimiter),
        });
    }
    if content.trim().is_empty() {
        return Err(SheetError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(1, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(SheetError::EmptyFile);
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let fallback_line = idx + 2; // +1 for 0-index, +1 for header
        let record = result.map_err(|e| csv_error(fallback_line, e))?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        let fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        records.push((line, fields));
    }

    Ok(SheetData {
        headers,
        records,
        encoding,
        delimiter,
    })
}

fn csv_error(line: usize, error: csv::Error) -> SheetError {
    let line = error
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(line);
    SheetError::ParseError {
        line,
        message: error.to_string(),
    }
}
