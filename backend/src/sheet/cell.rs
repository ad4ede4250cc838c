//! Spreadsheet cell values and their coercions.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tokens read as "yes" in flag columns.
const TRUE_VALUES: [&str; 8] = ["sim", "s", "yes", "y", "true", "verdadeiro", "x", "1"];

/// Tokens read as "no" in flag columns.
const FALSE_VALUES: [&str; 7] = ["não", "nao", "n", "no", "false", "falso", "0"];

/// Everything that is not part of a number (currency symbols, spaces, units).
static NON_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9,.\-]").expect("valid regex literal"));

/// One cell of an import row.
///
/// CSV input only ever yields `Text` and `Empty`; hosts that parsed an xlsx
/// themselves can pass typed numbers and booleans straight through.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Flag(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a cell from raw text, trimming it and mapping blanks to `Empty`.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    /// True unless the cell is empty or whitespace-only text.
    pub fn is_defined(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !s.trim().is_empty(),
            Cell::Number(n) => !n.is_nan(),
            Cell::Flag(_) => true,
        }
    }

    /// Text content, with numbers rendered the way the export writes them.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Flag(b) => Some(if *b { "Sim" } else { "Não" }.to_string()),
        }
    }

    /// Numeric value. Accepts Brazilian formatting (`R$ 1.234,56`).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Stock quantity: a non-negative whole number.
    pub fn as_stock(&self) -> Option<u32> {
        let n = self.as_number()?;
        if n < 0.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
            return None;
        }
        Some(n as u32)
    }

    /// Flag reading of the cell.
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Flag(b) => *b,
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
            Cell::Text(s) => {
                let normalized = s.trim().to_lowercase();
                TRUE_VALUES.contains(&normalized.as_str())
            }
        }
    }

    /// An explicit "no": `Flag(false)`, zero, or one of the no-tokens.
    /// Empty cells are neither truthy nor falsy.
    pub fn is_falsy(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Flag(b) => !*b,
            Cell::Number(n) => *n == 0.0,
            Cell::Text(s) => {
                let normalized = s.trim().to_lowercase();
                FALSE_VALUES.contains(&normalized.as_str())
            }
        }
    }

    /// Character count of the text content (0 for empty cells).
    pub fn char_len(&self) -> usize {
        self.as_text().map(|s| s.chars().count()).unwrap_or(0)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::from_raw(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::from_raw(&value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Flag(value)
    }
}

/// Parse a number written with either decimal convention.
///
/// A comma is the decimal separator unless a dot appears after it
/// (`1,234.56`), in which case commas are thousands separators.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = NON_NUMERIC.replace_all(raw.trim(), "");
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if dot > comma => cleaned.replace(',', ""),
        (Some(_), _) => cleaned.replace('.', "").replace(',', "."),
        (None, _) => cleaned.to_string(),
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a number without a trailing `.0` for whole values.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_trims_and_blanks() {
        assert_eq!(Cell::from_raw("  Camiseta "), Cell::Text("Camiseta".into()));
        assert_eq!(Cell::from_raw("   "), Cell::Empty);
        assert_eq!(Cell::from_raw(""), Cell::Empty);
    }

    #[test]
    fn test_is_defined() {
        assert!(!Cell::Empty.is_defined());
        assert!(!Cell::Text("  ".into()).is_defined());
        assert!(Cell::Text("0".into()).is_defined());
        assert!(Cell::Number(0.0).is_defined());
        assert!(Cell::Flag(false).is_defined());
    }

    #[test]
    fn test_brazilian_numbers() {
        assert_eq!(parse_number("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse_number("49,90"), Some(49.9));
        assert_eq!(parse_number("1,234.56"), Some(1234.56));
        assert_eq!(parse_number("50"), Some(50.0));
        assert_eq!(parse_number("0.35 kg"), Some(0.35));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_stock_must_be_whole_and_non_negative() {
        assert_eq!(Cell::from("5").as_stock(), Some(5));
        assert_eq!(Cell::Number(3.0).as_stock(), Some(3));
        assert_eq!(Cell::from("-1").as_stock(), None);
        assert_eq!(Cell::from("2,5").as_stock(), None);
        assert_eq!(Cell::Empty.as_stock(), None);
    }

    #[test]
    fn test_truthy_tokens() {
        assert!(Cell::from("Sim").is_truthy());
        assert!(Cell::from("x").is_truthy());
        assert!(Cell::from("TRUE").is_truthy());
        assert!(Cell::Flag(true).is_truthy());
        assert!(Cell::Number(1.0).is_truthy());
        assert!(!Cell::from("não").is_truthy());
        assert!(!Cell::Empty.is_truthy());
        assert!(!Cell::Number(0.0).is_truthy());
    }

    #[test]
    fn test_falsy_tokens() {
        for token in ["não", "NAO", "n", "no", "False", "falso", "0"] {
            assert!(Cell::from(token).is_falsy(), "{token}");
        }
        assert!(Cell::Flag(false).is_falsy());
        assert!(Cell::Number(0.0).is_falsy());
        assert!(!Cell::Empty.is_falsy());
        assert!(!Cell::from("sim").is_falsy());
        assert!(!Cell::from("39,90").is_falsy());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(49.9), "49.9");
        assert_eq!(format_number(0.35), "0.35");
    }

    #[test]
    fn test_as_text_of_number() {
        assert_eq!(Cell::Number(42.0).as_text(), Some("42".into()));
        assert_eq!(Cell::Empty.as_text(), None);
    }
}
