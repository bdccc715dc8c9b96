use chrono::NaiveDateTime;
use std::collections::HashMap;

/// One materialized spreadsheet cell. Workbook adapters keep the underlying
/// type so date coercion can tell a serial number from free text.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Cleaned textual form of the cell, `""` for blanks.
    pub fn text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => clean(s),
            CellValue::Number(n) => {
                // Integer-valued cells print without a fractional part so a
                // NIP or phone number cell survives as digits.
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            CellValue::DateTime(dt) => dt.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => clean(s).is_empty(),
            _ => false,
        }
    }
}

/// A spreadsheet row materialized as header -> cell. Blank cells are present
/// as `CellValue::Empty`, never missing, so alias lookups are total.
pub type Row = HashMap<String, CellValue>;

/// Cleans one raw cell: trims, strips a single layer of matching wrapping
/// quotes, collapses internal whitespace runs to a single space.
pub fn clean(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = strip_wrapping_quotes(trimmed);
    unquoted.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_wrapping_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Tries each alias in order for an exact header match, then retries the
/// whole list case-insensitively. Returns the first non-empty cell.
pub fn find_cell_by_aliases<'a>(row: &'a Row, aliases: &[&str]) -> Option<&'a CellValue> {
    for alias in aliases {
        if let Some(cell) = row.get(*alias) {
            if !cell.is_empty() {
                return Some(cell);
            }
        }
    }

    // Second pass tolerates headers the alias table didn't anticipate the
    // casing of ("EMAIL", "eMail"). Keys are visited in sorted order so two
    // differently-cased headers folding to the same alias resolve the same
    // way on every run.
    let mut keys: Vec<&String> = row.keys().collect();
    keys.sort_unstable();
    for alias in aliases {
        let alias_lower = alias.to_lowercase();
        for key in &keys {
            if key.to_lowercase() == alias_lower {
                if let Some(cell) = row.get(*key) {
                    if !cell.is_empty() {
                        return Some(cell);
                    }
                }
            }
        }
    }

    None
}

/// Textual variant of [`find_cell_by_aliases`], which is what most field
/// lookups want.
pub fn find_by_aliases(row: &Row, aliases: &[&str]) -> Option<String> {
    find_cell_by_aliases(row, aliases).map(CellValue::text)
}
