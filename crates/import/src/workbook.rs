use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use thiserror::Error;
use tracing::{debug, warn};

use kliento_core::{CandidateAccount, CandidateInteraction, ImportDiagnostics};

use crate::cell::{CellValue, Row};
use crate::rows::{parse_account_row, parse_interaction_row};
use crate::sheets;

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("failed to open workbook: {0}")]
    Open(String),
    #[error("sheet '{0}' could not be read: {1}")]
    Sheet(String, String),
}

/// A workbook as this subsystem sees it: named sheets, each materialized as
/// ordered rows of header-keyed cells. Blank cells are present (as
/// [`CellValue::Empty`]), never omitted.
pub trait Workbook {
    fn sheet_names(&self) -> Vec<String>;
    fn rows(&mut self, sheet: &str) -> Result<Vec<Row>, WorkbookError>;
}

/// Calamine-backed workbook for xlsx/xls/ods files on disk.
pub struct XlsxWorkbook {
    inner: Sheets<BufReader<File>>,
}

impl XlsxWorkbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WorkbookError> {
        let inner = open_workbook_auto(path).map_err(|e| WorkbookError::Open(e.to_string()))?;
        Ok(XlsxWorkbook { inner })
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names().to_vec()
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Row>, WorkbookError> {
        let range = self
            .inner
            .worksheet_range(sheet)
            .map_err(|e| WorkbookError::Sheet(sheet.to_string(), e.to_string()))?;

        let mut iter = range.rows();
        let headers: Vec<String> = match iter.next() {
            Some(header_row) => header_row.iter().map(|c| convert(c).text()).collect(),
            None => return Ok(Vec::new()),
        };

        let mut out = Vec::new();
        for raw in iter {
            let mut row = Row::new();
            for (i, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                let cell = raw.get(i).map(convert).unwrap_or_default();
                row.insert(header.clone(), cell);
            }
            out.push(row);
        }
        Ok(out)
    }
}

fn convert(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(naive),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            warn!(cell_error = %e, "unreadable cell treated as empty");
            CellValue::Empty
        }
    }
}

/// Everything the parsing stage hands to the reconciliation engine.
#[derive(Debug, Default)]
pub struct ParsedWorkbook {
    pub accounts: Vec<CandidateAccount>,
    pub interactions: Vec<CandidateInteraction>,
    pub diagnostics: ImportDiagnostics,
}

/// Orchestrates sheet selection and row parsing across the whole workbook.
/// Row-level problems become diagnostics; only a workbook that cannot be
/// materialized at all is an `Err`.
pub struct WorkbookParser;

impl WorkbookParser {
    pub fn parse<W: Workbook>(workbook: &mut W) -> Result<ParsedWorkbook, WorkbookError> {
        let mut parsed = ParsedWorkbook::default();
        let diag = &mut parsed.diagnostics;

        let names = workbook.sheet_names();
        debug!(sheets = ?names, "parsing workbook");
        diag.warning(format!("sheets found: {}", names.join(", ")));

        let Some(account_sheet) = sheets::select_account_sheet(&names).map(str::to_string)
        else {
            diag.error("workbook has no sheets".to_string());
            return Ok(parsed);
        };

        let account_rows = workbook.rows(&account_sheet)?;
        diag.warning(format!(
            "account sheet '{}': {} data rows",
            account_sheet,
            account_rows.len()
        ));
        if let Some(first) = account_rows.first() {
            let mut headers: Vec<&str> = first.keys().map(String::as_str).collect();
            headers.sort_unstable();
            diag.warning(format!("detected columns: {}", headers.join(", ")));
        }

        for (i, row) in account_rows.iter().enumerate() {
            if let Some(candidate) = parse_account_row(row) {
                parsed.accounts.push(candidate);
            } else if !row.values().all(CellValue::is_empty) {
                // Non-blank row that yielded nothing is worth a trace, not
                // an error.
                debug!(row = i + 2, "account row skipped, no identifying field");
            }
        }
        diag.warning(format!("parsed {} account rows", parsed.accounts.len()));

        match sheets::select_interaction_sheet(&names).map(str::to_string) {
            Some(interaction_sheet) => match workbook.rows(&interaction_sheet) {
                Ok(rows) => {
                    for row in &rows {
                        if let Some(candidate) = parse_interaction_row(row) {
                            parsed.interactions.push(candidate);
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "interaction sheet unreadable, skipping");
                    diag.error(format!("interaction sheet skipped: {e}"));
                }
            },
            None => {
                // No dedicated sheet: harvest interaction columns embedded
                // in the account sheet.
                for row in &account_rows {
                    if sheets::row_looks_like_interaction(row) {
                        if let Some(candidate) = parse_interaction_row(row) {
                            parsed.interactions.push(candidate);
                        }
                    }
                }
            }
        }

        Ok(parsed)
    }
}
