use regex::Regex;
use std::sync::LazyLock;

use crate::aliases;
use crate::cell::Row;

static ACCOUNT_SHEET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"klien|kontrahen|firm|account|client|lead").unwrap());

static INTERACTION_SHEET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"kontakt|interak|histori|contact|interaction|activit").unwrap());

/// Picks the sheet holding account rows. A workbook with no keyword hit is
/// assumed to keep accounts on its first sheet.
pub fn select_account_sheet(sheet_names: &[String]) -> Option<&str> {
    sheet_names
        .iter()
        .find(|name| ACCOUNT_SHEET.is_match(&name.to_lowercase()))
        .or_else(|| sheet_names.first())
        .map(String::as_str)
}

/// Picks the dedicated interaction sheet, if any. `None` means the caller
/// should look for interaction columns embedded in the account sheet.
pub fn select_interaction_sheet(sheet_names: &[String]) -> Option<&str> {
    sheet_names
        .iter()
        .find(|name| INTERACTION_SHEET.is_match(&name.to_lowercase()))
        .map(String::as_str)
}

/// Heuristic for harvesting interactions embedded in the account sheet:
/// the row must carry at least one interaction-indicator column.
pub fn row_looks_like_interaction(row: &Row) -> bool {
    let indicators = aliases::INTERACTION_KIND
        .iter()
        .chain(aliases::INTERACTION_NOTES.iter());
    for key in indicators {
        if row.get(*key).is_some_and(|cell| !cell.is_empty()) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn account_sheet_matched_by_keyword_in_either_language() {
        let sheets = names(&["Podsumowanie", "Klienci", "Kontakty"]);
        assert_eq!(select_account_sheet(&sheets), Some("Klienci"));

        let sheets = names(&["Summary", "Accounts"]);
        assert_eq!(select_account_sheet(&sheets), Some("Accounts"));
    }

    #[test]
    fn account_sheet_falls_back_to_first() {
        let sheets = names(&["Arkusz1"]);
        assert_eq!(select_account_sheet(&sheets), Some("Arkusz1"));
        assert_eq!(select_account_sheet(&[]), None);
    }

    #[test]
    fn interaction_sheet_is_optional() {
        let sheets = names(&["Klienci", "Historia kontaktów"]);
        assert_eq!(select_interaction_sheet(&sheets), Some("Historia kontaktów"));

        let sheets = names(&["Klienci"]);
        assert_eq!(select_interaction_sheet(&sheets), None);
    }

    #[test]
    fn interaction_sheet_keyword_does_not_eat_kontrahenci() {
        // "Kontrahenci" is an account sheet, not an interaction sheet.
        let sheets = names(&["Kontrahenci"]);
        assert_eq!(select_account_sheet(&sheets), Some("Kontrahenci"));
        assert_eq!(select_interaction_sheet(&sheets), None);
    }

    #[test]
    fn embedded_interaction_rows_need_an_indicator_column() {
        let mut row = Row::new();
        row.insert("Imię".into(), CellValue::Text("Jan".into()));
        assert!(!row_looks_like_interaction(&row));

        row.insert("Notatka".into(), CellValue::Text("rozmowa wstępna".into()));
        assert!(row_looks_like_interaction(&row));
    }

    #[test]
    fn blank_indicator_cells_do_not_count() {
        let mut row = Row::new();
        row.insert("Notatka".into(), CellValue::Empty);
        row.insert("Typ".into(), CellValue::Text("  ".into()));
        assert!(!row_looks_like_interaction(&row));
    }
}
