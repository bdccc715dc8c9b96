use kliento_core::{CandidateAccount, CandidateInteraction, InteractionKind};

use crate::aliases;
use crate::cell::{find_by_aliases, find_cell_by_aliases, Row};
use crate::dates;

/// Placeholder display name for accounts that arrive with only an email or
/// phone number.
const UNKNOWN_NAME: &str = "unknown";

/// Turns one raw row into an account candidate, or `None` when the row has
/// no usable identity at all.
pub fn parse_account_row(row: &Row) -> Option<CandidateAccount> {
    let (first_name, mut last_name) = resolve_name(row);
    let organization = find_by_aliases(row, aliases::ORGANIZATION).unwrap_or_default();

    let mut candidate = CandidateAccount {
        first_name: String::new(),
        last_name: String::new(),
        organization,
        nip: find_by_aliases(row, aliases::NIP).unwrap_or_default(),
        regon: find_by_aliases(row, aliases::REGON).unwrap_or_default(),
        email: find_by_aliases(row, aliases::EMAIL).unwrap_or_default(),
        phone: find_by_aliases(row, aliases::PHONE).unwrap_or_default(),
        website: find_by_aliases(row, aliases::WEBSITE).unwrap_or_default(),
        address: find_by_aliases(row, aliases::ADDRESS).unwrap_or_default(),
        source: find_by_aliases(row, aliases::SOURCE).unwrap_or_default(),
        status: find_by_aliases(row, aliases::STATUS)
            .and_then(|label| aliases::status_from_label(&label)),
    };

    // Every surviving candidate gets a usable display name: fall back to the
    // organization name, then to a literal placeholder.
    if first_name.is_empty() && last_name.is_empty() {
        if !candidate.organization.is_empty() {
            last_name = candidate.organization.clone();
        } else if !candidate.email.is_empty() || !candidate.phone.is_empty() {
            last_name = UNKNOWN_NAME.to_string();
        }
    }
    candidate.first_name = first_name;
    candidate.last_name = last_name;

    candidate.has_identity().then_some(candidate)
}

/// Separate first/last columns win; otherwise a combined full-name cell is
/// split on its first whitespace run.
fn resolve_name(row: &Row) -> (String, String) {
    let first = find_by_aliases(row, aliases::FIRST_NAME).unwrap_or_default();
    let last = find_by_aliases(row, aliases::LAST_NAME).unwrap_or_default();
    if !first.is_empty() || !last.is_empty() {
        return (first, last);
    }

    match find_by_aliases(row, aliases::FULL_NAME) {
        Some(full) => match full.split_once(char::is_whitespace) {
            Some((head, tail)) => (head.to_string(), tail.trim().to_string()),
            None => (full, String::new()),
        },
        None => (String::new(), String::new()),
    }
}

/// Turns one raw row into an interaction candidate. Rows without both an
/// account identifier and notes are discarded.
pub fn parse_interaction_row(row: &Row) -> Option<CandidateInteraction> {
    let account_identifier = find_by_aliases(row, aliases::INTERACTION_IDENTIFIER)
        .or_else(|| find_by_aliases(row, aliases::EMAIL))
        .or_else(|| find_by_aliases(row, aliases::ORGANIZATION))
        .unwrap_or_default();
    let notes = find_by_aliases(row, aliases::INTERACTION_NOTES).unwrap_or_default();

    if account_identifier.is_empty() || notes.is_empty() {
        return None;
    }

    let kind = find_by_aliases(row, aliases::INTERACTION_KIND)
        .and_then(|label| aliases::kind_from_label(&label))
        .unwrap_or(InteractionKind::Other);

    let happened_at = match find_cell_by_aliases(row, aliases::INTERACTION_DATE) {
        Some(cell) => dates::coerce(cell),
        None => chrono::Utc::now().naive_utc(),
    };

    Some(CandidateInteraction {
        account_identifier,
        kind,
        happened_at,
        notes,
    })
}
