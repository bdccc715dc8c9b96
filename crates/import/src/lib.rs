pub mod aliases;
pub mod cell;
pub mod dates;
pub mod engine;
pub mod rows;
pub mod sheets;
pub mod workbook;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::ReconciliationEngine;
pub use workbook::{ParsedWorkbook, Workbook, WorkbookError, WorkbookParser, XlsxWorkbook};

use std::path::Path;

use kliento_core::{AccountStore, ImportResult, UserId};
use tracing::error;

/// Parses `workbook` and reconciles it against `store` on behalf of `actor`.
/// Parser diagnostics are folded into the result ahead of the engine's own,
/// so operators can audit sheet and column detection alongside row outcomes.
pub async fn run_workbook_import<W, S>(
    workbook: &mut W,
    store: &S,
    actor: UserId,
) -> ImportResult
where
    W: Workbook,
    S: AccountStore,
{
    let parsed = match WorkbookParser::parse(workbook) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!(error = %e, "workbook could not be parsed");
            return critical_failure(e);
        }
    };

    let engine = ReconciliationEngine::new(store, actor);
    let mut result = engine.run(&parsed.accounts, &parsed.interactions).await;

    let mut errors = parsed.diagnostics.errors;
    errors.extend(std::mem::take(&mut result.errors));
    result.errors = errors;

    let mut warnings = parsed.diagnostics.warnings;
    warnings.extend(std::mem::take(&mut result.warnings));
    result.warnings = warnings;

    result
}

/// Convenience entry point for a spreadsheet file on disk.
pub async fn run_import<S: AccountStore>(
    path: impl AsRef<Path>,
    store: &S,
    actor: UserId,
) -> ImportResult {
    let mut workbook = match XlsxWorkbook::open(path) {
        Ok(wb) => wb,
        Err(e) => {
            error!(error = %e, "workbook could not be opened");
            return critical_failure(e);
        }
    };
    run_workbook_import(&mut workbook, store, actor).await
}

fn critical_failure(e: WorkbookError) -> ImportResult {
    ImportResult {
        success: false,
        accounts_created: 0,
        interactions_created: 0,
        errors: vec![format!("critical error: {e}")],
        warnings: Vec::new(),
    }
}
