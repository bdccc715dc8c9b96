use serde::{Deserialize, Serialize};

use super::account::UserId;

/// The externally visible outcome of one import run. The calling layer
/// (an upload route, not part of this workspace) renders it as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    pub accounts_created: usize,
    pub interactions_created: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Append-only error/warning accumulator shared by the workbook parser and
/// the reconciliation engine. Entries are surfaced verbatim in the result.
#[derive(Debug, Clone, Default)]
pub struct ImportDiagnostics {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ImportDiagnostics {
    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Run summary written through the activity-log collaborator at the end of
/// an import. The write is best-effort and must not fail the import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub actor: UserId,
    pub accounts_created: usize,
    pub interactions_created: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_serializes_for_the_web_layer() {
        let result = ImportResult {
            success: true,
            accounts_created: 2,
            interactions_created: 1,
            errors: vec![],
            warnings: vec!["jan@x.pl already existed, data updated".into()],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["accounts_created"], 2);
        assert_eq!(json["warnings"][0], "jan@x.pl already existed, data updated");
    }
}
