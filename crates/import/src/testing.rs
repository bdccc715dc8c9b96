//! Test doubles shared by the import crate's unit and end-to-end tests.

use std::sync::Mutex;

use chrono::Utc;

use kliento_core::{
    AccountFields, AccountId, AccountRecord, AccountStore, AuditEntry, InteractionId,
    InteractionRecord, NewInteraction, StoreError, UserId,
};

use crate::cell::{CellValue, Row};
use crate::workbook::{Workbook, WorkbookError};

/// In-memory workbook: a list of named sheets with pre-materialized rows.
pub(crate) struct VecWorkbook {
    sheets: Vec<(String, Vec<Row>)>,
}

impl VecWorkbook {
    pub fn new(sheets: Vec<(&str, Vec<Row>)>) -> Self {
        VecWorkbook {
            sheets: sheets
                .into_iter()
                .map(|(n, r)| (n.to_string(), r))
                .collect(),
        }
    }
}

impl Workbook for VecWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(n, _)| n.clone()).collect()
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Row>, WorkbookError> {
        self.sheets
            .iter()
            .find(|(n, _)| n == sheet)
            .map(|(_, r)| r.clone())
            .ok_or_else(|| WorkbookError::Sheet(sheet.to_string(), "missing".to_string()))
    }
}

pub(crate) fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), CellValue::Text(v.to_string())))
        .collect()
}

/// In-memory store double; the `fail_*` switches simulate persistence
/// failures for per-row isolation tests.
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub state: Mutex<State>,
    pub fail_creates: bool,
    pub fail_audit: bool,
}

#[derive(Default)]
pub(crate) struct State {
    pub accounts: Vec<AccountRecord>,
    pub interactions: Vec<InteractionRecord>,
    pub audit_entries: Vec<AuditEntry>,
    next_id: i64,
}

impl MemoryStore {
    pub fn account_count(&self) -> usize {
        self.state.lock().unwrap().accounts.len()
    }

    pub fn interaction_count(&self) -> usize {
        self.state.lock().unwrap().interactions.len()
    }

    pub fn account_by_email(&self, email: &str) -> Option<AccountRecord> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.fields.email == email)
            .cloned()
    }
}

impl AccountStore for MemoryStore {
    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.account_by_email(email))
    }

    async fn find_account_by_org_and_name(
        &self,
        organization: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| {
                a.fields.organization == organization
                    && a.fields.first_name == first_name
                    && a.fields.last_name == last_name
            })
            .cloned())
    }

    async fn find_account_by_email_or_org(
        &self,
        identifier: &str,
    ) -> Result<Option<AccountRecord>, StoreError> {
        let state = self.state.lock().unwrap();
        // Lowest id wins on ambiguous organization names.
        Ok(state
            .accounts
            .iter()
            .filter(|a| {
                a.fields.email == identifier.to_lowercase()
                    || a.fields.organization == identifier
            })
            .min_by_key(|a| a.id.0)
            .cloned())
    }

    async fn create_account(
        &self,
        owner: UserId,
        fields: AccountFields,
    ) -> Result<AccountRecord, StoreError> {
        if self.fail_creates {
            return Err(StoreError::Backend("database is on fire".into()));
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let record = AccountRecord {
            id: AccountId(state.next_id),
            owner,
            fields,
            created_at: Utc::now(),
        };
        state.accounts.push(record.clone());
        Ok(record)
    }

    async fn update_account(
        &self,
        id: AccountId,
        fields: AccountFields,
    ) -> Result<AccountRecord, StoreError> {
        let mut state = self.state.lock().unwrap();
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::AccountNotFound(id))?;
        account.fields = fields;
        Ok(account.clone())
    }

    async fn create_interaction(
        &self,
        interaction: NewInteraction,
    ) -> Result<InteractionRecord, StoreError> {
        if self.fail_creates {
            return Err(StoreError::Backend("database is on fire".into()));
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let record = InteractionRecord {
            id: InteractionId(state.next_id),
            account_id: interaction.account_id,
            author: interaction.author,
            kind: interaction.kind,
            happened_at: interaction.happened_at,
            notes: interaction.notes,
        };
        state.interactions.push(record.clone());
        Ok(record)
    }

    async fn write_audit_log(&self, entry: AuditEntry) -> Result<(), StoreError> {
        if self.fail_audit {
            return Err(StoreError::Backend("audit table locked".into()));
        }
        self.state.lock().unwrap().audit_entries.push(entry);
        Ok(())
    }
}
