use thiserror::Error;

use super::account::{AccountFields, AccountId, AccountRecord, UserId};
use super::interaction::{InteractionKind, InteractionRecord};
use super::report::AuditEntry;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),
    #[error("storage error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(e: impl std::fmt::Display) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// What to persist for a new interaction.
#[derive(Debug, Clone)]
pub struct NewInteraction {
    pub account_id: AccountId,
    pub author: UserId,
    pub kind: InteractionKind,
    pub happened_at: chrono::NaiveDateTime,
    pub notes: String,
}

/// Persistence collaborator consumed by the reconciliation engine.
///
/// Find-then-create is not atomic here: two imports racing on the same
/// not-yet-existing email can both create it. The underlying store only
/// guarantees atomicity of the individual operations.
pub trait AccountStore {
    fn find_account_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<AccountRecord>, StoreError>> + Send;

    fn find_account_by_org_and_name(
        &self,
        organization: &str,
        first_name: &str,
        last_name: &str,
    ) -> impl std::future::Future<Output = Result<Option<AccountRecord>, StoreError>> + Send;

    /// Natural-key lookup used in the interaction phase: matches either the
    /// email or the organization name. Ambiguous organization names resolve
    /// to the lowest account id.
    fn find_account_by_email_or_org(
        &self,
        identifier: &str,
    ) -> impl std::future::Future<Output = Result<Option<AccountRecord>, StoreError>> + Send;

    fn create_account(
        &self,
        owner: UserId,
        fields: AccountFields,
    ) -> impl std::future::Future<Output = Result<AccountRecord, StoreError>> + Send;

    fn update_account(
        &self,
        id: AccountId,
        fields: AccountFields,
    ) -> impl std::future::Future<Output = Result<AccountRecord, StoreError>> + Send;

    fn create_interaction(
        &self,
        interaction: NewInteraction,
    ) -> impl std::future::Future<Output = Result<InteractionRecord, StoreError>> + Send;

    fn write_audit_log(
        &self,
        entry: AuditEntry,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
