use std::collections::HashMap;

use tracing::{debug, warn};

use kliento_core::{
    AccountFields, AccountId, AccountRecord, AccountStore, AuditEntry, CandidateAccount,
    CandidateInteraction, ImportDiagnostics, ImportResult, NewInteraction, StoreError, UserId,
};

/// Run-scoped cache mapping a natural-key identifier (lowercased email,
/// organization name, or "first last") to the persisted account id it
/// resolved to during the account phase.
type IdentifierMap = HashMap<String, AccountId>;

/// Two-phase import: accounts first (find-or-create with merge), then
/// interactions resolved against the identifier map built in phase one.
/// One engine value serves exactly one run; nothing is shared across runs.
pub struct ReconciliationEngine<'a, S: AccountStore> {
    store: &'a S,
    actor: UserId,
}

impl<'a, S: AccountStore> ReconciliationEngine<'a, S> {
    pub fn new(store: &'a S, actor: UserId) -> Self {
        ReconciliationEngine { store, actor }
    }

    pub async fn run(
        &self,
        accounts: &[CandidateAccount],
        interactions: &[CandidateInteraction],
    ) -> ImportResult {
        let mut diag = ImportDiagnostics::default();
        let mut identifier_map = IdentifierMap::new();
        let mut accounts_created = 0usize;
        let mut interactions_created = 0usize;

        debug!(
            accounts = accounts.len(),
            interactions = interactions.len(),
            actor = %self.actor,
            "starting reconciliation"
        );

        // Phase 1: accounts, strictly in input order so the identifier map
        // is fully populated before any interaction reads it.
        for candidate in accounts {
            match self.import_account(candidate, &mut identifier_map, &mut diag).await {
                Ok(created) => {
                    if created {
                        accounts_created += 1;
                    }
                }
                Err(e) => {
                    diag.error(format!(
                        "failed to import account {}: {e}",
                        candidate.display_name()
                    ));
                }
            }
        }

        // Phase 2: interactions, each resolved and created independently.
        for candidate in interactions {
            match self.import_interaction(candidate, &mut identifier_map).await {
                Ok(true) => interactions_created += 1,
                Ok(false) => {
                    diag.error(format!(
                        "no account found for interaction: {}",
                        candidate.account_identifier
                    ));
                }
                Err(e) => {
                    diag.error(format!(
                        "failed to import interaction for {}: {e}",
                        candidate.account_identifier
                    ));
                }
            }
        }

        // Best-effort audit write: its failure is a warning, never an
        // import failure.
        let entry = AuditEntry {
            actor: self.actor,
            accounts_created,
            interactions_created,
            error_count: diag.errors.len(),
            warning_count: diag.warnings.len(),
        };
        if let Err(e) = self.store.write_audit_log(entry).await {
            warn!(error = %e, "audit log write failed");
            diag.warning(format!("audit log write failed: {e}"));
        }

        ImportResult {
            success: true,
            accounts_created,
            interactions_created,
            errors: diag.errors,
            warnings: diag.warnings,
        }
    }

    /// Find-or-create one account. Returns whether a new account was created.
    async fn import_account(
        &self,
        candidate: &CandidateAccount,
        identifier_map: &mut IdentifierMap,
        diag: &mut ImportDiagnostics,
    ) -> Result<bool, StoreError> {
        let identifier = candidate.identifier();

        let existing = self.find_existing(candidate).await?;
        match existing {
            Some(account) => {
                let merged = account.fields.merge(candidate);
                self.store.update_account(account.id, merged).await?;
                diag.warning(format!("{identifier} already existed, data updated"));
                identifier_map.insert(identifier, account.id);
                Ok(false)
            }
            None => {
                let fields = AccountFields::from_candidate(candidate);
                let account = self.store.create_account(self.actor, fields).await?;
                identifier_map.insert(identifier, account.id);
                Ok(true)
            }
        }
    }

    async fn find_existing(
        &self,
        candidate: &CandidateAccount,
    ) -> Result<Option<AccountRecord>, StoreError> {
        if !candidate.email.is_empty() {
            let found = self
                .store
                .find_account_by_email(&candidate.email.to_lowercase())
                .await?;
            if found.is_some() {
                return Ok(found);
            }
        }
        if !candidate.organization.is_empty() {
            return self
                .store
                .find_account_by_org_and_name(
                    &candidate.organization,
                    &candidate.first_name,
                    &candidate.last_name,
                )
                .await;
        }
        Ok(None)
    }

    /// Resolve-and-create one interaction. `Ok(false)` means no owning
    /// account could be found; the interaction is skipped, never orphaned.
    async fn import_interaction(
        &self,
        candidate: &CandidateInteraction,
        identifier_map: &mut IdentifierMap,
    ) -> Result<bool, StoreError> {
        let account_id = match self.resolve_account(candidate, identifier_map).await? {
            Some(id) => id,
            None => return Ok(false),
        };

        self.store
            .create_interaction(NewInteraction {
                account_id,
                author: self.actor,
                kind: candidate.kind,
                happened_at: candidate.happened_at,
                notes: candidate.notes.clone(),
            })
            .await?;
        Ok(true)
    }

    /// First the run-scoped identifier map, then a direct store lookup that
    /// backfills the map so repeated identifiers hit the cache.
    async fn resolve_account(
        &self,
        candidate: &CandidateInteraction,
        identifier_map: &mut IdentifierMap,
    ) -> Result<Option<AccountId>, StoreError> {
        let identifier = &candidate.account_identifier;
        if let Some(id) = identifier_map
            .get(identifier)
            .or_else(|| identifier_map.get(&identifier.to_lowercase()))
        {
            return Ok(Some(*id));
        }

        match self.store.find_account_by_email_or_org(identifier).await? {
            Some(account) => {
                identifier_map.insert(identifier.clone(), account.id);
                Ok(Some(account.id))
            }
            None => Ok(None),
        }
    }
}
