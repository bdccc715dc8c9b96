use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use kliento_core::{
    AccountFields, AccountId, AccountRecord, AccountStatus, AccountStore, AuditEntry,
    InteractionId, InteractionKind, InteractionRecord, NewInteraction, StoreError, UserId,
};

use crate::db::DbPool;

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Sqlite-backed persistence collaborator for the import engine.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

type AccountRow = (
    i64,    // id
    i64,    // owner_id
    String, // first_name
    String, // last_name
    String, // organization
    String, // nip
    String, // regon
    String, // email
    String, // phone
    String, // website
    String, // address
    String, // source
    String, // status
    String, // created_at
);

const ACCOUNT_COLUMNS: &str = "id, owner_id, first_name, last_name, organization, nip, regon, \
     email, phone, website, address, source, status, created_at";

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        SqliteStore { pool }
    }

    async fn fetch_account(&self, id: AccountId) -> Result<AccountRecord, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        row.map(map_account).ok_or(StoreError::AccountNotFound(id))
    }
}

fn map_account(r: AccountRow) -> AccountRecord {
    AccountRecord {
        id: AccountId(r.0),
        owner: UserId(r.1),
        fields: AccountFields {
            first_name: r.2,
            last_name: r.3,
            organization: r.4,
            nip: r.5,
            regon: r.6,
            email: r.7,
            phone: r.8,
            website: r.9,
            address: r.10,
            source: r.11,
            status: AccountStatus::from_db_str(&r.12),
        },
        created_at: parse_db_datetime(&r.13),
    }
}

fn parse_db_datetime(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .map(|n| n.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

impl AccountStore for SqliteStore {
    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountRecord>, StoreError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts \
             WHERE email <> '' AND lower(email) = lower(?) ORDER BY id LIMIT 1"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(map_account))
    }

    async fn find_account_by_org_and_name(
        &self,
        organization: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<AccountRecord>, StoreError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts \
             WHERE organization = ? AND first_name = ? AND last_name = ? \
             ORDER BY id LIMIT 1"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(organization)
            .bind(first_name)
            .bind(last_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(map_account))
    }

    async fn find_account_by_email_or_org(
        &self,
        identifier: &str,
    ) -> Result<Option<AccountRecord>, StoreError> {
        // Ambiguous organization names resolve to the lowest id, which makes
        // the choice deterministic (oldest account wins).
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts \
             WHERE (email <> '' AND lower(email) = lower(?)) OR organization = ? \
             ORDER BY id LIMIT 1"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(identifier)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(map_account))
    }

    async fn create_account(
        &self,
        owner: UserId,
        fields: AccountFields,
    ) -> Result<AccountRecord, StoreError> {
        let result = sqlx::query(
            "INSERT INTO accounts (owner_id, first_name, last_name, organization, nip, regon, \
             email, phone, website, address, source, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(owner.0)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.organization)
        .bind(&fields.nip)
        .bind(&fields.regon)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.website)
        .bind(&fields.address)
        .bind(&fields.source)
        .bind(fields.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        let id = AccountId(result.last_insert_rowid());
        debug!(account_id = %id, "account created");
        self.fetch_account(id).await
    }

    async fn update_account(
        &self,
        id: AccountId,
        fields: AccountFields,
    ) -> Result<AccountRecord, StoreError> {
        let result = sqlx::query(
            "UPDATE accounts SET first_name = ?, last_name = ?, organization = ?, nip = ?, \
             regon = ?, email = ?, phone = ?, website = ?, address = ?, source = ?, status = ? \
             WHERE id = ?",
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.organization)
        .bind(&fields.nip)
        .bind(&fields.regon)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.website)
        .bind(&fields.address)
        .bind(&fields.source)
        .bind(fields.status.as_str())
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AccountNotFound(id));
        }
        self.fetch_account(id).await
    }

    async fn create_interaction(
        &self,
        interaction: NewInteraction,
    ) -> Result<InteractionRecord, StoreError> {
        let happened_at = interaction.happened_at.format(DATETIME_FMT).to_string();
        let result = sqlx::query(
            "INSERT INTO interactions (account_id, author_id, kind, happened_at, notes) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(interaction.account_id.0)
        .bind(interaction.author.0)
        .bind(interaction.kind.as_str())
        .bind(&happened_at)
        .bind(&interaction.notes)
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(InteractionRecord {
            id: InteractionId(result.last_insert_rowid()),
            account_id: interaction.account_id,
            author: interaction.author,
            kind: interaction.kind,
            happened_at: interaction.happened_at,
            notes: interaction.notes,
        })
    }

    async fn write_audit_log(&self, entry: AuditEntry) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&entry).map_err(StoreError::backend)?;
        sqlx::query("INSERT INTO audit_log (actor_id, entry) VALUES (?, ?)")
            .bind(entry.actor.0)
            .bind(&payload)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }
}
