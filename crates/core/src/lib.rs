pub mod account;
pub mod interaction;
pub mod report;
pub mod store;

pub use account::{
    AccountFields, AccountId, AccountRecord, AccountStatus, CandidateAccount, UserId,
};
pub use interaction::{
    CandidateInteraction, InteractionId, InteractionKind, InteractionRecord,
};
pub use report::{AuditEntry, ImportDiagnostics, ImportResult};
pub use store::{AccountStore, NewInteraction, StoreError};
