use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::{AccountId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionId(pub i64);

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of contact with an account. Rows with an absent or unrecognized
/// kind cell fall back to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionKind {
    Call,
    Meeting,
    Email,
    Note,
    #[default]
    Other,
}

impl InteractionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionKind::Call => "call",
            InteractionKind::Meeting => "meeting",
            InteractionKind::Email => "email",
            InteractionKind::Note => "note",
            InteractionKind::Other => "other",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "call" => InteractionKind::Call,
            "meeting" => InteractionKind::Meeting,
            "email" => InteractionKind::Email,
            "note" => InteractionKind::Note,
            _ => InteractionKind::Other,
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed, not-yet-persisted interaction row. `account_identifier` is the
/// natural key (email, organization name, or "first last") that the engine
/// resolves to a persisted account id; it is never stored itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInteraction {
    pub account_identifier: String,
    pub kind: InteractionKind,
    pub happened_at: NaiveDateTime,
    pub notes: String,
}

/// A persisted interaction. Interactions are append-only history: the import
/// always creates them, never updates or deduplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: InteractionId,
    pub account_id: AccountId,
    pub author: UserId,
    pub kind: InteractionKind,
    pub happened_at: NaiveDateTime,
    pub notes: String,
}
