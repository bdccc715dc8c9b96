use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline stage of a lead. `NewLead` is the initial value and the default
/// for rows whose status cell is absent or unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountStatus {
    #[default]
    NewLead,
    Contacted,
    Offer,
    Won,
    Lost,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::NewLead => "new_lead",
            AccountStatus::Contacted => "contacted",
            AccountStatus::Offer => "offer",
            AccountStatus::Won => "won",
            AccountStatus::Lost => "lost",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "contacted" => AccountStatus::Contacted,
            "offer" => AccountStatus::Offer,
            "won" => AccountStatus::Won,
            "lost" => AccountStatus::Lost,
            _ => AccountStatus::NewLead,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed, not-yet-persisted account row. Consumed exactly once by the
/// reconciliation engine and merged into a persisted [`AccountRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateAccount {
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub nip: String,
    pub regon: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    pub source: String,
    pub status: Option<AccountStatus>,
}

impl CandidateAccount {
    /// At least one identifying field must be present for the row to survive
    /// parsing at all.
    pub fn has_identity(&self) -> bool {
        !self.first_name.is_empty()
            || !self.last_name.is_empty()
            || !self.organization.is_empty()
            || !self.email.is_empty()
            || !self.phone.is_empty()
    }

    /// Natural key used to record this account in the identifier map:
    /// email, else organization name, else "first last". Emails are
    /// lowercased so later lookups are case-insensitive.
    pub fn identifier(&self) -> String {
        if !self.email.is_empty() {
            self.email.to_lowercase()
        } else if !self.organization.is_empty() {
            self.organization.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string()
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_organization(&self) -> bool {
        !self.organization.is_empty()
    }
}

/// A persisted account as seen across the storage boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub owner: UserId,
    pub fields: AccountFields,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The mutable field set of an account, shared between creates and merges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountFields {
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub nip: String,
    pub regon: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    pub source: String,
    pub status: AccountStatus,
}

impl AccountFields {
    /// Builds the field set for a brand-new account from a candidate,
    /// defaulting status to the initial stage when unspecified.
    pub fn from_candidate(c: &CandidateAccount) -> Self {
        AccountFields {
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            organization: c.organization.clone(),
            nip: c.nip.clone(),
            regon: c.regon.clone(),
            email: c.email.to_lowercase(),
            phone: c.phone.clone(),
            website: c.website.clone(),
            address: c.address.clone(),
            source: c.source.clone(),
            status: c.status.unwrap_or_default(),
        }
    }

    /// Overlays every non-empty candidate field on top of `self`. Fields the
    /// candidate left blank keep their current value, so a re-import can
    /// never blank out data that was filled in by hand.
    pub fn merge(&self, c: &CandidateAccount) -> Self {
        fn pick(incoming: &str, current: &str) -> String {
            if incoming.is_empty() {
                current.to_string()
            } else {
                incoming.to_string()
            }
        }

        AccountFields {
            first_name: pick(&c.first_name, &self.first_name),
            last_name: pick(&c.last_name, &self.last_name),
            organization: pick(&c.organization, &self.organization),
            nip: pick(&c.nip, &self.nip),
            regon: pick(&c.regon, &self.regon),
            email: pick(&c.email.to_lowercase(), &self.email),
            phone: pick(&c.phone, &self.phone),
            website: pick(&c.website, &self.website),
            address: pick(&c.address, &self.address),
            source: pick(&c.source, &self.source),
            status: c.status.unwrap_or(self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> CandidateAccount {
        CandidateAccount {
            first_name: "Jan".into(),
            last_name: "Kowalski".into(),
            email: "Jan@X.pl".into(),
            ..Default::default()
        }
    }

    #[test]
    fn identity_requires_at_least_one_field() {
        assert!(!CandidateAccount::default().has_identity());
        assert!(candidate().has_identity());
        let phone_only = CandidateAccount {
            phone: "600100200".into(),
            ..Default::default()
        };
        assert!(phone_only.has_identity());
    }

    #[test]
    fn identifier_prefers_email_lowercased() {
        assert_eq!(candidate().identifier(), "jan@x.pl");
    }

    #[test]
    fn identifier_falls_back_to_org_then_name() {
        let org = CandidateAccount {
            organization: "Acme Sp. z o.o.".into(),
            first_name: "Jan".into(),
            ..Default::default()
        };
        assert_eq!(org.identifier(), "Acme Sp. z o.o.");

        let person = CandidateAccount {
            first_name: "Jan".into(),
            last_name: "Kowalski".into(),
            ..Default::default()
        };
        assert_eq!(person.identifier(), "Jan Kowalski");
    }

    #[test]
    fn merge_keeps_existing_when_incoming_blank() {
        let existing = AccountFields {
            phone: "600100200".into(),
            status: AccountStatus::Won,
            ..AccountFields::from_candidate(&candidate())
        };
        let incoming = CandidateAccount {
            first_name: "Janek".into(),
            ..Default::default()
        };
        let merged = existing.merge(&incoming);
        assert_eq!(merged.first_name, "Janek");
        assert_eq!(merged.phone, "600100200");
        assert_eq!(merged.email, "jan@x.pl");
        assert_eq!(merged.status, AccountStatus::Won);
    }

    #[test]
    fn status_db_round_trip() {
        for s in [
            AccountStatus::NewLead,
            AccountStatus::Contacted,
            AccountStatus::Offer,
            AccountStatus::Won,
            AccountStatus::Lost,
        ] {
            assert_eq!(AccountStatus::from_db_str(s.as_str()), s);
        }
        assert_eq!(AccountStatus::from_db_str("garbage"), AccountStatus::NewLead);
    }
}
