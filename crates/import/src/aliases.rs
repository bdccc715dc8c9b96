//! Static header-alias tables: accepted spellings, Polish and English, for
//! every field the row parsers resolve. Kept as data so a new spelling is a
//! one-line change.

use kliento_core::{AccountStatus, InteractionKind};

pub const FIRST_NAME: &[&str] = &["Imię", "Imie", "imię", "imie", "First name", "First Name", "FirstName", "first_name"];
pub const LAST_NAME: &[&str] = &["Nazwisko", "nazwisko", "Last name", "Last Name", "Surname", "LastName", "last_name"];
pub const FULL_NAME: &[&str] = &["Imię i nazwisko", "Imie i nazwisko", "Osoba", "Full name", "Full Name", "Name", "Nazwa kontaktu"];
pub const ORGANIZATION: &[&str] = &["Firma", "firma", "Nazwa firmy", "Company", "Organizacja", "Organization", "Organisation", "company_name"];
pub const NIP: &[&str] = &["NIP", "Nip", "nip", "Tax ID", "Tax Id", "VAT ID"];
pub const REGON: &[&str] = &["REGON", "Regon", "regon"];
pub const EMAIL: &[&str] = &["Email", "E-mail", "email", "e-mail", "Mail", "Adres email", "Adres e-mail"];
pub const PHONE: &[&str] = &["Telefon", "telefon", "Phone", "Tel", "Tel.", "Numer telefonu", "phone_number", "Komórka"];
pub const WEBSITE: &[&str] = &["Strona", "Strona www", "WWW", "www", "Website", "Web", "Strona internetowa"];
pub const ADDRESS: &[&str] = &["Adres", "adres", "Address", "Adres siedziby", "Ulica"];
pub const SOURCE: &[&str] = &["Źródło", "Zrodlo", "źródło", "Source", "Źródło pozyskania", "Lead source"];
pub const STATUS: &[&str] = &["Status", "status", "Etap", "etap", "Stage"];

pub const INTERACTION_KIND: &[&str] = &["Typ", "typ", "Rodzaj", "rodzaj", "Typ kontaktu", "Type", "Kind"];
pub const INTERACTION_DATE: &[&str] = &["Data", "data", "Data kontaktu", "Date", "Datetime", "Czas"];
pub const INTERACTION_NOTES: &[&str] = &["Notatka", "Notatki", "notatka", "Uwagi", "Opis", "Notes", "Note", "Description"];
pub const INTERACTION_IDENTIFIER: &[&str] = &["Klient", "klient", "Kontrahent", "Identyfikator", "Account", "Client", "Customer", "Kontakt z"];

/// Free-text status label -> canonical stage. Lookup is lowercase; anything
/// not in the table stays at the initial stage.
pub const STATUS_LABELS: &[(&str, AccountStatus)] = &[
    ("nowy", AccountStatus::NewLead),
    ("nowy lead", AccountStatus::NewLead),
    ("new", AccountStatus::NewLead),
    ("new lead", AccountStatus::NewLead),
    ("kontakt", AccountStatus::Contacted),
    ("w kontakcie", AccountStatus::Contacted),
    ("contacted", AccountStatus::Contacted),
    ("oferta", AccountStatus::Offer),
    ("wysłano ofertę", AccountStatus::Offer),
    ("offer", AccountStatus::Offer),
    ("proposal", AccountStatus::Offer),
    ("wygrany", AccountStatus::Won),
    ("wygrana", AccountStatus::Won),
    ("won", AccountStatus::Won),
    ("przegrany", AccountStatus::Lost),
    ("przegrana", AccountStatus::Lost),
    ("lost", AccountStatus::Lost),
];

/// Free-text interaction-kind label -> canonical kind, same convention.
pub const KIND_LABELS: &[(&str, InteractionKind)] = &[
    ("telefon", InteractionKind::Call),
    ("rozmowa", InteractionKind::Call),
    ("rozmowa telefoniczna", InteractionKind::Call),
    ("call", InteractionKind::Call),
    ("phone", InteractionKind::Call),
    ("spotkanie", InteractionKind::Meeting),
    ("meeting", InteractionKind::Meeting),
    ("email", InteractionKind::Email),
    ("e-mail", InteractionKind::Email),
    ("mail", InteractionKind::Email),
    ("notatka", InteractionKind::Note),
    ("note", InteractionKind::Note),
    ("inne", InteractionKind::Other),
    ("other", InteractionKind::Other),
];

pub fn status_from_label(label: &str) -> Option<AccountStatus> {
    let needle = label.trim().to_lowercase();
    STATUS_LABELS
        .iter()
        .find(|(l, _)| *l == needle)
        .map(|(_, s)| *s)
}

pub fn kind_from_label(label: &str) -> Option<InteractionKind> {
    let needle = label.trim().to_lowercase();
    KIND_LABELS
        .iter()
        .find(|(l, _)| *l == needle)
        .map(|(_, k)| *k)
}
