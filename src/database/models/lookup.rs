use serde::Serialize;
use sqlx::FromRow;

/// Row of one of the `types` / `statuses` lookup tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Lookup {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Type,
    Status,
}

impl LookupKind {
    pub fn table(self) -> &'static str {
        match self {
            LookupKind::Type => "types",
            LookupKind::Status => "statuses",
        }
    }
}

/// Starter rows shared by the migration and the in-memory store.
pub const SEED_TYPES: &[(&str, &str)] = &[
    ("food", "Meals, groceries and dry rations"),
    ("clothing", "Garments, footwear and blankets"),
    ("medical", "Medicines and medical supplies"),
    ("education", "Books, stationery and school supplies"),
    ("money", "Monetary contributions"),
];

pub const SEED_STATUSES: &[(&str, &str)] = &[
    ("open", "Accepting donations"),
    ("in_progress", "Partially fulfilled"),
    ("fulfilled", "Fully met"),
    ("closed", "No longer accepting donations"),
];
