use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A requirement row joined with the organization, type and status names.
#[derive(Debug, Clone, FromRow)]
pub struct Requirement {
    pub id: i64,
    pub organization_id: i64,
    pub organization_name: String,
    pub type_id: i64,
    pub type_name: String,
    pub status_id: i64,
    pub status_name: String,
    pub description: String,
    pub quantity: i32,
    pub deadline: Option<DateTime<Utc>>,
    pub percent_complete: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRequirement {
    pub organization_id: i64,
    pub type_id: i64,
    pub status_id: i64,
    pub description: String,
    pub quantity: i32,
    pub deadline: Option<DateTime<Utc>>,
}

/// `description` and `quantity` always replace; the optional fields only when present.
#[derive(Debug, Clone)]
pub struct RequirementChanges {
    pub description: String,
    pub quantity: i32,
    pub percent_complete: Option<i32>,
    pub deadline: Option<DateTime<Utc>>,
}
