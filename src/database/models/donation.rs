use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A fulfillment record against an organization, joined like a requirement.
#[derive(Debug, Clone, FromRow)]
pub struct Donation {
    pub id: i64,
    pub organization_id: i64,
    pub organization_name: String,
    pub type_id: i64,
    pub type_name: String,
    pub status_id: i64,
    pub status_name: String,
    pub description: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
