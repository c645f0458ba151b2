use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// An organization row joined with its creator's display name.
#[derive(Debug, Clone, FromRow)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo: Option<String>,
    pub created_by: i64,
    pub creator_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.created_by == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub logo: Option<String>,
    pub created_by: i64,
}

/// Full replacement of the mutable columns; `None` clears the optional ones.
#[derive(Debug, Clone)]
pub struct OrganizationChanges {
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub logo: Option<String>,
}
