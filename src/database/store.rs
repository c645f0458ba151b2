use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{
    Donation, Lookup, LookupKind, NewOrganization, NewRequirement, NewUser, Organization,
    OrganizationChanges, Requirement, RequirementChanges, User,
};

/// Errors from a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness rule rejected the write; carries the resource label.
    #[error("{0} violates a uniqueness constraint")]
    Conflict(String),

    /// A foreign key pointed at nothing; carries the referencing field.
    #[error("reference '{0}' points at a missing row")]
    MissingReference(&'static str),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("migration error: {0}")]
    Migration(String),
}

/// The storage handle injected into every handler.
///
/// Writes are single-row and atomic. Uniqueness and referential integrity are enforced by
/// the backend itself and surface as `Conflict` / `MissingReference`, never by a
/// check-then-insert in the caller. Lists are ordered by id ascending.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    // Users
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    // Organizations
    async fn insert_organization(&self, org: NewOrganization) -> Result<Organization, StoreError>;
    async fn find_organization(&self, id: i64) -> Result<Option<Organization>, StoreError>;
    async fn list_organizations(&self, created_by: Option<i64>) -> Result<Vec<Organization>, StoreError>;
    async fn update_organization(
        &self,
        id: i64,
        changes: OrganizationChanges,
    ) -> Result<Option<Organization>, StoreError>;

    // Requirements
    async fn insert_requirement(&self, requirement: NewRequirement) -> Result<Requirement, StoreError>;
    async fn find_requirement(&self, id: i64) -> Result<Option<Requirement>, StoreError>;
    async fn list_requirements(&self, organization_id: Option<i64>) -> Result<Vec<Requirement>, StoreError>;
    async fn update_requirement(
        &self,
        id: i64,
        changes: RequirementChanges,
    ) -> Result<Option<Requirement>, StoreError>;
    /// Returns false when no row had that id.
    async fn delete_requirement(&self, id: i64) -> Result<bool, StoreError>;

    // Lookups
    async fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>, StoreError>;

    // Donations
    async fn list_donations(&self, organization_id: Option<i64>) -> Result<Vec<Donation>, StoreError>;
}
