use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use super::models::{
    Donation, Lookup, LookupKind, NewOrganization, NewRequirement, NewUser, Organization,
    OrganizationChanges, Requirement, RequirementChanges, User,
};
use super::store::{Store, StoreError};
use crate::config::{redact_database_url, DatabaseConfig};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, is_organization, created_at, updated_at";

const ORGANIZATION_COLUMNS: &str = "o.id, o.name, o.description, o.website, o.phone, o.email, \
     o.logo, o.created_by, u.name AS creator_name, o.created_at, o.updated_at";

const REQUIREMENT_COLUMNS: &str = "r.id, r.organization_id, o.name AS organization_name, \
     r.type_id, t.name AS type_name, r.status_id, s.name AS status_name, r.description, \
     r.quantity, r.deadline, r.percent_complete, r.created_at, r.updated_at";

const REQUIREMENT_JOINS: &str = "JOIN organizations o ON o.id = r.organization_id \
     JOIN types t ON t.id = r.type_id \
     JOIN statuses s ON s.id = r.status_id";

const DONATION_COLUMNS: &str = "d.id, d.organization_id, o.name AS organization_name, \
     d.type_id, t.name AS type_name, d.status_id, s.name AS status_name, d.description, \
     d.quantity, d.created_at, d.updated_at";

/// Postgres-backed store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("DATABASE_URL is not configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!("Connected to database {}", redact_database_url(url));
        Ok(Self::new(pool))
    }

    /// Apply pending migrations from `migrations/`.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Translate driver errors into the storage taxonomy. `resource` labels conflicts.
fn map_err(resource: &str) -> impl FnOnce(sqlx::Error) -> StoreError + '_ {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(resource.to_string()),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::MissingReference(reference_field(db.constraint()))
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        _ => StoreError::Query(err.to_string()),
    }
}

/// Constraint names follow postgres' `<table>_<column>_fkey` default.
fn reference_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("organization_id") => "organization_id",
        Some(c) if c.contains("type_id") => "type_id",
        Some(c) if c.contains("status_id") => "status_id",
        Some(c) if c.contains("created_by") => "created_by",
        _ => "reference",
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_err("health"))?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, is_organization) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.is_organization)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err("User"))
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err("User"))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err("User"))
    }

    async fn insert_organization(&self, org: NewOrganization) -> Result<Organization, StoreError> {
        let sql = format!(
            "WITH o AS ( \
                 INSERT INTO organizations (name, description, website, phone, email, logo, created_by) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING * \
             ) \
             SELECT {ORGANIZATION_COLUMNS} FROM o JOIN users u ON u.id = o.created_by"
        );
        sqlx::query_as::<_, Organization>(&sql)
            .bind(&org.name)
            .bind(&org.description)
            .bind(&org.website)
            .bind(&org.phone)
            .bind(&org.email)
            .bind(&org.logo)
            .bind(org.created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err("Organization"))
    }

    async fn find_organization(&self, id: i64) -> Result<Option<Organization>, StoreError> {
        let sql = format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations o \
             JOIN users u ON u.id = o.created_by WHERE o.id = $1"
        );
        sqlx::query_as::<_, Organization>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err("Organization"))
    }

    async fn list_organizations(&self, created_by: Option<i64>) -> Result<Vec<Organization>, StoreError> {
        let sql = format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations o \
             JOIN users u ON u.id = o.created_by \
             WHERE ($1::BIGINT IS NULL OR o.created_by = $1) ORDER BY o.id"
        );
        sqlx::query_as::<_, Organization>(&sql)
            .bind(created_by)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err("Organization"))
    }

    async fn update_organization(
        &self,
        id: i64,
        changes: OrganizationChanges,
    ) -> Result<Option<Organization>, StoreError> {
        let sql = format!(
            "WITH o AS ( \
                 UPDATE organizations SET description = $2, website = $3, phone = $4, \
                     email = $5, logo = $6, updated_at = now() \
                 WHERE id = $1 RETURNING * \
             ) \
             SELECT {ORGANIZATION_COLUMNS} FROM o JOIN users u ON u.id = o.created_by"
        );
        sqlx::query_as::<_, Organization>(&sql)
            .bind(id)
            .bind(&changes.description)
            .bind(&changes.website)
            .bind(&changes.phone)
            .bind(&changes.email)
            .bind(&changes.logo)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err("Organization"))
    }

    async fn insert_requirement(&self, requirement: NewRequirement) -> Result<Requirement, StoreError> {
        let sql = format!(
            "WITH r AS ( \
                 INSERT INTO requirements (organization_id, type_id, status_id, description, quantity, deadline) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING * \
             ) \
             SELECT {REQUIREMENT_COLUMNS} FROM r {REQUIREMENT_JOINS}"
        );
        sqlx::query_as::<_, Requirement>(&sql)
            .bind(requirement.organization_id)
            .bind(requirement.type_id)
            .bind(requirement.status_id)
            .bind(&requirement.description)
            .bind(requirement.quantity)
            .bind(requirement.deadline)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err("Requirement"))
    }

    async fn find_requirement(&self, id: i64) -> Result<Option<Requirement>, StoreError> {
        let sql = format!("SELECT {REQUIREMENT_COLUMNS} FROM requirements r {REQUIREMENT_JOINS} WHERE r.id = $1");
        sqlx::query_as::<_, Requirement>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err("Requirement"))
    }

    async fn list_requirements(&self, organization_id: Option<i64>) -> Result<Vec<Requirement>, StoreError> {
        let sql = format!(
            "SELECT {REQUIREMENT_COLUMNS} FROM requirements r {REQUIREMENT_JOINS} \
             WHERE ($1::BIGINT IS NULL OR r.organization_id = $1) ORDER BY r.id"
        );
        sqlx::query_as::<_, Requirement>(&sql)
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err("Requirement"))
    }

    async fn update_requirement(
        &self,
        id: i64,
        changes: RequirementChanges,
    ) -> Result<Option<Requirement>, StoreError> {
        let sql = format!(
            "WITH r AS ( \
                 UPDATE requirements SET description = $2, quantity = $3, \
                     percent_complete = COALESCE($4, percent_complete), \
                     deadline = COALESCE($5, deadline), updated_at = now() \
                 WHERE id = $1 RETURNING * \
             ) \
             SELECT {REQUIREMENT_COLUMNS} FROM r {REQUIREMENT_JOINS}"
        );
        sqlx::query_as::<_, Requirement>(&sql)
            .bind(id)
            .bind(&changes.description)
            .bind(changes.quantity)
            .bind(changes.percent_complete)
            .bind(changes.deadline)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err("Requirement"))
    }

    async fn delete_requirement(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM requirements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err("Requirement"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>, StoreError> {
        let sql = format!("SELECT id, name, description FROM {} ORDER BY id", kind.table());
        sqlx::query_as::<_, Lookup>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err(kind.table()))
    }

    async fn list_donations(&self, organization_id: Option<i64>) -> Result<Vec<Donation>, StoreError> {
        let sql = format!(
            "SELECT {DONATION_COLUMNS} FROM donations d \
             JOIN organizations o ON o.id = d.organization_id \
             JOIN types t ON t.id = d.type_id \
             JOIN statuses s ON s.id = d.status_id \
             WHERE ($1::BIGINT IS NULL OR d.organization_id = $1) ORDER BY d.id"
        );
        sqlx::query_as::<_, Donation>(&sql)
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err("Donation"))
    }
}
