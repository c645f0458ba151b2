use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::models::lookup::{SEED_STATUSES, SEED_TYPES};
use super::models::{
    Donation, Lookup, LookupKind, NewOrganization, NewRequirement, NewUser, Organization,
    OrganizationChanges, Requirement, RequirementChanges, User,
};
use super::store::{Store, StoreError};

#[derive(Debug, Clone)]
struct OrganizationRow {
    id: i64,
    name: String,
    description: String,
    website: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    logo: Option<String>,
    created_by: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct RequirementRow {
    id: i64,
    organization_id: i64,
    type_id: i64,
    status_id: i64,
    description: String,
    quantity: i32,
    deadline: Option<DateTime<Utc>>,
    percent_complete: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    organizations: BTreeMap<i64, OrganizationRow>,
    requirements: BTreeMap<i64, RequirementRow>,
    types: BTreeMap<i64, Lookup>,
    statuses: BTreeMap<i64, Lookup>,
    last_user_id: i64,
    last_organization_id: i64,
    last_requirement_id: i64,
}

impl Tables {
    fn seeded() -> Self {
        let mut tables = Self::default();
        tables.types = seed(SEED_TYPES);
        tables.statuses = seed(SEED_STATUSES);
        tables
    }

    fn lookups(&self, kind: LookupKind) -> &BTreeMap<i64, Lookup> {
        match kind {
            LookupKind::Type => &self.types,
            LookupKind::Status => &self.statuses,
        }
    }

    fn join_organization(&self, row: &OrganizationRow) -> Result<Organization, StoreError> {
        let creator = self
            .users
            .get(&row.created_by)
            .ok_or_else(|| StoreError::Query(format!("organization {} has no creator", row.id)))?;

        Ok(Organization {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            website: row.website.clone(),
            phone: row.phone.clone(),
            email: row.email.clone(),
            logo: row.logo.clone(),
            created_by: row.created_by,
            creator_name: creator.name.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn join_requirement(&self, row: &RequirementRow) -> Result<Requirement, StoreError> {
        let dangling = || StoreError::Query(format!("requirement {} has a dangling reference", row.id));
        let organization = self.organizations.get(&row.organization_id).ok_or_else(dangling)?;
        let kind = self.types.get(&row.type_id).ok_or_else(dangling)?;
        let status = self.statuses.get(&row.status_id).ok_or_else(dangling)?;

        Ok(Requirement {
            id: row.id,
            organization_id: row.organization_id,
            organization_name: organization.name.clone(),
            type_id: row.type_id,
            type_name: kind.name.clone(),
            status_id: row.status_id,
            status_name: status.name.clone(),
            description: row.description.clone(),
            quantity: row.quantity,
            deadline: row.deadline,
            percent_complete: row.percent_complete,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn seed(rows: &[(&str, &str)]) -> BTreeMap<i64, Lookup> {
    rows.iter()
        .zip(1..)
        .map(|(&(name, description), id)| {
            (
                id,
                Lookup {
                    id,
                    name: name.to_string(),
                    description: description.to_string(),
                },
            )
        })
        .collect()
}

/// In-process store with the same uniqueness and reference rules as the
/// postgres schema. Intended for tests and local development.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::seeded()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("User".to_string()));
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let row = User {
            id: tables.last_user_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            is_organization: user.is_organization,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_organization(&self, org: NewOrganization) -> Result<Organization, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&org.created_by) {
            return Err(StoreError::MissingReference("created_by"));
        }
        if tables.organizations.values().any(|o| o.name == org.name) {
            return Err(StoreError::Conflict("Organization".to_string()));
        }

        tables.last_organization_id += 1;
        let now = Utc::now();
        let row = OrganizationRow {
            id: tables.last_organization_id,
            name: org.name,
            description: org.description,
            website: org.website,
            phone: org.phone,
            email: Some(org.email),
            logo: org.logo,
            created_by: org.created_by,
            created_at: now,
            updated_at: now,
        };
        let joined = tables.join_organization(&row)?;
        tables.organizations.insert(row.id, row);
        Ok(joined)
    }

    async fn find_organization(&self, id: i64) -> Result<Option<Organization>, StoreError> {
        let tables = self.tables.read().await;
        tables
            .organizations
            .get(&id)
            .map(|row| tables.join_organization(row))
            .transpose()
    }

    async fn list_organizations(&self, created_by: Option<i64>) -> Result<Vec<Organization>, StoreError> {
        let tables = self.tables.read().await;
        tables
            .organizations
            .values()
            .filter(|row| created_by.map_or(true, |user| row.created_by == user))
            .map(|row| tables.join_organization(row))
            .collect()
    }

    async fn update_organization(
        &self,
        id: i64,
        changes: OrganizationChanges,
    ) -> Result<Option<Organization>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.organizations.get_mut(&id) else {
            return Ok(None);
        };

        row.description = changes.description;
        row.website = changes.website;
        row.phone = changes.phone;
        row.email = Some(changes.email);
        row.logo = changes.logo;
        row.updated_at = Utc::now();

        let row = row.clone();
        tables.join_organization(&row).map(Some)
    }

    async fn insert_requirement(&self, requirement: NewRequirement) -> Result<Requirement, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.organizations.contains_key(&requirement.organization_id) {
            return Err(StoreError::MissingReference("organization_id"));
        }
        if !tables.types.contains_key(&requirement.type_id) {
            return Err(StoreError::MissingReference("type_id"));
        }
        if !tables.statuses.contains_key(&requirement.status_id) {
            return Err(StoreError::MissingReference("status_id"));
        }

        tables.last_requirement_id += 1;
        let now = Utc::now();
        let row = RequirementRow {
            id: tables.last_requirement_id,
            organization_id: requirement.organization_id,
            type_id: requirement.type_id,
            status_id: requirement.status_id,
            description: requirement.description,
            quantity: requirement.quantity,
            deadline: requirement.deadline,
            percent_complete: 0,
            created_at: now,
            updated_at: now,
        };
        let joined = tables.join_requirement(&row)?;
        tables.requirements.insert(row.id, row);
        Ok(joined)
    }

    async fn find_requirement(&self, id: i64) -> Result<Option<Requirement>, StoreError> {
        let tables = self.tables.read().await;
        tables
            .requirements
            .get(&id)
            .map(|row| tables.join_requirement(row))
            .transpose()
    }

    async fn list_requirements(&self, organization_id: Option<i64>) -> Result<Vec<Requirement>, StoreError> {
        let tables = self.tables.read().await;
        tables
            .requirements
            .values()
            .filter(|row| organization_id.map_or(true, |org| row.organization_id == org))
            .map(|row| tables.join_requirement(row))
            .collect()
    }

    async fn update_requirement(
        &self,
        id: i64,
        changes: RequirementChanges,
    ) -> Result<Option<Requirement>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.requirements.get_mut(&id) else {
            return Ok(None);
        };

        row.description = changes.description;
        row.quantity = changes.quantity;
        if let Some(percent) = changes.percent_complete {
            row.percent_complete = percent;
        }
        if let Some(deadline) = changes.deadline {
            row.deadline = Some(deadline);
        }
        row.updated_at = Utc::now();

        let row = row.clone();
        tables.join_requirement(&row).map(Some)
    }

    async fn delete_requirement(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.requirements.remove(&id).is_some())
    }

    async fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>, StoreError> {
        Ok(self.tables.read().await.lookups(kind).values().cloned().collect())
    }

    async fn list_donations(&self, _organization_id: Option<i64>) -> Result<Vec<Donation>, StoreError> {
        // Nothing records donations yet; the table only exists to be read.
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, is_organization: bool) -> NewUser {
        NewUser {
            name: "Helping Hands".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            is_organization,
        }
    }

    fn new_org(name: &str, created_by: i64) -> NewOrganization {
        NewOrganization {
            name: name.to_string(),
            description: "Feeds people".to_string(),
            website: None,
            phone: None,
            email: "team@helping.org".to_string(),
            logo: None,
            created_by,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@b.co", false)).await.unwrap();
        let err = store.insert_user(new_user("a@b.co", true)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref what) if what == "User"));
        assert_eq!(store.tables.read().await.users.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_registrations_store_one_user() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let attempts = (0..8).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.insert_user(new_user("race@b.co", false)).await })
        });

        let mut successes = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn organization_joins_creator_and_enforces_unique_name() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("org@b.co", true)).await.unwrap();

        let org = store.insert_organization(new_org("Food Bank", user.id)).await.unwrap();
        assert_eq!(org.creator_name, "Helping Hands");
        assert!(org.is_owned_by(user.id));

        let err = store.insert_organization(new_org("Food Bank", user.id)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let err = store.insert_organization(new_org("Ghost Org", 999)).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference("created_by")));
    }

    #[tokio::test]
    async fn requirement_references_are_checked() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("org@b.co", true)).await.unwrap();
        let org = store.insert_organization(new_org("Food Bank", user.id)).await.unwrap();

        let mut req = NewRequirement {
            organization_id: org.id,
            type_id: 1,
            status_id: 1,
            description: "Rice".to_string(),
            quantity: 50,
            deadline: None,
        };
        let created = store.insert_requirement(req.clone()).await.unwrap();
        assert_eq!(created.type_name, "food");
        assert_eq!(created.status_name, "open");
        assert_eq!(created.percent_complete, 0);

        req.type_id = 99;
        let err = store.insert_requirement(req).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference("type_id")));
    }

    #[tokio::test]
    async fn requirement_update_keeps_absent_optionals() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("org@b.co", true)).await.unwrap();
        let org = store.insert_organization(new_org("Food Bank", user.id)).await.unwrap();
        let created = store
            .insert_requirement(NewRequirement {
                organization_id: org.id,
                type_id: 2,
                status_id: 1,
                description: "Blankets".to_string(),
                quantity: 10,
                deadline: None,
            })
            .await
            .unwrap();

        let changes = RequirementChanges {
            description: "Wool blankets".to_string(),
            quantity: 12,
            percent_complete: Some(40),
            deadline: None,
        };
        let updated = store.update_requirement(created.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.description, "Wool blankets");
        assert_eq!(updated.percent_complete, 40);

        let changes = RequirementChanges {
            description: "Wool blankets".to_string(),
            quantity: 15,
            percent_complete: None,
            deadline: None,
        };
        let updated = store.update_requirement(created.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.quantity, 15);
        assert_eq!(updated.percent_complete, 40);

        assert!(store.delete_requirement(created.id).await.unwrap());
        assert!(!store.delete_requirement(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn lookups_are_seeded() {
        let store = MemoryStore::new();
        let types = store.list_lookups(LookupKind::Type).await.unwrap();
        assert_eq!(types.len(), SEED_TYPES.len());
        assert_eq!(types[0].id, 1);
        let statuses = store.list_lookups(LookupKind::Status).await.unwrap();
        let names: Vec<_> = statuses.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["open", "in_progress", "fulfilled", "closed"]);
    }
}
