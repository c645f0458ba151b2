// api/format.rs - Wire shapes for stored rows
//
// Rows carry joined display names; these views nest them as `{id, name}` references the
// way clients consume them. Password hashes never reach a view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::{Donation, Organization, Requirement, User};

/// `{id, name}` reference to a related row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub id: i64,
    pub name: String,
}

impl Reference {
    fn new(id: i64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_organization: bool,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_organization: user.is_organization,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizationView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo: Option<String>,
    pub created_by: Reference,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationView {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: org.name,
            description: org.description,
            website: org.website,
            phone: org.phone,
            email: org.email,
            logo: org.logo,
            created_by: Reference::new(org.created_by, org.creator_name),
            created_at: org.created_at,
            updated_at: org.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequirementView {
    pub id: i64,
    pub organization: Reference,
    #[serde(rename = "type")]
    pub kind: Reference,
    pub status: Reference,
    pub description: String,
    pub quantity: i32,
    pub deadline: Option<DateTime<Utc>>,
    pub percent_complete: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Requirement> for RequirementView {
    fn from(req: Requirement) -> Self {
        Self {
            id: req.id,
            organization: Reference::new(req.organization_id, req.organization_name),
            kind: Reference::new(req.type_id, req.type_name),
            status: Reference::new(req.status_id, req.status_name),
            description: req.description,
            quantity: req.quantity,
            deadline: req.deadline,
            percent_complete: req.percent_complete,
            created_at: req.created_at,
            updated_at: req.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DonationView {
    pub id: i64,
    pub organization: Reference,
    #[serde(rename = "type")]
    pub kind: Reference,
    pub status: Reference,
    pub description: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Donation> for DonationView {
    fn from(donation: Donation) -> Self {
        Self {
            id: donation.id,
            organization: Reference::new(donation.organization_id, donation.organization_name),
            kind: Reference::new(donation.type_id, donation.type_name),
            status: Reference::new(donation.status_id, donation.status_name),
            description: donation.description,
            quantity: donation.quantity,
            created_at: donation.created_at,
            updated_at: donation.updated_at,
        }
    }
}

/// Convert every row of a list into its view
pub fn views<R, V: From<R>>(rows: Vec<R>) -> Vec<V> {
    rows.into_iter().map(V::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_view_never_carries_password_hash() {
        let user = User {
            id: 1,
            name: "Food Bank".to_string(),
            email: "bank@example.org".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            is_organization: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(UserView::from(user)).unwrap();
        assert_eq!(
            value,
            json!({ "id": 1, "name": "Food Bank", "email": "bank@example.org", "is_organization": true })
        );
    }

    #[test]
    fn requirement_view_nests_references() {
        let now = Utc::now();
        let req = Requirement {
            id: 4,
            organization_id: 2,
            organization_name: "Shelter".to_string(),
            type_id: 1,
            type_name: "food".to_string(),
            status_id: 1,
            status_name: "open".to_string(),
            description: "Rice".to_string(),
            quantity: 10,
            deadline: None,
            percent_complete: 0,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(RequirementView::from(req)).unwrap();
        assert_eq!(value["organization"], json!({ "id": 2, "name": "Shelter" }));
        assert_eq!(value["type"], json!({ "id": 1, "name": "food" }));
        assert_eq!(value["status"], json!({ "id": 1, "name": "open" }));
        assert!(value["deadline"].is_null());
    }
}
