// handlers/protected/requirement/create.rs - POST /requirement/ handler

use axum::{extract::State, Extension};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::json;

use crate::api::RequirementView;
use crate::auth::owned_organization;
use crate::database::models::NewRequirement;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::{BodySchema, RequestSchema, Valid};

#[derive(Debug, Deserialize)]
pub struct CreateRequirementRequest {
    pub organization_id: i64,
    pub type_id: i64,
    pub status_id: i64,
    pub description: String,
    pub quantity: i32,
    pub deadline: Option<DateTime<Utc>>,
}

impl RequestSchema for CreateRequirementRequest {
    fn schema() -> &'static BodySchema {
        static SCHEMA: Lazy<BodySchema> = Lazy::new(|| {
            BodySchema::object(
                json!({
                    "organization_id": { "type": "integer", "minimum": 1 },
                    "type_id": { "type": "integer", "minimum": 1 },
                    "status_id": { "type": "integer", "minimum": 1 },
                    "description": super::description_field(),
                    "quantity": super::quantity_field(),
                    "deadline": { "type": ["string", "null"], "format": "date-time" },
                }),
                &["organization_id", "type_id", "status_id", "description", "quantity"],
            )
        });
        &SCHEMA
    }
}

/**
 * POST /requirement/ - Post a need on behalf of one of the caller's organizations
 *
 * The parent organization must exist (404) and belong to the caller (401). Unknown
 * `type_id` / `status_id` come back as field errors from the storage constraints.
 */
pub async fn requirement_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Valid(req): Valid<CreateRequirementRequest>,
) -> ApiResult<RequirementView> {
    owned_organization(
        state.store.as_ref(),
        req.organization_id,
        auth.user_id,
        "create a requirement for this organization",
    )
    .await?;

    let requirement = state
        .store
        .insert_requirement(NewRequirement {
            organization_id: req.organization_id,
            type_id: req.type_id,
            status_id: req.status_id,
            description: req.description,
            quantity: req.quantity,
            deadline: req.deadline,
        })
        .await?;

    tracing::info!(
        "user {} created requirement {} for organization {}",
        auth.user_id,
        requirement.id,
        requirement.organization_id
    );
    Ok(ApiResponse::created("Requirement created successfully", requirement.into()))
}
