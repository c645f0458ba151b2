// handlers/protected/requirement/update.rs - PUT /requirement/:id handler

use axum::{extract::State, Extension};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::json;

use crate::api::{IdPath, RequirementView};
use crate::database::models::RequirementChanges;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::{BodySchema, RawBody, RequestSchema};

use super::owned_requirement;

#[derive(Debug, Deserialize)]
pub struct UpdateRequirementRequest {
    pub description: String,
    pub quantity: i32,
    pub percent_complete: Option<i32>,
    pub deadline: Option<DateTime<Utc>>,
}

impl RequestSchema for UpdateRequirementRequest {
    fn schema() -> &'static BodySchema {
        static SCHEMA: Lazy<BodySchema> = Lazy::new(|| {
            BodySchema::object(
                json!({
                    "description": super::description_field(),
                    "quantity": super::quantity_field(),
                    "percent_complete": { "type": ["integer", "null"], "minimum": 0, "maximum": 100 },
                    "deadline": { "type": ["string", "null"], "format": "date-time" },
                }),
                &["description", "quantity"],
            )
        });
        &SCHEMA
    }
}

/**
 * PUT /requirement/:id - Update a requirement's progress
 *
 * `description` and `quantity` are always replaced; `percent_complete` and `deadline`
 * only when the body carries them.
 */
pub async fn requirement_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    IdPath(id): IdPath,
    body: RawBody,
) -> ApiResult<RequirementView> {
    owned_requirement(&state, id, auth.user_id, "update this requirement").await?;

    let req: UpdateRequirementRequest = body.validate()?;

    let requirement = state
        .store
        .update_requirement(
            id,
            RequirementChanges {
                description: req.description,
                quantity: req.quantity,
                percent_complete: req.percent_complete,
                deadline: req.deadline,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Requirement not found"))?;

    tracing::info!("user {} updated requirement {}", auth.user_id, id);
    Ok(ApiResponse::ok("Requirement updated successfully", requirement.into()))
}
