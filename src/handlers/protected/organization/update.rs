// handlers/protected/organization/update.rs - PUT /organization/:id handler

use axum::{extract::State, Extension};
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::api::{IdPath, OrganizationView};
use crate::auth::owned_organization;
use crate::database::models::OrganizationChanges;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::{BodySchema, RawBody, RequestSchema};

use super::organization_schema;

#[derive(Debug, Deserialize)]
pub struct UpdateOrganizationRequest {
    /// Accepted so clients can send back what they read; the name never changes.
    pub name: Option<String>,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub logo: Option<String>,
}

impl RequestSchema for UpdateOrganizationRequest {
    fn schema() -> &'static BodySchema {
        static SCHEMA: Lazy<BodySchema> = Lazy::new(|| organization_schema(false));
        &SCHEMA
    }
}

/**
 * PUT /organization/:id - Replace an organization's details
 *
 * Full replace: optional columns left out of the body are cleared. Missing id is a 404,
 * someone else's organization a 401.
 */
pub async fn organization_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    IdPath(id): IdPath,
    body: RawBody,
) -> ApiResult<OrganizationView> {
    owned_organization(state.store.as_ref(), id, auth.user_id, "update this organization").await?;

    let req: UpdateOrganizationRequest = body.validate()?;

    let org = state
        .store
        .update_organization(
            id,
            OrganizationChanges {
                description: req.description,
                website: req.website,
                phone: req.phone,
                email: req.email,
                logo: req.logo,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))?;

    tracing::info!("user {} updated organization {}", auth.user_id, org.id);
    Ok(ApiResponse::ok("Organization updated successfully", org.into()))
}
