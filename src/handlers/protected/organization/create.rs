// handlers/protected/organization/create.rs - POST /organization/ handler

use axum::{extract::State, Extension};
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::api::OrganizationView;
use crate::database::models::NewOrganization;
use crate::database::StoreError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::{BodySchema, RawBody, RequestSchema};

use super::organization_schema;

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub logo: Option<String>,
}

impl RequestSchema for CreateOrganizationRequest {
    fn schema() -> &'static BodySchema {
        static SCHEMA: Lazy<BodySchema> = Lazy::new(|| organization_schema(true));
        &SCHEMA
    }
}

/**
 * POST /organization/ - Create an organization owned by the caller
 *
 * Only accounts registered with `is_organization = true` may create one; anyone else
 * gets a 401 before the body is even looked at. Names are unique.
 */
pub async fn organization_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    body: RawBody,
) -> ApiResult<OrganizationView> {
    let caller = state.store.find_user(auth.user_id).await?;
    if !caller.map(|u| u.is_organization).unwrap_or(false) {
        tracing::warn!("user {} denied: not an organization account", auth.user_id);
        return Err(ApiError::unauthorized(
            "You are not authorized to create an organization",
        ));
    }

    let req: CreateOrganizationRequest = body.validate()?;

    let org = state
        .store
        .insert_organization(NewOrganization {
            name: req.name,
            description: req.description,
            website: req.website,
            phone: req.phone,
            email: req.email,
            logo: req.logo,
            created_by: auth.user_id,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => ApiError::conflict("Organization already exists"),
            other => other.into(),
        })?;

    tracing::info!("user {} created organization {}", auth.user_id, org.id);
    Ok(ApiResponse::created("Organization created successfully", org.into()))
}
