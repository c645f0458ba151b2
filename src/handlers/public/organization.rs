// handlers/public/organization.rs - Organization read handlers

use axum::extract::State;
use serde::Deserialize;

use crate::api::{views, ApiQuery, IdPath, OrganizationView};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct OrganizationFilter {
    pub created_by: Option<i64>,
}

/// GET /organization/?created_by= - All organizations, optionally only one user's
pub async fn organization_list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<OrganizationFilter>,
) -> ApiResult<Vec<OrganizationView>> {
    let rows = state.store.list_organizations(filter.created_by).await?;
    tracing::debug!("listed {} organizations (created_by: {:?})", rows.len(), filter.created_by);
    Ok(ApiResponse::ok("Organizations retrieved successfully", views(rows)))
}

/// GET /organization/:id
pub async fn organization_show(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<OrganizationView> {
    let org = state
        .store
        .find_organization(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))?;
    Ok(ApiResponse::ok("Organization retrieved successfully", org.into()))
}
