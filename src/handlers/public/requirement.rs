// handlers/public/requirement.rs - GET /requirement/ handler

use axum::extract::State;
use serde::Deserialize;

use crate::api::{views, ApiQuery, RequirementView};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RequirementFilter {
    pub organization: Option<i64>,
}

/// GET /requirement/?organization= - Requirements, optionally for one organization.
/// An organization with no requirements (or no such organization) yields an empty list.
pub async fn requirement_list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<RequirementFilter>,
) -> ApiResult<Vec<RequirementView>> {
    let rows = state.store.list_requirements(filter.organization).await?;
    tracing::debug!("listed {} requirements (organization: {:?})", rows.len(), filter.organization);
    Ok(ApiResponse::ok("Requirements retrieved successfully", views(rows)))
}
