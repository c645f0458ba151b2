// handlers/protected/requirement/delete.rs - DELETE /requirement/:id handler

use axum::{extract::State, Extension};

use crate::api::IdPath;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::owned_requirement;

/// DELETE /requirement/:id - Hard delete; a second delete of the same id is a 404
pub async fn requirement_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    owned_requirement(&state, id, auth.user_id, "delete this requirement").await?;

    // A concurrent delete can win between the ownership check and here.
    if !state.store.delete_requirement(id).await? {
        return Err(ApiError::not_found("Requirement not found"));
    }

    tracing::info!("user {} deleted requirement {}", auth.user_id, id);
    Ok(ApiResponse::message("Requirement deleted successfully"))
}
