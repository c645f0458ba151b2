// handlers/protected/user.rs - GET /user/me handler

use axum::{extract::State, Extension};

use crate::api::UserView;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /user/me - The user the bearer token resolves to
pub async fn me_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<UserView> {
    // A valid signature for a user that no longer exists is still an unusable credential.
    let user = state
        .store
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("Invalid token"))?;
    Ok(ApiResponse::ok("User retrieved successfully", user.into()))
}
