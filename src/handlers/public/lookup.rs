// handlers/public/lookup.rs - Read-only lookup tables referenced by requirements

use axum::extract::State;

use crate::database::models::{Lookup, LookupKind};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /type/
pub async fn type_list(State(state): State<AppState>) -> ApiResult<Vec<Lookup>> {
    let rows = state.store.list_lookups(LookupKind::Type).await?;
    Ok(ApiResponse::ok("Types retrieved successfully", rows))
}

/// GET /status/
pub async fn status_list(State(state): State<AppState>) -> ApiResult<Vec<Lookup>> {
    let rows = state.store.list_lookups(LookupKind::Status).await?;
    Ok(ApiResponse::ok("Statuses retrieved successfully", rows))
}
