// handlers/public/donation.rs - GET /donation/ handler
//
// Donations are recorded outside this API; it only exposes them for reading.

use axum::extract::State;
use serde::Deserialize;

use crate::api::{views, ApiQuery, DonationView};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DonationFilter {
    pub organization: Option<i64>,
}

pub async fn donation_list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DonationFilter>,
) -> ApiResult<Vec<DonationView>> {
    let rows = state.store.list_donations(filter.organization).await?;
    Ok(ApiResponse::ok("Donations retrieved successfully", views(rows)))
}
