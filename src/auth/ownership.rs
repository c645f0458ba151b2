//! Ownership rules for mutations.
//!
//! An organization is mutable only by the user that created it. A requirement is
//! mutable only by the creator of its parent organization, so its check goes one
//! hop through the organization.

use crate::database::models::Organization;
use crate::database::Store;
use crate::error::ApiError;

/// Fails with `Unauthorized` unless `user_id` created `organization`.
pub fn ensure_owner(organization: &Organization, user_id: i64, action: &str) -> Result<(), ApiError> {
    if organization.is_owned_by(user_id) {
        return Ok(());
    }
    tracing::warn!(
        "user {} denied: cannot {} (organization {} belongs to user {})",
        user_id,
        action,
        organization.id,
        organization.created_by
    );
    Err(ApiError::unauthorized(format!("You are not authorized to {}", action)))
}

/// Load organization `id` and require that `user_id` owns it.
/// Missing organization is `NotFound`, foreign one is `Unauthorized`.
pub async fn owned_organization(
    store: &dyn Store,
    id: i64,
    user_id: i64,
    action: &str,
) -> Result<Organization, ApiError> {
    let organization = store
        .find_organization(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))?;
    ensure_owner(&organization, user_id, action)?;
    Ok(organization)
}
