pub mod create;
pub mod delete;
pub mod update;

pub use create::requirement_create;
pub use delete::requirement_delete;
pub use update::requirement_update;

use serde_json::{json, Value};

use crate::auth::owned_organization;
use crate::database::models::Requirement;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::NOT_BLANK;

/// Load requirement `id` and require that `user_id` owns its organization.
async fn owned_requirement(
    state: &AppState,
    id: i64,
    user_id: i64,
    action: &str,
) -> Result<Requirement, ApiError> {
    let requirement = state
        .store
        .find_requirement(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Requirement not found"))?;
    owned_organization(state.store.as_ref(), requirement.organization_id, user_id, action).await?;
    Ok(requirement)
}

fn description_field() -> Value {
    json!({ "type": "string", "minLength": 1, "maxLength": 255, "pattern": NOT_BLANK })
}

fn quantity_field() -> Value {
    json!({ "type": "integer", "minimum": 1, "maximum": i32::MAX })
}
