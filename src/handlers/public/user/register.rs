// handlers/public/user/register.rs - POST /user/register handler

use axum::extract::State;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::json;

use crate::api::UserView;
use crate::auth::hash_password;
use crate::database::models::NewUser;
use crate::database::StoreError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{BodySchema, RequestSchema, Valid, TRIMMED};

use super::normalize_email;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_organization: Option<bool>,
}

impl RequestSchema for RegisterRequest {
    fn schema() -> &'static BodySchema {
        static SCHEMA: Lazy<BodySchema> = Lazy::new(|| {
            BodySchema::object(
                json!({
                    "name": { "type": "string", "minLength": 3, "maxLength": 80, "pattern": TRIMMED },
                    "email": { "type": "string", "format": "email", "maxLength": 120 },
                    "password": { "type": "string", "minLength": 6, "maxLength": 128 },
                    "is_organization": { "type": ["boolean", "null"] },
                }),
                &["name", "email", "password"],
            )
        });
        &SCHEMA
    }
}

/**
 * POST /user/register - Create an individual or organization account
 *
 * Input: `{name, email, password, is_organization?}`. The password is stored as an
 * Argon2id hash. A second registration with the same email is a 400; the unique index
 * decides, so concurrent duplicates still produce exactly one user.
 */
pub async fn register_post(
    State(state): State<AppState>,
    Valid(req): Valid<RegisterRequest>,
) -> ApiResult<UserView> {
    let email = normalize_email(&req.email);
    let password = req.password;
    // Argon2 is CPU-bound; keep it off the async workers.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(ApiError::internal)??;

    let user = state
        .store
        .insert_user(NewUser {
            name: req.name,
            email,
            password_hash,
            is_organization: req.is_organization.unwrap_or(false),
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => ApiError::conflict("User already exists"),
            other => other.into(),
        })?;

    tracing::info!(
        "registered user {} (organization: {})",
        user.id,
        user.is_organization
    );
    Ok(ApiResponse::created("User registered successfully", user.into()))
}
