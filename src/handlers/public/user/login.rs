// handlers/public/user/login.rs - POST /user/login handler

use axum::extract::State;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::UserView;
use crate::auth::{burn_verification, verify_password};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{BodySchema, RequestSchema, Valid};

use super::normalize_email;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl RequestSchema for LoginRequest {
    fn schema() -> &'static BodySchema {
        static SCHEMA: Lazy<BodySchema> = Lazy::new(|| {
            BodySchema::object(
                json!({
                    "email": { "type": "string", "format": "email" },
                    "password": { "type": "string", "minLength": 6 },
                }),
                &["email", "password"],
            )
        });
        &SCHEMA
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserView,
}

/**
 * POST /user/login - Exchange credentials for a bearer token
 *
 * Unknown email and wrong password give the same 400 body, and an unknown email still
 * pays for one hash verification so the two cases take comparable time.
 */
pub async fn login_post(
    State(state): State<AppState>,
    Valid(req): Valid<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = normalize_email(&req.email);

    let user = state.store.find_user_by_email(&email).await?;
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let password = req.password;

    let verified = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => {
            burn_verification(&password);
            false
        }
    })
    .await
    .map_err(ApiError::internal)?;

    let Some(user) = user else {
        tracing::info!("login failed: unknown email");
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    };

    if !verified {
        tracing::info!("login failed: bad password for user {}", user.id);
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(user.id)?;
    tracing::info!("user {} logged in", user.id);

    Ok(ApiResponse::ok(
        "Login successful",
        LoginResponse {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            user: user.into(),
        },
    ))
}
