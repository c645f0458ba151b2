// handlers/public/system.rs - Service index and health check

use axum::{extract::State, http::StatusCode};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / and GET /api/v1/ - Service name, version and endpoint index
pub async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::ok(
        "Donation API",
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "endpoints": {
                "health": "/health (public)",
                "user": "/api/v1/user/register, /api/v1/user/login (public); /api/v1/user/me (token)",
                "organization": "/api/v1/organization/ GET (public), POST (token); /api/v1/organization/:id GET (public), PUT (token)",
                "requirement": "/api/v1/requirement/ GET (public), POST (token); /api/v1/requirement/:id PUT, DELETE (token)",
                "lookup": "/api/v1/type/, /api/v1/status/ (public)",
                "donation": "/api/v1/donation/ (public)"
            }
        }),
    ))
}

/// GET /health - 200 while storage answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    if let Err(e) = state.store.health_check().await {
        tracing::warn!("health check failed: {}", e);
        return Err(ApiError::ServiceUnavailable("Database unreachable".to_string()));
    }

    Ok(ApiResponse::with_status(
        StatusCode::OK,
        "Service healthy",
        Some(json!({
            "status": "ok",
            "environment": state.config.environment,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    ))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
