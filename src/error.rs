// HTTP API error types
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::auth::{PasswordError, TokenError};
use crate::database::StoreError;
use crate::validation::FieldErrors;

/// Every failure a handler can report. Each kind has a fixed status and a
/// client-safe message; raw detail for internal kinds is logged, never returned.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation(FieldErrors),
    BadRequest(String),
    Conflict(String),

    // 401 Unauthorized - credential missing or unusable
    Unauthenticated(String),

    // 401 Unauthorized - credential fine, action not permitted
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 413 Payload Too Large
    PayloadTooLarge,

    // 500 Internal Server Error
    Internal,

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthenticated(_) | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(_) => "Invalid request body",
            ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unauthenticated(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::PayloadTooLarge => "Request body too large",
            ApiError::Internal => "Internal server error",
        }
    }

    /// Envelope body: `{message}` or `{message, data}` for field-level errors.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation(errors) => json!({
                "message": self.message(),
                "data": errors,
            }),
            _ => json!({ "message": self.message() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Log `detail` server-side and return the opaque 500.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!("internal error: {}", detail);
        ApiError::Internal
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(what) => {
                tracing::debug!("storage conflict: {}", what);
                ApiError::conflict(format!("{} already exists", what))
            }
            StoreError::MissingReference(field) => {
                let mut errors = FieldErrors::default();
                errors.add(field, "Referenced record does not exist.");
                ApiError::Validation(errors)
            }
            StoreError::Unavailable(msg) => {
                tracing::error!("storage unavailable: {}", msg);
                ApiError::ServiceUnavailable("Database temporarily unavailable".to_string())
            }
            other => ApiError::internal(other),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encode(_) => ApiError::internal(err),
            TokenError::Expired => ApiError::unauthenticated("Token has expired"),
            TokenError::Invalid(_) | TokenError::BadSubject => {
                tracing::debug!("rejected token: {}", err);
                ApiError::unauthenticated("Invalid token")
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::internal(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), Json(self.to_json())).into_response();
        if matches!(self, ApiError::Unauthenticated(_)) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_400_with_resource_name() {
        let err: ApiError = StoreError::Conflict("Organization".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Organization already exists");
    }

    #[test]
    fn internal_detail_never_reaches_client() {
        let err: ApiError = StoreError::Query("relation \"users\" does not exist".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.to_json().to_string();
        assert!(!body.contains("relation"));
        assert_eq!(err.to_json(), json!({ "message": "Internal server error" }));
    }

    #[test]
    fn missing_reference_becomes_field_error() {
        let err: ApiError = StoreError::MissingReference("type_id").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_json()["data"]["type_id"][0],
            "Referenced record does not exist."
        );
    }

    #[test]
    fn unauthenticated_sets_challenge_header() {
        let response = ApiError::unauthenticated("Missing token").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

        let response = ApiError::unauthorized("Not the owner").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
