//! Declarative request-body schemas.
//!
//! A request type describes its body once as a JSON Schema. The body is checked as raw
//! JSON, so every violation is collected into one per-field report before the typed
//! value is built.

use std::collections::BTreeMap;

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
};
use jsonschema::error::ValidationErrorKind;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ApiError;

/// Field name -> messages, rendered as `{"email": ["Not a valid email address."]}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Key used for errors about the body as a whole.
pub const SCHEMA_KEY: &str = "_schema";

/// `pattern` for text that must contain something other than whitespace.
pub const NOT_BLANK: &str = r"\S";

/// `pattern` for names: not blank, no leading or trailing whitespace.
pub const TRIMMED: &str = r"^\S(.*\S)?$";

/// A compiled JSON Schema for one request body.
///
/// Bodies are objects: `properties` declares each field, `required` lists the mandatory
/// ones, and any other key is rejected. Violations are reported per field with the
/// field's own declaration supplying the limits in the message.
pub struct BodySchema {
    properties: Map<String, Value>,
    validator: Result<jsonschema::Validator, String>,
}

impl BodySchema {
    pub fn object(properties: Value, required: &[&str]) -> Self {
        let schema = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        });
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(&schema)
            .map_err(|e| e.to_string());

        Self {
            properties: match properties {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            validator,
        }
    }

    /// Check a parsed body, collecting every violation.
    pub fn check(&self, body: &Value) -> Result<(), ApiError> {
        let validator = self
            .validator
            .as_ref()
            .map_err(|e| ApiError::internal(format!("request schema failed to compile: {}", e)))?;

        let mut errors = FieldErrors::default();
        for error in validator.iter_errors(body) {
            let path = error.instance_path.to_string();
            let field = path.trim_start_matches('/').split('/').next().unwrap_or_default();

            match &error.kind {
                ValidationErrorKind::Required { property } => {
                    let name = property.as_str().map(str::to_string).unwrap_or_else(|| property.to_string());
                    errors.add(name, "Missing data for required field.");
                }
                ValidationErrorKind::AdditionalProperties { unexpected } => {
                    for name in unexpected {
                        errors.add(name.clone(), "Unknown field.");
                    }
                }
                _ if field.is_empty() => errors.add(SCHEMA_KEY, "Invalid input type."),
                kind => {
                    let message = self.describe(field, kind, error.instance.is_null());
                    errors.add(field, message);
                }
            }
        }
        errors.into_result().map_err(ApiError::from)
    }

    fn describe(&self, field: &str, kind: &ValidationErrorKind, was_null: bool) -> String {
        let declared = self.properties.get(field);
        let limit = |key: &str| {
            declared
                .and_then(|d| d.get(key))
                .map(Value::to_string)
                .unwrap_or_default()
        };

        match kind {
            ValidationErrorKind::Type { .. } if was_null => "Field may not be null.".to_string(),
            ValidationErrorKind::Type { .. } => {
                let expected = declared.and_then(|d| match d.get("type") {
                    Some(Value::String(t)) => Some(t.as_str()),
                    Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).find(|t| *t != "null"),
                    _ => None,
                });
                match expected {
                    Some("string") => "Not a valid string.",
                    Some("integer") => "Not a valid integer.",
                    Some("boolean") => "Not a valid boolean.",
                    _ => "Invalid type.",
                }
                .to_string()
            }
            ValidationErrorKind::Format { .. } => {
                match declared.and_then(|d| d.get("format")).and_then(Value::as_str) {
                    Some("email") => "Not a valid email address.",
                    Some("date-time") => "Not a valid datetime.",
                    _ => "Invalid format.",
                }
                .to_string()
            }
            ValidationErrorKind::MinLength { .. } => format!("Shorter than minimum length {}.", limit("minLength")),
            ValidationErrorKind::MaxLength { .. } => format!("Longer than maximum length {}.", limit("maxLength")),
            ValidationErrorKind::Minimum { .. } => format!("Must be greater than or equal to {}.", limit("minimum")),
            ValidationErrorKind::Maximum { .. } => format!("Must be less than or equal to {}.", limit("maximum")),
            ValidationErrorKind::Pattern { .. } => {
                match declared.and_then(|d| d.get("pattern")).and_then(Value::as_str) {
                    Some(TRIMMED) => "Must not be blank or padded with whitespace.",
                    Some(NOT_BLANK) => "Must not be blank.",
                    _ => "Invalid value.",
                }
                .to_string()
            }
            _ => "Invalid value.".to_string(),
        }
    }
}

impl std::fmt::Debug for BodySchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodySchema")
            .field("fields", &self.properties.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// A request body type with a declared schema, compiled once per type.
pub trait RequestSchema: DeserializeOwned {
    fn schema() -> &'static BodySchema;
}

/// Parse and validate raw body bytes into `T`.
pub fn validate_json<T: RequestSchema>(bytes: &[u8]) -> Result<T, ApiError> {
    let body: Value = serde_json::from_slice(bytes).map_err(|_| schema_error("Invalid JSON body."))?;

    T::schema().check(&body)?;

    // The schema admits integral floats such as `1.0`, which the typed field refuses.
    serde_json::from_value(body).map_err(|e| {
        tracing::debug!("schema-checked body failed to deserialize: {}", e);
        ApiError::from(schema_error("Invalid input type."))
    })
}

fn schema_error(message: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.add(SCHEMA_KEY, message);
    errors
}

/// Extractor: the request body, validated against `T`'s schema before the handler runs.
#[derive(Debug, Clone)]
pub struct Valid<T>(pub T);

/// Extractor: the raw body, for handlers that must authorize before validating.
#[derive(Debug, Clone)]
pub struct RawBody(pub Bytes);

impl RawBody {
    pub fn validate<T: RequestSchema>(&self) -> Result<T, ApiError> {
        validate_json(&self.0)
    }
}

fn body_rejection(rejection: BytesRejection) -> ApiError {
    if rejection.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::bad_request("Could not read request body")
    }
}

#[async_trait]
impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(body_rejection)?;
        Ok(RawBody(bytes))
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: RequestSchema,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let RawBody(bytes) = RawBody::from_request(req, state).await?;
        validate_json(&bytes).map(Valid)
    }
}
