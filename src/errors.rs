use axum::{
    extract::rejection::{JsonDataError, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::error::Error as StdError;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// A single failed constraint, addressed by its path in the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Dotted path to the offending field, e.g. `series[0].history[1].unidades`
    #[schema(example = "horizon_days")]
    pub field: String,
    /// Machine-readable constraint name
    #[schema(example = "range")]
    pub code: String,
    #[schema(example = "must be at least 1")]
    pub message: String,
}

/// Standard error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Unprocessable Entity",
    "message": "Validation error: horizon_days: must be at least 1",
    "details": [{"field": "horizon_days", "code": "range", "message": "must be at least 1"}],
    "request_id": "req-abc123xyz",
    "timestamp": "2024-12-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Bad Request", "Unprocessable Entity")
    #[schema(example = "Unprocessable Entity")]
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Field-level validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "req-abc123xyz")]
    pub request_id: Option<String>,
    /// RFC 3339 timestamp when the error occurred
    #[schema(example = "2024-12-09T10:30:00.000Z")]
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl ServiceError {
    /// Validation failure on a single field.
    pub fn validation(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let detail = FieldError {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        };
        ServiceError::ValidationError {
            message: format!("{}: {}", detail.field, detail.message),
            details: vec![detail],
        }
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::InternalError(_) | Self::Other(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn details(&self) -> Option<&[FieldError]> {
        match self {
            Self::ValidationError { details, .. } if !details.is_empty() => Some(details),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        let mut details = Vec::new();
        flatten_validation_errors(&err, "", &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));

        let message = details
            .iter()
            .map(|d| format!("{}: {}", d.field, d.message))
            .collect::<Vec<_>>()
            .join("; ");

        ServiceError::ValidationError { message, details }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        if let JsonRejection::JsonDataError(data_error) = &rejection {
            if let Some(detail) = json_data_detail(data_error) {
                return ServiceError::ValidationError {
                    message: format!("{}: {}", detail.field, detail.message),
                    details: vec![detail],
                };
            }
        }

        let text = rejection.body_text();
        match rejection.status() {
            StatusCode::BAD_REQUEST => ServiceError::BadRequest(text),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => ServiceError::UnsupportedMediaType(text),
            StatusCode::PAYLOAD_TOO_LARGE => ServiceError::PayloadTooLarge(text),
            StatusCode::UNPROCESSABLE_ENTITY => ServiceError::ValidationError {
                message: text,
                details: Vec::new(),
            },
            _ => ServiceError::InternalError(text),
        }
    }
}

type PathError = serde_path_to_error::Error<serde_json::Error>;

/// Locates the field a body failed to deserialize at.
fn json_data_detail(rejection: &JsonDataError) -> Option<FieldError> {
    let mut source: Option<&(dyn StdError + 'static)> = rejection.source();
    while let Some(err) = source {
        if let Some(path_error) = err.downcast_ref::<PathError>() {
            return Some(field_error_from_path(path_error));
        }
        source = err.source();
    }
    None
}

fn field_error_from_path(err: &PathError) -> FieldError {
    let path = err.path().to_string();
    let parent = if path == "." { "" } else { path.as_str() };
    let message = strip_position(&err.inner().to_string());

    if let Some(missing) = backticked(&message, "missing field `") {
        return FieldError {
            field: join_path(parent, missing),
            code: "missing".to_string(),
            message: "is required".to_string(),
        };
    }

    FieldError {
        field: if parent.is_empty() { "body".to_string() } else { parent.to_string() },
        code: "type".to_string(),
        message,
    }
}

// serde_json appends " at line N column M" to data errors.
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message.to_string(),
    }
}

fn backticked<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = message.strip_prefix(prefix)?;
    rest.split('`').next()
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn flatten_validation_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        // Struct-level checks are reported against their parent.
        let path = if *field == "__all__" {
            if prefix.is_empty() {
                "body".to_string()
            } else {
                prefix.to_string()
            }
        } else {
            join_path(prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    out.push(FieldError {
                        field: path.clone(),
                        code: e.code.to_string(),
                        message: describe(e),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_validation_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_validation_errors(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

fn describe(error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match (error.code.as_ref(), error.params.get("min"), error.params.get("max")) {
        ("range", Some(min), Some(max)) => {
            format!("must be between {} and {}", bound(min), bound(max))
        }
        ("range", Some(min), None) => format!("must be at least {}", bound(min)),
        ("range", None, Some(max)) => format!("must be at most {}", bound(max)),
        (code, _, _) => format!("failed '{}' constraint", code),
    }
}

// Range params are stored as f64, integer bounds print without a fraction.
fn bound(value: &serde_json::Value) -> String {
    match value.as_f64() {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        _ => value.to_string(),
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            ::tracing::error!(error = %self, "request failed");
        }

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            details: self.details().map(<[FieldError]>::to_vec),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
