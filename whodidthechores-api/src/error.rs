/// Error handling for the API server
///
/// Handlers return [`ApiResult`]. Domain failures convert through
/// `From<DomainError>`, so `?` on any shared-library call yields the right
/// HTTP status.
///
/// # Example
///
/// ```
/// use whodidthechores_api::error::{ApiError, ApiResult};
/// use whodidthechores_shared::DomainError;
///
/// fn handler() -> ApiResult<()> {
///     Err(DomainError::StillInUse.into())
/// }
///
/// assert!(matches!(handler(), Err(ApiError::Conflict(_))));
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use whodidthechores_shared::DomainError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate name, entity still referenced
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "conflict", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (error_code, message, details) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::Unauthorized(msg) => ("unauthorized", msg, None),
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::Conflict(msg) => ("conflict", msg, None),
            ApiError::ValidationError(errors) => (
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Detail stays in the log
                tracing::error!("Internal error: {}", msg);
                (
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert domain errors to API errors
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => ApiError::ValidationError(
                errors
                    .iter()
                    .map(|(field, error)| ValidationErrorDetail {
                        field: field.to_string(),
                        message: error.to_string(),
                    })
                    .collect(),
            ),
            DomainError::DuplicateName => {
                ApiError::Conflict("Name already taken".to_string())
            }
            DomainError::StillInUse => {
                ApiError::Conflict("Still referenced by existing tasks".to_string())
            }
            DomainError::InvalidName => ApiError::BadRequest("Invalid name".to_string()),
            DomainError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            DomainError::AuthenticationFailed => {
                ApiError::Unauthorized("Authentication failed".to_string())
            }
            DomainError::Storage => ApiError::InternalError("storage error".to_string()),
            DomainError::Hashing(err) => {
                ApiError::InternalError(format!("Password operation failed: {}", err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whodidthechores_shared::auth::password::PasswordError;
    use whodidthechores_shared::{FieldError, ValidationErrors};

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid name".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid name");

        let err = ApiError::NotFound("Resource not found".to_string());
        assert_eq!(err.to_string(), "Not found: Resource not found");
    }

    #[test]
    fn test_domain_status_mapping() {
        let cases = [
            (DomainError::DuplicateName, StatusCode::CONFLICT),
            (DomainError::StillInUse, StatusCode::CONFLICT),
            (DomainError::InvalidName, StatusCode::BAD_REQUEST),
            (DomainError::NotFound, StatusCode::NOT_FOUND),
            (DomainError::AuthenticationFailed, StatusCode::UNAUTHORIZED),
            (DomainError::Storage, StatusCode::INTERNAL_SERVER_ERROR),
            (
                DomainError::Hashing(PasswordError::HashError("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::Validation(ValidationErrors::new()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (domain, expected) in cases {
            let label = format!("{:?}", domain);
            assert_eq!(ApiError::from(domain).status(), expected, "{}", label);
        }
    }

    #[test]
    fn test_validation_details_keep_every_field() {
        let mut errors = ValidationErrors::new();
        errors.add("name", FieldError::Duplicate);
        errors.add("default_duration_mn", FieldError::NotANumber);

        let err = ApiError::from(DomainError::Validation(errors));
        assert_eq!(err.to_string(), "Validation failed: 2 errors");

        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(
                    details,
                    vec![
                        ValidationErrorDetail {
                            field: "default_duration_mn".to_string(),
                            message: "please enter a number".to_string(),
                        },
                        ValidationErrorDetail {
                            field: "name".to_string(),
                            message: "already taken, please choose another one".to_string(),
                        },
                    ]
                );
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_internal_error_body_hides_detail() {
        let response = ApiError::InternalError("connection reset".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, "internal_error");
        assert!(!body.message.contains("connection reset"));
        assert!(body.details.is_none());
    }
}
