use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use storefront_database::StoreError;

/// Error taxonomy for the whole API surface.
///
/// Business failures are expected outcomes with fixed, caller-safe messages.
/// `InvalidCredentials` deliberately covers both "unknown email" and "wrong
/// password", and `Unauthorized` covers every token failure (missing, wrong
/// scheme, tampered, expired); callers must not be able to tell these apart.
/// Unexpected failures become `Internal`: logged with full context
/// server-side, generic message to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Authentication required")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => ApiError::DuplicateEmail,
            other => ApiError::Internal(other.into()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(errors) => json!({
                "error": "Validation failed",
                "details": errors,
            }),
            ApiError::Internal(source) => {
                tracing::error!("internal error: {source:#}");
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_error_kind() {
        assert_eq!(ApiError::DuplicateEmail.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::NotFound("User").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_never_leak_their_source() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused (db=10.0.0.3)"));
        let body = err.error_response();
        // Body is built from the generic message only.
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(body.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
