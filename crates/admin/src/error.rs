//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// No verified owner identity on the request.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// The caller does not own the store they are acting on.
    #[error("Unauthorized")]
    NotOwner,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // The identity proxy strips inbound copies of the owner header, so
            // a missing value means the request never passed authentication.
            Self::Unauthenticated => StatusCode::FORBIDDEN,
            // Long-standing dashboard contract: acting on someone else's
            // store answers 405, and the frontend matches on it.
            Self::NotOwner => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the verified owner subject.
///
/// Call this once identity is established to associate errors with merchants.
pub fn set_sentry_user(owner_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(owner_id.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn missing_identity_answers_forbidden() {
        assert_eq!(status_of(AppError::Unauthenticated), StatusCode::FORBIDDEN);
    }

    #[test]
    fn foreign_store_answers_method_not_allowed() {
        assert_eq!(status_of(AppError::NotOwner), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn bad_request_and_not_found_map_directly() {
        assert_eq!(
            status_of(AppError::BadRequest("Name is required".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::NotFound("order".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn internal_detail_is_masked() {
        let err = AppError::Internal("pool exhausted on orders query".to_string());
        assert_eq!(err.to_string(), "Internal error: pool exhausted on orders query");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
