//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::ParseEntityIdError;
use domain::{
    AuthorError, BookError, CategoryError, DomainError, RepositoryError, SubjectError, UserError,
};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
}

/// Body text for 500 responses; the cause is only logged.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        let body = serde_json::json!({ "success": false, "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    let status = match &err {
        DomainError::Author(AuthorError::NotFound(_))
        | DomainError::Book(BookError::NotFound(_))
        | DomainError::Category(CategoryError::NotFound(_))
        | DomainError::Subject(SubjectError::NotFound(_))
        | DomainError::User(UserError::NotFound(_)) => StatusCode::NOT_FOUND,
        DomainError::User(UserError::EmailAlreadyExists) => StatusCode::CONFLICT,
        DomainError::Author(_)
        | DomainError::Book(_)
        | DomainError::Category(_)
        | DomainError::Subject(_)
        | DomainError::User(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    // Entity errors are already phrased for the client; strip the layer prefix.
    let message = match err {
        DomainError::Author(e) => e.to_string(),
        DomainError::Book(e) => e.to_string(),
        DomainError::Category(e) => e.to_string(),
        DomainError::Subject(e) => e.to_string(),
        DomainError::User(e) => e.to_string(),
        other => {
            tracing::error!(error = %other, "command failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    };

    (status, message)
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Domain(DomainError::Repository(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<ParseEntityIdError> for ApiError {
    fn from(err: ParseEntityIdError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
