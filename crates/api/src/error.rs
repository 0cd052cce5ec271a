//! Error-to-response mapping
//!
//! Every failure leaving the API is a structured JSON body with a stable
//! machine-readable code, a safe message, and the request path; validation
//! errors additionally enumerate per-field messages. Database and internal
//! details go to the log, never to the caller.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use readstack_core::{AppError, Violation};
use readstack_metadata::SourceError;
use serde::{Deserialize, Serialize};

/// Structured error payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Violation>>,
}

/// API-boundary error wrapper
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::ExternalService { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        let mapped = match err {
            SourceError::NotFound(id) => AppError::not_found("volume", id),
            SourceError::InvalidQuery(reason) => AppError::invalid_argument("query", reason),
            SourceError::NetworkError(reason)
            | SourceError::ParseError(reason)
            | SourceError::Unavailable(reason) => {
                AppError::external_service("Google Books", reason)
            }
        };
        Self(mapped)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("Request failed: {}", self.0);
        }

        let violations = self.0.violations();
        let body = ErrorBody {
            code: self.0.code(),
            message: self.0.user_message(),
            path: None,
            fields: if violations.is_empty() {
                None
            } else {
                Some(violations.to_vec())
            },
        };

        // The body is stashed in the extensions so the path middleware can
        // rebuild the response with the request path filled in
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Middleware that stamps the request path into error bodies
pub async fn attach_error_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    if let Some(mut body) = response.extensions_mut().remove::<ErrorBody>() {
        body.path = Some(path);
        let status = response.status();
        return (status, Json(body)).into_response();
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(AppError::not_found("book", "x")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(AppError::invalid_argument("current_page", "negative")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(AppError::validation(vec![])).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError(AppError::conflict("isbn", "dup")).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError(AppError::external_service("Google Books", "down")).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(AppError::internal("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_source_error_conversion() {
        let err: ApiError = SourceError::NotFound("vol1".to_string()).into();
        assert_eq!(err.0.code(), "VOLUME_NOT_FOUND");

        let err: ApiError = SourceError::Unavailable("timeout".to_string()).into();
        assert_eq!(err.0.code(), "EXTERNAL_SERVICE_UNAVAILABLE");

        let err: ApiError = SourceError::InvalidQuery("empty".to_string()).into();
        assert_eq!(err.0.code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_internal_error_body_hides_details() {
        let err = ApiError(AppError::internal("pool exhausted on shard 7"));
        let body = ErrorBody {
            code: err.0.code(),
            message: err.0.user_message(),
            path: None,
            fields: None,
        };
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert!(!body.message.contains("shard"));
    }
}
