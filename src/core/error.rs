use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::templates::TemplateError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<TemplateError> for AppError {
    fn from(e: TemplateError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl AppError {
    /// Status and client-facing message. Server-side failures are logged here and
    /// answered with `public_message` only.
    fn status_and_message(&self, public_message: &str) -> (StatusCode, String) {
        match self {
            AppError::Database(e) => {
                tracing::error!("{}: database error: {:?}", public_message, e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    public_message.to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("{}: internal error: {}", public_message, msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    public_message.to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        EndpointError {
            error: self,
            message: "Internal server error",
            empty: EmptyData::Null,
        }
        .into_response()
    }
}

/// What a failure envelope carries in `data`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyData {
    Null,
    List,
}

/// An [`AppError`] bound to the envelope of the endpoint that raised it
#[derive(Debug)]
pub struct EndpointError {
    pub error: AppError,
    pub message: &'static str,
    pub empty: EmptyData,
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        let (status, message) = self.error.status_and_message(self.message);

        match self.empty {
            EmptyData::Null => {
                (status, Json(ApiResponse::<Option<()>>::failure(message, None))).into_response()
            }
            EmptyData::List => (
                status,
                Json(ApiResponse::<Vec<()>>::failure(message, Vec::new())),
            )
                .into_response(),
        }
    }
}

/// Attach an endpoint's failure envelope to an [`AppError`] result
pub trait EnvelopeExt<T> {
    /// Failures answer with `data: []`
    fn or_empty_list(self, message: &'static str) -> std::result::Result<T, EndpointError>;

    /// Failures answer with `data: null`
    fn or_null(self, message: &'static str) -> std::result::Result<T, EndpointError>;
}

impl<T, E> EnvelopeExt<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn or_empty_list(self, message: &'static str) -> std::result::Result<T, EndpointError> {
        self.map_err(|e| EndpointError {
            error: e.into(),
            message,
            empty: EmptyData::List,
        })
    }

    fn or_null(self, message: &'static str) -> std::result::Result<T, EndpointError> {
        self.map_err(|e| EndpointError {
            error: e.into(),
            message,
            empty: EmptyData::Null,
        })
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_hides_details() {
        let (status, message) =
            AppError::Database(sqlx::Error::PoolTimedOut).status_and_message("Failed to fetch");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Failed to fetch");
    }

    #[test]
    fn test_not_found_keeps_message() {
        let (status, message) =
            AppError::NotFound("Province not found".to_string()).status_and_message("ignored");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Province not found");
    }

    #[test]
    fn test_envelope_ext_sets_shape() {
        let result: std::result::Result<(), AppError> =
            Err(AppError::BadRequest("bad limit".to_string()));
        let err = result.or_empty_list("Failed to fetch news").unwrap_err();
        assert_eq!(err.empty, EmptyData::List);
        assert_eq!(
            err.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
