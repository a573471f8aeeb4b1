use axum::{
    extract::{rejection::QueryRejection, FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// Query-string extractor that rejects with an [`AppError`] instead of axum's
/// plain-text rejection, so malformed parameters still get the JSON envelope
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: QueryRejection) -> AppError {
    let message = match rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => {
            format!("Invalid query parameters: {}", err.body_text())
        }
        _ => "Failed to parse query parameters".to_string(),
    };

    AppError::BadRequest(message)
}
