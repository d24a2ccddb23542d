// ABOUTME: Body, path, and query extractors that report bad input as validation errors
// ABOUTME: Keeps every client mistake on the 400 error shape instead of axum's plain-text rejections

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ServiceError;

/// Like [`axum::Json`], but rejects with [`ServiceError::Validation`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ServiceError {
    debug!("Rejected request body: {}", rejection.body_text());

    let message = match rejection {
        JsonRejection::JsonDataError(_) => "The request body has a field of the wrong type.",
        JsonRejection::JsonSyntaxError(_) => "The request body is not valid JSON.",
        JsonRejection::MissingJsonContentType(_) => {
            "The request must have a Content-Type of application/json."
        }
        _ => "The request body could not be read.",
    };

    ServiceError::validation("body", message)
}

/// Like [`axum::extract::Path`], but rejects with [`ServiceError::Validation`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ValidPath(value)),
            Err(rejection) => {
                debug!("Rejected path parameters: {}", rejection.body_text());
                Err(ServiceError::validation(
                    "path",
                    "Episode and part ids must be whole numbers.",
                ))
            }
        }
    }
}

/// Like [`axum::extract::Query`], but rejects with [`ServiceError::Validation`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ValidQuery(value)),
            Err(rejection) => {
                debug!("Rejected query string: {}", rejection.body_text());
                Err(ServiceError::validation(
                    "query",
                    "The page and limit parameters must be whole numbers.",
                ))
            }
        }
    }
}
