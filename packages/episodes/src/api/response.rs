// ABOUTME: Shared API response types and error handling
// ABOUTME: Success envelope plus the JSON error body every failed request returns

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use partwise_core::group_by_field;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ServiceError;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Body of a message-only success, such as a deleted part
#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<BTreeMap<String, Vec<String>>>,
}

impl ServiceError {
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ServiceError::Transaction(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "TRANSACTION_FAILED")
            }
            ServiceError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Message safe to show a client; storage causes are only logged
    fn to_user_message(&self) -> String {
        match self {
            ServiceError::Validation(_) => "Validation error".to_string(),
            ServiceError::NotFound(message) => message.clone(),
            ServiceError::Transaction(_) => "Error occurred, something went wrong".to_string(),
            ServiceError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status, code) = self.to_status_and_code();

        match &self {
            ServiceError::Transaction(err) => {
                error!(
                    request_id = %request_id,
                    error = %err,
                    "Transaction rolled back"
                );
            }
            ServiceError::Internal(err) => {
                error!(
                    request_id = %request_id,
                    error = %err,
                    "Internal server error occurred"
                );
            }
            _ => {
                info!(
                    request_id = %request_id,
                    error_code = %code,
                    error = %self,
                    "API error response"
                );
            }
        }

        let details = match &self {
            ServiceError::Validation(errors) => Some(group_by_field(errors)),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code,
                message: self.to_user_message(),
                details,
            },
            request_id,
        };

        (status, ResponseJson(body)).into_response()
    }
}
