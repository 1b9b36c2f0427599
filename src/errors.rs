//! Centralized error handling.
//!
//! Every repository operation returns an [`AppResult`], so callers can tell
//! absence (`None`, empty list) apart from a storage failure. The HTTP layer
//! turns the error into a `{code, text}` JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("{0}")]
    NotFound(String),

    // Request decoding
    #[error("{0}")]
    Unprocessable(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Storage session
    #[error("Could not open a database connection: {0}")]
    Connect(#[source] DbErr),

    #[error("Could not apply the schema: {0}")]
    Schema(#[source] DbErr),

    #[error("Could not start the transaction")]
    Begin(#[source] DbErr),

    #[error("Could not commit the transaction")]
    Commit(#[source] DbErr),

    #[error("Database error")]
    Database(#[source] DbErr),

    // Internal
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body, `{"code": 404, "text": "..."}`
#[derive(Debug, Serialize, ToSchema)]
pub struct JsonErr {
    pub code: u16,
    pub text: String,
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => AppError::Connect(err),
            other => AppError::Database(other),
        }
    }
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Connect(_)
            | AppError::Schema(_)
            | AppError::Begin(_)
            | AppError::Commit(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::Unprocessable(msg) => msg.clone(),
            AppError::BadRequest(_) => self.to_string(),

            AppError::Connect(e) | AppError::Schema(e) => {
                tracing::error!("{:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Begin(e) | AppError::Commit(e) => {
                tracing::error!("{}: {:?}", self, e);
                "A database error occurred".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = JsonErr {
            code: status.as_u16(),
            text: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn service_not_found(service_id: i32) -> Self {
        AppError::NotFound(format!("Service not found for serviceId {}", service_id))
    }

    pub fn instance_not_found(instance_id: i32) -> Self {
        AppError::NotFound(format!("Instance not found for instanceId {}", instance_id))
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        AppError::Unprocessable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
