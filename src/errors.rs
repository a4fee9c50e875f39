use crate::utils::api_response;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

/// Faults raised while building or running a repository query.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Database(#[from] DbErr),

    #[error("`{0}` is not a valid date")]
    InvalidDate(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("`{0}` is not a valid date")]
    InvalidDate(String),

    #[error("database error: {0}")]
    Database(#[source] DbErr),

    #[error("failed to hash password: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Database(e) => AppError::Database(e),
            RepoError::InvalidDate(value) => AppError::InvalidDate(value),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(resource) => api_response::failure(
                Some(&format!("{resource} not found")),
                None::<String>,
                Some(StatusCode::NOT_FOUND),
            ),
            AppError::InvalidDate(value) => api_response::failure(
                Some("Invalid date range"),
                Some(serde_json::json!({ "date": format!("`{value}` is not a valid date") })),
                Some(StatusCode::BAD_REQUEST),
            ),
            AppError::Database(e) => {
                tracing::error!(error = %e, "database operation failed");
                api_response::failure(
                    Some("Database error"),
                    None::<String>,
                    Some(StatusCode::INTERNAL_SERVER_ERROR),
                )
            }
            AppError::PasswordHash(e) => {
                tracing::error!(error = %e, "password hashing failed");
                api_response::failure(
                    Some("Failed to process password"),
                    None::<String>,
                    Some(StatusCode::INTERNAL_SERVER_ERROR),
                )
            }
        }
    }
}
