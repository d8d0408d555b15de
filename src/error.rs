use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bitebuddy_shared::Error;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Domain(Error::Validate(err))
    }
}

/// JSON notice returned with every non-2xx response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

const INTERNAL_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error, message) = match self {
            AppError::Domain(Error::NotFound(what)) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{what} not found"),
            ),
            AppError::Domain(Error::AlreadySaved) => (
                StatusCode::CONFLICT,
                "already_saved",
                Error::AlreadySaved.to_string(),
            ),
            AppError::Domain(Error::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Please sign in to continue.".to_string(),
            ),
            AppError::Domain(Error::Validate(e)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation", e.to_string())
            }
            AppError::Domain(Error::Upstream(e)) => {
                tracing::error!("Recipe API error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream",
                    "The recipe service is unavailable. Please try again later.".to_string(),
                )
            }
            AppError::Domain(Error::Server(e)) => {
                tracing::error!("Server error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
            AppError::Domain(Error::Unknown(e)) | AppError::InternalError(e) => {
                tracing::error!("Unexpected error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        (status_code, Json(ErrorBody { error, message })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
