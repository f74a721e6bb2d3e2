use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::utils::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::BadRequest(e.message)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) | AppError::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Internal Server Error".to_string()
            }
            AppError::BadRequest(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal Server Error".to_string()
            }
            AppError::Anyhow(e) => {
                tracing::error!("Anyhow error: {:?}", e);
                "Internal Server Error".to_string()
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
