use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::generation::GenerationError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Generation(e) => match e {
                GenerationError::EmptyPrompt => StatusCode::BAD_REQUEST,
                GenerationError::BackendRequest { status, .. } if *status == 429 => {
                    StatusCode::TOO_MANY_REQUESTS
                }
                GenerationError::BackendRequest { .. }
                | GenerationError::Network(_)
                | GenerationError::EmptyResponse => StatusCode::BAD_GATEWAY,
                GenerationError::NoIdeasParsed => StatusCode::UNPROCESSABLE_ENTITY,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, errors) = match self {
            AppError::Validation(ref msg) => (msg.clone(), Some(vec![msg.clone()])),
            AppError::Generation(ref e) => {
                if status.is_server_error() {
                    tracing::error!("Generation failed: {}", e);
                }
                (e.to_string(), None)
            }
            AppError::NotFound(ref msg) | AppError::BadRequest(ref msg) => (msg.clone(), None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
