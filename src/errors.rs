use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::sync::{EngineClosed, InputError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Dashboard engine unavailable")]
    EngineUnavailable,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::EngineUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Dashboard engine unavailable".into(),
            ),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<EngineClosed> for AppError {
    fn from(_: EngineClosed) -> Self {
        AppError::EngineUnavailable
    }
}

impl From<InputError> for AppError {
    fn from(e: InputError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}
