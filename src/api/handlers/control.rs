use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::errors::AppError;
use crate::AppState;

fn queued() -> impl IntoResponse {
    (StatusCode::ACCEPTED, Json(json!({ "status": "queued" })))
}

/// POST /api/dashboard/bot/start
pub async fn start(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.engine.start().await?;
    Ok(queued())
}

/// POST /api/dashboard/bot/stop
pub async fn stop(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.engine.stop().await?;
    Ok(queued())
}

/// POST /api/dashboard/bot/toggle: start or stop based on the last snapshot.
pub async fn toggle(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.engine.toggle().await?;
    Ok(queued())
}

/// POST /api/dashboard/bot/tick: force one decision cycle on the bot.
pub async fn tick(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.engine.tick().await?;
    Ok(queued())
}

/// POST /api/dashboard/refresh: poll now instead of waiting for the timer.
pub async fn refresh(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.engine.refresh().await?;
    Ok(queued())
}
