use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::sync::{ExecutionEdit, StrategyEdit, StrategyField};
use crate::AppState;

/// Either a typed edit (`{"op": "toggle_asset", "asset": "ETH"}`) or raw form
/// text for a numeric field (`{"field": "stop_loss_percent", "value": "20"}`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StrategyEditRequest {
    Edit(StrategyEdit),
    Text { field: StrategyField, value: String },
}

fn queued() -> impl IntoResponse {
    (StatusCode::ACCEPTED, Json(json!({ "status": "queued" })))
}

/// POST /api/dashboard/strategy
pub async fn edit_strategy(
    State(state): State<AppState>,
    Json(body): Json<StrategyEditRequest>,
) -> Result<impl IntoResponse, AppError> {
    let edit = match body {
        StrategyEditRequest::Edit(edit) => edit,
        StrategyEditRequest::Text { field, value } => field.parse(&value)?,
    };
    state.engine.edit_strategy(edit).await?;
    Ok(queued())
}

/// POST /api/dashboard/strategy/save
pub async fn save_strategy(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.engine.save_strategy().await?;
    Ok(queued())
}

/// POST /api/dashboard/execution: any of `mode` and `wallet_secret`.
pub async fn edit_execution(
    State(state): State<AppState>,
    Json(edit): Json<ExecutionEdit>,
) -> Result<impl IntoResponse, AppError> {
    if edit.is_empty() {
        return Err(AppError::BadRequest(
            "expected at least one of mode, wallet_secret".into(),
        ));
    }
    state.engine.edit_execution(edit).await?;
    Ok(queued())
}

/// POST /api/dashboard/execution/save
pub async fn save_execution(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.engine.save_execution().await?;
    Ok(queued())
}
