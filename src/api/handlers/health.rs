use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

/// Healthy once the bot API has answered the most recent poll.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let projection = state.engine.projection();

    if projection.last_poll_ok {
        (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "connected": true,
                "last_snapshot_seq": projection.snapshot_seq,
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "connected": false,
                "last_snapshot_seq": projection.snapshot_seq,
            })),
        )
    }
}
