use axum::extract::State;
use axum::Json;
use tokio::time::Instant;

use crate::view::{build_view, DashboardView};
use crate::AppState;

/// GET /api/dashboard: full view model for the renderer.
pub async fn view(State(state): State<AppState>) -> Json<DashboardView> {
    let projection = state.engine.projection();
    Json(build_view(&projection, state.config.display_offset, Instant::now()))
}
