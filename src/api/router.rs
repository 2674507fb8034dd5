use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    let dashboard = Router::new()
        .route("/api/dashboard", get(handlers::dashboard::view))
        .route("/api/dashboard/refresh", post(handlers::control::refresh))
        // Bot lifecycle
        .route("/api/dashboard/bot/start", post(handlers::control::start))
        .route("/api/dashboard/bot/stop", post(handlers::control::stop))
        .route("/api/dashboard/bot/toggle", post(handlers::control::toggle))
        .route("/api/dashboard/bot/tick", post(handlers::control::tick))
        // Drafts
        .route("/api/dashboard/strategy", post(handlers::config::edit_strategy))
        .route("/api/dashboard/strategy/save", post(handlers::config::save_strategy))
        .route("/api/dashboard/execution", post(handlers::config::edit_execution))
        .route("/api/dashboard/execution/save", post(handlers::config::save_execution));

    // Renderer is usually served from another origin during development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(dashboard)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
