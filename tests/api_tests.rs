mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tokio::task::JoinHandle;
use tower::ServiceExt;

use polydash::api::router::create_router;
use polydash::config::AppConfig;
use polydash::sync::{spawn_engine, EngineSettings};
use polydash::AppState;

use common::{spawn_mock_bot, wait_for, MockBot};

async fn build_test_app() -> (axum::Router, AppState, JoinHandle<()>) {
    let bot = MockBot::new();
    let client = spawn_mock_bot(bot).await;
    let metrics_handle = polydash::metrics::init_metrics();

    let config = AppConfig::default();
    let settings = EngineSettings {
        poll_interval: std::time::Duration::from_secs(60),
        ..config.engine_settings()
    };
    let (engine, task) = spawn_engine(client, settings);

    let mut rx = engine.subscribe();
    wait_for(&mut rx, |p| p.snapshot_seq >= 1).await;

    let state = AppState {
        engine,
        config,
        metrics_handle,
    };
    (create_router(state.clone()), state, task)
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _state, _task) = build_test_app().await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["connected"], true);
    assert_eq!(json["last_snapshot_seq"], 1);
}

#[tokio::test]
async fn test_dashboard_view() {
    let (app, _state, _task) = build_test_app().await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;

    assert_eq!(json["header"]["running"], false);
    assert_eq!(json["header"]["mode"], "TEST");
    assert_eq!(json["header"]["last_tick"], "--");

    let markets = json["markets"].as_array().unwrap();
    assert_eq!(markets.len(), 2);
    assert_eq!(markets[0]["asset"], "BTC");
    assert_eq!(markets[0]["decision"], "UP 0.91");
    assert_eq!(markets[1]["asset"], "ETH");
    assert_eq!(markets[1]["decision"], "Sem decisão ainda");

    assert_eq!(json["history_placeholder"], "Sem trades ainda");
    assert_eq!(json["strategy_form"]["late_entry_seconds"], "180");
    assert_eq!(json["strategy_form"]["stop_loss_percent"], "20");
    assert_eq!(json["execution_form"]["wallet_label"], "não");
}

#[tokio::test]
async fn test_strategy_text_edit() {
    let (app, state, _task) = build_test_app().await;
    let mut rx = state.engine.subscribe();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/dashboard/strategy",
            serde_json::json!({"field": "stop_loss_percent", "value": "12,5"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(resp).await["status"], "queued");

    let projection = wait_for(&mut rx, |p| p.strategy_dirty).await;
    assert_eq!(projection.strategy.stop_loss_pct, 0.125);

    let resp = app
        .oneshot(post_json(
            "/api/dashboard/strategy",
            serde_json::json!({"op": "toggle_asset", "asset": "SOL"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let projection = wait_for(&mut rx, |p| p.strategy.has_asset("SOL")).await;
    assert_eq!(projection.strategy.stop_loss_pct, 0.125);
}

#[tokio::test]
async fn test_unparseable_strategy_text_is_rejected() {
    let (app, state, _task) = build_test_app().await;

    let resp = app
        .oneshot(post_json(
            "/api/dashboard/strategy",
            serde_json::json!({"field": "late_entry_seconds", "value": "abc"}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("late_entry_seconds"));

    assert!(!state.engine.projection().strategy_dirty);
}

#[tokio::test]
async fn test_bot_start_is_queued() {
    let (app, state, _task) = build_test_app().await;
    let mut rx = state.engine.subscribe();

    let resp = app
        .oneshot(post_empty("/api/dashboard/bot/start"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let projection = wait_for(&mut rx, |p| p.snapshot.running).await;
    assert_eq!(projection.notice.as_deref(), Some("Bot iniciado ✅"));
}

#[tokio::test]
async fn test_execution_mode_edit() {
    let (app, state, _task) = build_test_app().await;
    let mut rx = state.engine.subscribe();

    let resp = app
        .oneshot(post_json(
            "/api/dashboard/execution",
            serde_json::json!({"mode": "REAL"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let projection = wait_for(&mut rx, |p| p.execution_dirty).await;
    assert_eq!(projection.execution_mode, polydash::models::ExecutionMode::Real);
}

#[tokio::test]
async fn test_execution_whole_form_edit() {
    let (app, state, _task) = build_test_app().await;
    let mut rx = state.engine.subscribe();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/dashboard/execution",
            serde_json::json!({"mode": "REAL", "wallet_secret": "0xabc123"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let projection = wait_for(&mut rx, |p| p.wallet_secret_pending).await;
    assert_eq!(projection.execution_mode, polydash::models::ExecutionMode::Real);

    let resp = app
        .oneshot(post_json("/api/dashboard/execution", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_engine_gone_returns_503() {
    let (app, _state, task) = build_test_app().await;
    task.abort();
    let _ = task.await;

    let resp = app
        .oneshot(post_empty("/api/dashboard/refresh"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(resp).await["success"], false);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _state, _task) = build_test_app().await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}
