use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::watch;

use polydash::remote::RemoteClient;
use polydash::sync::Projection;

/// In-memory stand-in for the bot's state-and-command API.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockBot {
    pub running: AtomicBool,
    pub tick_count: AtomicU64,
    pub state_hits: AtomicUsize,
    /// When set, `GET /api/state` answers 503.
    pub fail_state: AtomicBool,
    /// When set, `POST /api/config` answers 400 with this `detail`.
    pub config_error: Mutex<Option<String>>,
    pub config: Mutex<Value>,
    pub execution: Mutex<Value>,
    pub saved_configs: Mutex<Vec<Value>>,
    pub saved_executions: Mutex<Vec<Value>>,
}

#[allow(dead_code)]
impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            config: Mutex::new(json!({
                "enabled_assets": ["BTC", "ETH"],
                "enabled_indicators": ["POLY_PRICE"],
                "confidence_threshold": 0.85,
                "entry_probability_threshold": 0.85,
                "late_entry_seconds": 180,
                "stop_loss_pct": 0.2
            })),
            execution: Mutex::new(json!({
                "mode": "TEST",
                "wallet_configured": false,
                "wallet_masked": ""
            })),
            ..Self::default()
        })
    }

    pub fn hits(&self) -> usize {
        self.state_hits.load(Ordering::SeqCst)
    }

    pub fn set_late_entry_seconds(&self, value: u32) {
        self.config.lock().unwrap()["late_entry_seconds"] = json!(value);
    }

    fn state_document(&self) -> Value {
        json!({
            "stats": {
                "balance": 1234.56,
                "today_pnl": 12.5,
                "all_time_pnl": -3.2,
                "trades": 10,
                "wins": 6,
                "win_rate": 0.6,
                "avg_pnl": 1.25
            },
            "config": self.config.lock().unwrap().clone(),
            "execution_config": self.execution.lock().unwrap().clone(),
            "markets": {
                "ETH": {"asset": "ETH", "spot_price": 3100.5, "change_24h": -0.41, "yes_odds": 0.42, "no_odds": 0.58, "odds_live": true},
                "BTC": {"asset": "BTC", "spot_price": 64000.0, "change_24h": 1.2, "yes_odds": 0.91, "no_odds": 0.09, "odds_live": true}
            },
            "history": [],
            "open_trades": [],
            "running": self.running.load(Ordering::SeqCst),
            "tick_count": self.tick_count.load(Ordering::SeqCst),
            "last_tick_at": null,
            "last_decision_by_asset": {"BTC": "UP 0.91"}
        })
    }
}

async fn get_state(State(bot): State<Arc<MockBot>>) -> impl IntoResponse {
    bot.state_hits.fetch_add(1, Ordering::SeqCst);
    if bot.fail_state.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"detail": "down"})));
    }
    (StatusCode::OK, Json(bot.state_document()))
}

async fn start(State(bot): State<Arc<MockBot>>) -> impl IntoResponse {
    bot.running.store(true, Ordering::SeqCst);
    Json(json!({"ok": true}))
}

async fn stop(State(bot): State<Arc<MockBot>>) -> impl IntoResponse {
    bot.running.store(false, Ordering::SeqCst);
    Json(json!({"ok": true}))
}

async fn tick(State(bot): State<Arc<MockBot>>) -> impl IntoResponse {
    bot.tick_count.fetch_add(1, Ordering::SeqCst);
    Json(json!({"ok": true}))
}

async fn save_config(State(bot): State<Arc<MockBot>>, Json(body): Json<Value>) -> impl IntoResponse {
    bot.saved_configs.lock().unwrap().push(body.clone());
    if let Some(detail) = bot.config_error.lock().unwrap().clone() {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": detail})));
    }
    *bot.config.lock().unwrap() = body;
    (StatusCode::OK, Json(json!({"ok": true})))
}

async fn save_execution(State(bot): State<Arc<MockBot>>, Json(body): Json<Value>) -> impl IntoResponse {
    bot.saved_executions.lock().unwrap().push(body.clone());
    let secret = body["wallet_secret"].as_str().unwrap_or_default().to_string();
    let mut execution = bot.execution.lock().unwrap();
    execution["mode"] = body["mode"].clone();
    if !secret.is_empty() {
        execution["wallet_configured"] = json!(true);
        execution["wallet_masked"] = json!(format!("{}...{}", &secret[..4], &secret[secret.len() - 4..]));
    }
    Json(json!({"ok": true}))
}

/// Serve the mock on an ephemeral port and return a client pointed at it.
#[allow(dead_code)]
pub async fn spawn_mock_bot(bot: Arc<MockBot>) -> RemoteClient {
    let router = Router::new()
        .route("/api/state", get(get_state))
        .route("/api/bot/start", post(start))
        .route("/api/bot/stop", post(stop))
        .route("/api/bot/tick", post(tick))
        .route("/api/config", post(save_config))
        .route("/api/execution-config", post(save_execution))
        .with_state(bot);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock bot");
    let addr = listener.local_addr().expect("Mock bot has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    RemoteClient::new(reqwest::Client::new(), format!("http://{addr}/"))
}

/// Wait until a published projection satisfies `pred`.
#[allow(dead_code)]
pub async fn wait_for<F>(rx: &mut watch::Receiver<Projection>, pred: F) -> Projection
where
    F: FnMut(&Projection) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
        .await
        .expect("Timed out waiting for projection")
        .expect("Engine stopped")
        .clone()
}
