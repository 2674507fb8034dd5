use polydash::api::router::create_router;
use polydash::config::AppConfig;
use polydash::metrics::init_metrics;
use polydash::remote::RemoteClient;
use polydash::sync::spawn_engine;
use polydash::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let metrics_handle = init_metrics();

    // --- Remote bot API ---
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;
    let client = RemoteClient::new(http, &config.remote_base_url);
    tracing::info!(remote = %client.base_url(), "Bot API configured");

    // --- Sync engine: polling, drafts, commands, notices ---
    let (engine, engine_task) = spawn_engine(client, config.engine_settings());

    let state = AppState {
        engine,
        config,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Dashboard listening on {addr}");
    axum::serve(listener, router).await?;

    // Router (and with it every engine handle) is gone once serve returns
    engine_task.await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
