use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

use crate::remote::{BotCommand, RemoteClient};

use super::execution_draft::ExecutionEdit;
use super::store::{DashboardStore, Effect, Event, Projection};
use super::strategy_draft::StrategyEdit;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub poll_interval: Duration,
    pub notice_ttl: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            notice_ttl: super::notice::DEFAULT_NOTICE_TTL,
        }
    }
}

#[derive(Debug, Error)]
#[error("dashboard engine has shut down")]
pub struct EngineClosed;

/// Cloneable front door to the engine task. Dropping every handle stops the
/// engine and its poll timer.
#[derive(Clone)]
pub struct DashboardHandle {
    tx: mpsc::Sender<Event>,
    projection: watch::Receiver<Projection>,
}

impl DashboardHandle {
    pub async fn send(&self, event: Event) -> Result<(), EngineClosed> {
        self.tx.send(event).await.map_err(|_| EngineClosed)
    }

    /// Latest published projection.
    pub fn projection(&self) -> Projection {
        self.projection.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Projection> {
        self.projection.clone()
    }

    pub async fn refresh(&self) -> Result<(), EngineClosed> {
        self.send(Event::PollDue).await
    }

    pub async fn start(&self) -> Result<(), EngineClosed> {
        self.send(Event::Command(BotCommand::Start)).await
    }

    pub async fn stop(&self) -> Result<(), EngineClosed> {
        self.send(Event::Command(BotCommand::Stop)).await
    }

    pub async fn toggle(&self) -> Result<(), EngineClosed> {
        self.send(Event::Toggle).await
    }

    pub async fn tick(&self) -> Result<(), EngineClosed> {
        self.send(Event::Command(BotCommand::Tick)).await
    }

    pub async fn edit_strategy(&self, edit: StrategyEdit) -> Result<(), EngineClosed> {
        self.send(Event::EditStrategy(edit)).await
    }

    pub async fn save_strategy(&self) -> Result<(), EngineClosed> {
        self.send(Event::SaveStrategy).await
    }

    pub async fn edit_execution(&self, edit: ExecutionEdit) -> Result<(), EngineClosed> {
        self.send(Event::EditExecution(edit)).await
    }

    pub async fn save_execution(&self) -> Result<(), EngineClosed> {
        self.send(Event::SaveExecution).await
    }
}

/// Spawn the engine task. The first poll fires immediately.
pub fn spawn_engine(client: RemoteClient, settings: EngineSettings) -> (DashboardHandle, JoinHandle<()>) {
    let store = DashboardStore::new(settings.notice_ttl);
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (projection_tx, projection_rx) = watch::channel(store.projection(Instant::now()));

    let weak_tx = tx.downgrade();
    let task = tokio::spawn(run_engine(store, client, rx, weak_tx, projection_tx, settings.poll_interval));

    let handle = DashboardHandle {
        tx,
        projection: projection_rx,
    };
    (handle, task)
}

/// Engine loop: the only place the store is mutated.
///
/// Network calls run as detached tasks and report back through the event
/// channel, so a slow request never blocks polling or operator input.
async fn run_engine(
    mut store: DashboardStore,
    client: RemoteClient,
    mut rx: mpsc::Receiver<Event>,
    tx: mpsc::WeakSender<Event>,
    projection_tx: watch::Sender<Projection>,
    poll_interval: Duration,
) {
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        remote = %client.base_url(),
        poll_interval_ms = poll_interval.as_millis() as u64,
        "Dashboard engine started"
    );

    loop {
        let event = tokio::select! {
            _ = ticker.tick() => Event::PollDue,
            maybe = rx.recv() => match maybe {
                Some(event) => event,
                None => break,
            },
        };

        let now = Instant::now();
        let effects = store.apply(event, now);
        for effect in effects {
            run_effect(effect, &client, &tx);
        }

        projection_tx.send_replace(store.projection(now));
    }

    tracing::info!("Dashboard engine stopped");
}

fn run_effect(effect: Effect, client: &RemoteClient, tx: &mpsc::WeakSender<Event>) {
    let Some(tx) = tx.upgrade() else {
        return;
    };
    let client = client.clone();

    match effect {
        Effect::Fetch { seq } => {
            tokio::spawn(async move {
                let result = client.get_state().await;
                let _ = tx.send(Event::SnapshotReceived { seq, result }).await;
            });
        }
        Effect::SendCommand(command) => {
            tokio::spawn(async move {
                tracing::info!(command = %command, "Dispatching bot command");
                let result = client.send_command(command).await;
                let _ = tx.send(Event::CommandCompleted { command, result }).await;
            });
        }
        Effect::SaveStrategy { revision, payload } => {
            tokio::spawn(async move {
                let result = client.save_config(&payload).await;
                let _ = tx.send(Event::StrategySaveCompleted { revision, result }).await;
            });
        }
        Effect::SaveExecution { revision, payload } => {
            tokio::spawn(async move {
                let result = client.save_execution_config(&payload).await;
                let _ = tx.send(Event::ExecutionSaveCompleted { revision, result }).await;
            });
        }
        Effect::ExpireNotice { generation, at } => {
            tokio::spawn(async move {
                sleep_until(at).await;
                let _ = tx.send(Event::NoticeExpired { generation }).await;
            });
        }
    }
}
