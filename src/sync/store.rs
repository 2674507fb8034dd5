use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge};
use tokio::time::Instant;

use crate::models::{ExecutionConfigUpdate, ExecutionMode, StateSnapshot, StrategyConfig};
use crate::remote::{BotCommand, RemoteError};

use super::execution_draft::{ExecutionDraft, ExecutionEdit};
use super::notice::NoticeSlot;
use super::strategy_draft::{StrategyDraft, StrategyEdit};

pub const MSG_CONFIG_SAVED: &str = "Configuração salva ✅";
pub const MSG_CONFIG_FALLBACK_ERROR: &str = "falha de validação";
pub const MSG_EXECUTION_SAVED: &str = "Modo/carteira salvos ✅";
pub const MSG_EXECUTION_ERROR: &str = "Erro ao salvar modo/carteira";

/// Everything that can change dashboard state. Timer ticks, operator actions
/// and network completions all arrive here.
#[derive(Debug)]
pub enum Event {
    PollDue,
    SnapshotReceived {
        seq: u64,
        result: Result<StateSnapshot, RemoteError>,
    },
    Command(BotCommand),
    /// Start or stop depending on the last known `running` flag.
    Toggle,
    CommandCompleted {
        command: BotCommand,
        result: Result<(), RemoteError>,
    },
    EditStrategy(StrategyEdit),
    SaveStrategy,
    StrategySaveCompleted {
        revision: u64,
        result: Result<(), RemoteError>,
    },
    EditExecution(ExecutionEdit),
    SaveExecution,
    ExecutionSaveCompleted {
        revision: u64,
        result: Result<(), RemoteError>,
    },
    NoticeExpired {
        generation: u64,
    },
}

/// Work the runtime must perform on behalf of the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch { seq: u64 },
    SendCommand(BotCommand),
    SaveStrategy { revision: u64, payload: StrategyConfig },
    SaveExecution { revision: u64, payload: ExecutionConfigUpdate },
    ExpireNotice { generation: u64, at: Instant },
}

/// Read-only view of the store handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub snapshot: Arc<StateSnapshot>,
    /// 0 until the first snapshot is accepted.
    pub snapshot_seq: u64,
    pub last_poll_ok: bool,
    pub strategy: StrategyConfig,
    pub strategy_dirty: bool,
    pub execution_mode: ExecutionMode,
    pub execution_dirty: bool,
    pub wallet_secret_pending: bool,
    /// Notice visible when the projection was published. Readers that may
    /// hold a projection past its expiry go through `notice_at`.
    pub notice: Option<String>,
    pub notice_expires_at: Option<Instant>,
}

impl Projection {
    /// Notice as it should be shown at `now`.
    pub fn notice_at(&self, now: Instant) -> Option<&str> {
        match self.notice_expires_at {
            Some(at) if now < at => self.notice.as_deref(),
            _ => None,
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        DashboardStore::default().projection(Instant::now())
    }
}

/// Single owner of the snapshot, both drafts and the notice slot.
#[derive(Debug)]
pub struct DashboardStore {
    snapshot: Arc<StateSnapshot>,
    next_seq: u64,
    last_applied_seq: u64,
    last_poll_ok: bool,
    strategy: StrategyDraft,
    execution: ExecutionDraft,
    notice: NoticeSlot,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new(super::notice::DEFAULT_NOTICE_TTL)
    }
}

impl DashboardStore {
    pub fn new(notice_ttl: Duration) -> Self {
        Self {
            snapshot: Arc::new(StateSnapshot::default()),
            next_seq: 1,
            last_applied_seq: 0,
            last_poll_ok: false,
            strategy: StrategyDraft::new(),
            execution: ExecutionDraft::new(),
            notice: NoticeSlot::new(notice_ttl),
        }
    }

    pub fn snapshot(&self) -> &StateSnapshot {
        &self.snapshot
    }

    pub fn strategy(&self) -> &StrategyDraft {
        &self.strategy
    }

    pub fn execution(&self) -> &ExecutionDraft {
        &self.execution
    }

    pub fn last_applied_seq(&self) -> u64 {
        self.last_applied_seq
    }

    pub fn notice(&self, now: Instant) -> Option<&str> {
        self.notice.message(now)
    }

    pub fn apply(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        match event {
            Event::PollDue => vec![Effect::Fetch {
                seq: self.allocate_seq(),
            }],

            Event::SnapshotReceived { seq, result } => {
                self.on_snapshot(seq, result);
                Vec::new()
            }

            Event::Command(command) => {
                counter!("commands_total").increment(1);
                vec![Effect::SendCommand(command)]
            }

            Event::Toggle => {
                let command = if self.snapshot.running {
                    BotCommand::Stop
                } else {
                    BotCommand::Start
                };
                counter!("commands_total").increment(1);
                vec![Effect::SendCommand(command)]
            }

            Event::CommandCompleted { command, result } => {
                let message = match &result {
                    Ok(()) => {
                        tracing::info!(command = %command, "Bot command accepted");
                        command_success_message(command)
                    }
                    Err(e) => {
                        counter!("commands_failed_total").increment(1);
                        tracing::warn!(command = %command, error = %e, "Bot command failed");
                        command_failure_message(command)
                    }
                };
                let seq = self.allocate_seq();
                vec![Effect::Fetch { seq }, self.notify(message, now)]
            }

            Event::EditStrategy(edit) => {
                tracing::debug!(?edit, "Strategy draft edited");
                self.strategy.apply(edit);
                Vec::new()
            }

            Event::SaveStrategy => {
                counter!("saves_total").increment(1);
                let (revision, payload) = self.strategy.begin_save();
                vec![Effect::SaveStrategy { revision, payload }]
            }

            Event::StrategySaveCompleted { revision, result } => {
                let seq = self.allocate_seq();
                let message = match &result {
                    Ok(()) => {
                        self.strategy.save_succeeded(revision, seq);
                        tracing::info!(revision, "Strategy config saved");
                        MSG_CONFIG_SAVED.to_string()
                    }
                    Err(e) => {
                        counter!("saves_failed_total").increment(1);
                        tracing::warn!(revision, error = %e, "Strategy config save rejected");
                        format!("Erro: {}", e.detail().unwrap_or(MSG_CONFIG_FALLBACK_ERROR))
                    }
                };
                vec![Effect::Fetch { seq }, self.notify(message, now)]
            }

            Event::EditExecution(edit) => {
                tracing::debug!(?edit, "Execution draft edited");
                self.execution.apply(edit);
                Vec::new()
            }

            Event::SaveExecution => {
                counter!("saves_total").increment(1);
                let (revision, payload) = self.execution.begin_save();
                tracing::info!(revision, mode = %payload.mode, "Saving execution config");
                vec![Effect::SaveExecution { revision, payload }]
            }

            Event::ExecutionSaveCompleted { revision, result } => {
                let seq = self.allocate_seq();
                let message = match &result {
                    Ok(()) => {
                        self.execution.save_succeeded(revision, seq);
                        tracing::info!(revision, "Execution config saved");
                        MSG_EXECUTION_SAVED
                    }
                    Err(e) => {
                        counter!("saves_failed_total").increment(1);
                        tracing::warn!(revision, error = %e, "Execution config save rejected");
                        self.execution.save_failed(revision);
                        MSG_EXECUTION_ERROR
                    }
                };
                vec![Effect::Fetch { seq }, self.notify(message, now)]
            }

            Event::NoticeExpired { generation } => {
                self.notice.expire(generation);
                Vec::new()
            }
        }
    }

    pub fn projection(&self, now: Instant) -> Projection {
        let notice = self.notice.message(now);
        Projection {
            snapshot: Arc::clone(&self.snapshot),
            snapshot_seq: self.last_applied_seq,
            last_poll_ok: self.last_poll_ok,
            strategy: self.strategy.draft().clone(),
            strategy_dirty: self.strategy.is_dirty(),
            execution_mode: self.execution.mode(),
            execution_dirty: self.execution.is_dirty(),
            wallet_secret_pending: self.execution.has_pending_secret(),
            notice: notice.map(str::to_string),
            notice_expires_at: notice.and(self.notice.expires_at()),
        }
    }

    fn allocate_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn notify(&mut self, message: impl Into<String>, now: Instant) -> Effect {
        let (generation, at) = self.notice.set(message, now);
        Effect::ExpireNotice { generation, at }
    }

    fn on_snapshot(&mut self, seq: u64, result: Result<StateSnapshot, RemoteError>) {
        counter!("polls_total").increment(1);
        let snapshot = match result {
            Ok(s) => s,
            Err(e) => {
                counter!("polls_failed_total").increment(1);
                tracing::debug!(seq, error = %e, "State poll failed; keeping last snapshot");
                if seq > self.last_applied_seq {
                    self.last_poll_ok = false;
                }
                return;
            }
        };

        if seq < self.last_applied_seq {
            counter!("stale_snapshots_discarded_total").increment(1);
            tracing::debug!(
                seq,
                last_applied = self.last_applied_seq,
                "Discarding out-of-order state snapshot"
            );
            return;
        }

        gauge!("bot_running").set(if snapshot.running { 1.0 } else { 0.0 });

        self.snapshot = Arc::new(snapshot);
        self.last_applied_seq = seq;
        self.last_poll_ok = true;

        let strategy_reset = self.strategy.reconcile(seq, &self.snapshot.config);
        let execution_reset = self.execution.reconcile(seq, &self.snapshot.execution_config);
        tracing::trace!(seq, strategy_reset, execution_reset, "State snapshot applied");
    }
}

fn command_success_message(command: BotCommand) -> &'static str {
    match command {
        BotCommand::Start => "Bot iniciado ✅",
        BotCommand::Stop => "Bot pausado ✅",
        BotCommand::Tick => "Tick executado ✅",
    }
}

fn command_failure_message(command: BotCommand) -> &'static str {
    match command {
        BotCommand::Start => "Erro ao iniciar bot",
        BotCommand::Stop => "Erro ao pausar bot",
        BotCommand::Tick => "Erro ao executar tick",
    }
}
