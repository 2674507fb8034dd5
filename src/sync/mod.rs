//! Client-side state synchronization: the snapshot store, the two config
//! drafts, the notice slot and the engine task that drives them.

pub mod engine;
pub mod execution_draft;
pub mod notice;
pub mod percent;
pub mod store;
pub mod strategy_draft;

pub use engine::{spawn_engine, DashboardHandle, EngineClosed, EngineSettings};
pub use execution_draft::{ExecutionDraft, ExecutionEdit};
pub use notice::NoticeSlot;
pub use percent::PercentField;
pub use store::{DashboardStore, Effect, Event, Projection};
pub use strategy_draft::{InputError, StrategyDraft, StrategyEdit, StrategyField};
