use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ExecutionConfig, MarketSnapshot, StrategyConfig, Trade};

/// Aggregate P&L counters as computed by the bot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub balance: Decimal,
    pub today_pnl: Decimal,
    pub all_time_pnl: Decimal,
    #[serde(alias = "trade_count")]
    pub trades: i64,
    pub wins: i64,
    /// Fraction in [0, 1].
    pub win_rate: Decimal,
    pub avg_pnl: Decimal,
}

/// The full `/api/state` document. Replaced wholesale on every accepted poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSnapshot {
    pub stats: Stats,
    pub config: StrategyConfig,
    pub execution_config: ExecutionConfig,
    pub markets: HashMap<String, MarketSnapshot>,
    pub history: Vec<Trade>,
    pub open_trades: Vec<Trade>,
    pub running: bool,
    pub tick_count: u64,
    #[serde(deserialize_with = "super::timestamp::deserialize_opt")]
    pub last_tick_at: Option<DateTime<Utc>>,
    pub last_decision_by_asset: HashMap<String, String>,
    pub window_seconds_remaining: Option<i64>,
}
