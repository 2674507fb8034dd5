use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A trade as reported in the bot's `history` / `open_trades` lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub asset: String,
    /// UP or DOWN.
    pub direction: String,
    /// Execution venue the bot used (CLOB / GAMMA_API).
    #[serde(default, alias = "mode")]
    pub api_mode: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub pnl: Decimal,
    #[serde(default)]
    pub entry_price: Option<Decimal>,
    #[serde(default)]
    pub exit_price: Option<Decimal>,
    #[serde(default)]
    pub confidence: Option<Decimal>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_opt")]
    pub opened_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_opt")]
    pub closes_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_opt")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Trade {
    /// Time shown in the history table: close time once settled.
    pub fn display_time(&self) -> Option<DateTime<Utc>> {
        self.closed_at.or(self.opened_at)
    }
}
