use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest per-asset market view reported by the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub asset: String,
    #[serde(default)]
    pub spot_price: Option<Decimal>,
    #[serde(default)]
    pub change_24h: Decimal,
    #[serde(default = "default_odds")]
    pub yes_odds: Decimal,
    #[serde(default = "default_odds")]
    pub no_odds: Decimal,
    #[serde(default = "unknown_source")]
    pub odds_source: String,
    /// False when the odds are a fallback rather than a live book quote.
    #[serde(default)]
    pub odds_live: bool,
    #[serde(default = "unknown_source")]
    pub price_source: String,
    #[serde(default)]
    pub price_age_seconds: Option<i64>,
    #[serde(default)]
    pub market_id: String,
    #[serde(default)]
    pub market_slug: String,
    /// Unix seconds at which the current 15m window opened.
    #[serde(default)]
    pub window_ts: Option<i64>,
    #[serde(default)]
    pub market_end_ts: Option<i64>,
    #[serde(default)]
    pub price_to_beat: Option<Decimal>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_opt")]
    pub timestamp: Option<DateTime<Utc>>,
}

fn default_odds() -> Decimal {
    Decimal::new(5, 1)
}

fn unknown_source() -> String {
    "UNKNOWN".into()
}

impl MarketSnapshot {
    /// Minimal snapshot for an asset with no data beyond its id.
    pub fn empty(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            spot_price: None,
            change_24h: Decimal::ZERO,
            yes_odds: default_odds(),
            no_odds: default_odds(),
            odds_source: unknown_source(),
            odds_live: false,
            price_source: unknown_source(),
            price_age_seconds: None,
            market_id: String::new(),
            market_slug: String::new(),
            window_ts: None,
            market_end_ts: None,
            price_to_beat: None,
            timestamp: None,
        }
    }

    pub fn is_down(&self) -> bool {
        self.change_24h < Decimal::ZERO
    }
}
