use serde::{Deserialize, Serialize};
use std::fmt;

use super::{canonical_cmp, CANONICAL_ASSETS};

// ---------------------------------------------------------------------------
// Indicator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indicator {
    Macd,
    Trend,
    PolyPrice,
}

impl Indicator {
    /// The only indicator set the bot currently accepts on save.
    pub const SUPPORTED: [Indicator; 1] = [Indicator::PolyPrice];
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indicator::Macd => write!(f, "MACD"),
            Indicator::Trend => write!(f, "TREND"),
            Indicator::PolyPrice => write!(f, "POLY_PRICE"),
        }
    }
}

// ---------------------------------------------------------------------------
// StrategyConfig
// ---------------------------------------------------------------------------

/// Strategy parameters as exchanged with `/api/state` and `/api/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub enabled_assets: Vec<String>,
    pub enabled_indicators: Vec<Indicator>,
    pub confidence_threshold: f64,
    /// Minimum YES/NO price required to enter.
    pub entry_probability_threshold: f64,
    /// Entry window before market close, in seconds.
    pub late_entry_seconds: u32,
    /// Stop loss as a fraction (0.2 = 20%).
    pub stop_loss_pct: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            enabled_assets: CANONICAL_ASSETS.iter().map(|a| a.to_string()).collect(),
            enabled_indicators: Indicator::SUPPORTED.to_vec(),
            confidence_threshold: 0.85,
            entry_probability_threshold: 0.85,
            late_entry_seconds: 180,
            stop_loss_pct: 0.2,
        }
    }
}

impl StrategyConfig {
    /// The single payload shape sent on save: assets de-duplicated in display
    /// order, indicator list forced to the supported set.
    pub fn canonical(&self) -> StrategyConfig {
        let mut assets: Vec<String> = self
            .enabled_assets
            .iter()
            .map(|a| a.trim().to_uppercase())
            .filter(|a| !a.is_empty())
            .collect();
        assets.sort_by(|a, b| canonical_cmp(a, b));
        assets.dedup();

        StrategyConfig {
            enabled_assets: assets,
            enabled_indicators: Indicator::SUPPORTED.to_vec(),
            confidence_threshold: self.confidence_threshold,
            entry_probability_threshold: self.entry_probability_threshold,
            late_entry_seconds: self.late_entry_seconds,
            stop_loss_pct: self.stop_loss_pct,
        }
    }

    pub fn has_asset(&self, asset: &str) -> bool {
        self.enabled_assets.iter().any(|a| a == asset)
    }
}
