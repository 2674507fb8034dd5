pub mod execution;
pub mod market;
pub mod snapshot;
pub mod strategy;
pub mod timestamp;
pub mod trade;

pub use execution::{ExecutionConfig, ExecutionConfigUpdate};
pub use market::MarketSnapshot;
pub use snapshot::{StateSnapshot, Stats};
pub use strategy::{Indicator, StrategyConfig};
pub use trade::Trade;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Display order for market cards. Assets the remote reports outside this
/// list are placed after it.
pub const CANONICAL_ASSETS: [&str; 3] = ["BTC", "ETH", "SOL"];

/// Known assets in `CANONICAL_ASSETS` order first, then any others by id.
pub fn canonical_cmp(a: &str, b: &str) -> Ordering {
    let rank = |asset: &str| CANONICAL_ASSETS.iter().position(|known| *known == asset);
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

// ---------------------------------------------------------------------------
// ExecutionMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExecutionMode {
    #[default]
    Test,
    Real,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Test => write!(f, "TEST"),
            ExecutionMode::Real => write!(f, "REAL"),
        }
    }
}
