use serde::{Deserialize, Serialize};
use std::fmt;

use super::ExecutionMode;

/// Execution settings as the bot reports them. Never carries the raw key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub mode: ExecutionMode,
    pub wallet_configured: bool,
    pub wallet_masked: String,
}

/// Body of `POST /api/execution-config`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfigUpdate {
    pub mode: ExecutionMode,
    #[serde(default)]
    pub wallet_secret: String,
}

// Keep the private key out of logs.
impl fmt::Debug for ExecutionConfigUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionConfigUpdate")
            .field("mode", &self.mode)
            .field("wallet_secret", &if self.wallet_secret.is_empty() { "" } else { "***" })
            .finish()
    }
}
