use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::models::{ExecutionConfigUpdate, StateSnapshot, StrategyConfig};

pub const DEFAULT_REMOTE_BASE: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bot API returned {status}{}", detail_suffix(.detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl RemoteError {
    /// Server-supplied `detail` message, when the error body carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RemoteError::Status { detail, .. } => detail.as_deref(),
            RemoteError::Http(_) => None,
        }
    }
}

/// Bot lifecycle commands. All are bodiless POSTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Stop,
    Tick,
}

impl BotCommand {
    pub fn path(&self) -> &'static str {
        match self {
            BotCommand::Start => "/api/bot/start",
            BotCommand::Stop => "/api/bot/stop",
            BotCommand::Tick => "/api/bot/tick",
        }
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotCommand::Start => write!(f, "start"),
            BotCommand::Stop => write!(f, "stop"),
            BotCommand::Tick => write!(f, "tick"),
        }
    }
}

#[derive(Deserialize)]
struct ErrorDetail {
    detail: serde_json::Value,
}

/// Client for the bot's state-and-command API.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full state document.
    pub async fn get_state(&self) -> Result<StateSnapshot, RemoteError> {
        let url = format!("{}/api/state", self.base_url);
        let resp = self.http.get(&url).send().await?;
        let resp = check_status(resp).await?;

        let snapshot: StateSnapshot = resp.json().await?;
        Ok(snapshot)
    }

    /// Issue a lifecycle command. Only the status code is consulted.
    pub async fn send_command(&self, command: BotCommand) -> Result<(), RemoteError> {
        let url = format!("{}{}", self.base_url, command.path());
        let resp = self.http.post(&url).send().await?;
        check_status(resp).await?;
        Ok(())
    }

    pub async fn save_config(&self, config: &StrategyConfig) -> Result<(), RemoteError> {
        let url = format!("{}/api/config", self.base_url);
        let resp = self.http.post(&url).json(config).send().await?;
        check_status(resp).await?;
        Ok(())
    }

    pub async fn save_execution_config(
        &self,
        update: &ExecutionConfigUpdate,
    ) -> Result<(), RemoteError> {
        let url = format!("{}/api/execution-config", self.base_url);
        let resp = self.http.post(&url).json(update).send().await?;
        check_status(resp).await?;
        Ok(())
    }
}

/// Map non-2xx responses to `RemoteError::Status`, pulling a string `detail`
/// out of the body when present.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.bytes().await.unwrap_or_default();
    let detail = serde_json::from_slice::<ErrorDetail>(&body)
        .ok()
        .and_then(|e| match e.detail {
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        });

    Err(RemoteError::Status { status, detail })
}
