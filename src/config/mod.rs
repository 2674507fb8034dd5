use chrono::FixedOffset;
use std::env;
use std::time::Duration;

use crate::remote::client::DEFAULT_REMOTE_BASE;
use crate::sync::EngineSettings;

const MIN_POLL_INTERVAL_MS: u64 = 1_000;
const MAX_POLL_INTERVAL_MS: u64 = 3_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the bot's state-and-command API.
    pub remote_base_url: String,
    pub host: String,
    pub port: u16,

    pub poll_interval: Duration,
    pub notice_ttl: Duration,
    pub request_timeout: Duration,

    /// Offset used for time-of-day display (default UTC-3).
    pub display_offset: FixedOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let poll_ms: u64 = env::var("POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "2000".into())
            .parse()?;
        let offset_minutes: i32 = env::var("DISPLAY_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "-180".into())
            .parse()?;
        let display_offset = FixedOffset::east_opt(offset_minutes * 60)
            .ok_or_else(|| anyhow::anyhow!("DISPLAY_UTC_OFFSET_MINUTES out of range: {offset_minutes}"))?;

        Ok(Self {
            remote_base_url: env::var("REMOTE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_REMOTE_BASE.into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            poll_interval: Duration::from_millis(clamp_poll_interval(poll_ms)),
            notice_ttl: Duration::from_millis(
                env::var("NOTICE_TTL_MS")
                    .unwrap_or_else(|_| "2500".into())
                    .parse()
                    .unwrap_or(2_500),
            ),
            request_timeout: Duration::from_millis(
                env::var("REQUEST_TIMEOUT_MS")
                    .unwrap_or_else(|_| "5000".into())
                    .parse()
                    .unwrap_or(5_000),
            ),
            display_offset,
        })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            poll_interval: self.poll_interval,
            notice_ttl: self.notice_ttl,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote_base_url: DEFAULT_REMOTE_BASE.into(),
            host: "127.0.0.1".into(),
            port: 8080,
            poll_interval: Duration::from_millis(2_000),
            notice_ttl: Duration::from_millis(2_500),
            request_timeout: Duration::from_millis(5_000),
            display_offset: FixedOffset::west_opt(3 * 3600).expect("UTC-3 is a valid offset"),
        }
    }
}

fn clamp_poll_interval(ms: u64) -> u64 {
    if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&ms) {
        tracing::warn!(
            requested_ms = ms,
            "POLL_INTERVAL_MS outside 1000..=3000, clamping"
        );
    }
    ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_interval_clamped() {
        assert_eq!(clamp_poll_interval(250), 1_000);
        assert_eq!(clamp_poll_interval(2_000), 2_000);
        assert_eq!(clamp_poll_interval(10_000), 3_000);
    }

    #[test]
    fn test_default_display_offset_is_brt() {
        let config = AppConfig::default();
        assert_eq!(config.display_offset.local_minus_utc(), -3 * 3600);
        assert_eq!(config.engine_settings().notice_ttl, Duration::from_millis(2_500));
    }
}
