use std::time::Duration;

use tokio::time::Instant;

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(2_500);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Notice {
    message: String,
    expires_at: Instant,
    generation: u64,
}

/// Single-slot, last-write-wins result message.
#[derive(Debug, Clone)]
pub struct NoticeSlot {
    current: Option<Notice>,
    generation: u64,
    ttl: Duration,
}

impl NoticeSlot {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: None,
            generation: 0,
            ttl,
        }
    }

    /// Replace whatever is shown. Returns the generation and expiry the
    /// caller should schedule a clear for.
    pub fn set(&mut self, message: impl Into<String>, now: Instant) -> (u64, Instant) {
        self.generation += 1;
        let expires_at = now + self.ttl;
        self.current = Some(Notice {
            message: message.into(),
            expires_at,
            generation: self.generation,
        });
        (self.generation, expires_at)
    }

    /// Clear the notice if it is still the one from `generation`.
    pub fn expire(&mut self, generation: u64) -> bool {
        match &self.current {
            Some(notice) if notice.generation == generation => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Expiry of the notice currently held, shown or not.
    pub fn expires_at(&self) -> Option<Instant> {
        self.current.as_ref().map(|n| n.expires_at)
    }

    /// Message visible at `now`; `None` once past expiry even if the clear
    /// has not run yet.
    pub fn message(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|n| now < n.expires_at)
            .map(|n| n.message.as_str())
    }
}

impl Default for NoticeSlot {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}
