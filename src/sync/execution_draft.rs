use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{ExecutionConfig, ExecutionConfigUpdate, ExecutionMode};

/// An operator edit to the execution form. Every field present is applied,
/// so a renderer may post the whole form (`{"mode", "wallet_secret"}`) or a
/// single field.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ExecutionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_secret: Option<String>,
}

impl ExecutionEdit {
    pub fn set_mode(mode: ExecutionMode) -> Self {
        Self {
            mode: Some(mode),
            wallet_secret: None,
        }
    }

    pub fn set_wallet_secret(wallet_secret: impl Into<String>) -> Self {
        Self {
            mode: None,
            wallet_secret: Some(wallet_secret.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mode.is_none() && self.wallet_secret.is_none()
    }
}

impl fmt::Debug for ExecutionEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionEdit")
            .field("mode", &self.mode)
            .field("wallet_secret", &self.wallet_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Local execution form: mode plus a write-only wallet secret.
///
/// The secret only ever flows operator -> bot. Snapshots can reset `mode`
/// while the draft is clean, never the secret.
#[derive(Clone, Default)]
pub struct ExecutionDraft {
    mode: ExecutionMode,
    wallet_secret: String,
    dirty: bool,
    revision: u64,
    min_seq: u64,
    /// Secret captured at each revision with a save still in flight, and how
    /// many saves of that revision are outstanding.
    in_flight: BTreeMap<u64, (String, usize)>,
}

impl fmt::Debug for ExecutionDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionDraft")
            .field("mode", &self.mode)
            .field("wallet_secret_pending", &self.has_pending_secret())
            .field("dirty", &self.dirty)
            .field("revision", &self.revision)
            .finish()
    }
}

impl ExecutionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_pending_secret(&self) -> bool {
        !self.wallet_secret.is_empty()
    }

    /// Offer a freshly accepted snapshot's execution config. Only `mode` is
    /// taken from it.
    pub fn reconcile(&mut self, seq: u64, remote: &ExecutionConfig) -> bool {
        if self.dirty || seq < self.min_seq {
            return false;
        }
        self.mode = remote.mode;
        true
    }

    pub fn apply(&mut self, edit: ExecutionEdit) {
        if let Some(mode) = edit.mode {
            self.mode = mode;
        }
        if let Some(wallet_secret) = edit.wallet_secret {
            self.wallet_secret = wallet_secret;
        }
        self.dirty = true;
        self.revision += 1;
    }

    /// Payload for `POST /api/execution-config` plus the revision it captures.
    pub fn begin_save(&mut self) -> (u64, ExecutionConfigUpdate) {
        let entry = self
            .in_flight
            .entry(self.revision)
            .or_insert_with(|| (self.wallet_secret.clone(), 0));
        entry.1 += 1;

        let update = ExecutionConfigUpdate {
            mode: self.mode,
            wallet_secret: self.wallet_secret.clone(),
        };
        (self.revision, update)
    }

    /// The bot accepted the save issued at `revision`. The secret is cleared
    /// unless the operator typed a different one since.
    pub fn save_succeeded(&mut self, revision: u64, refetch_seq: u64) {
        self.min_seq = self.min_seq.max(refetch_seq);
        if let Some((sent, _)) = self.in_flight.get(&revision) {
            if *sent == self.wallet_secret {
                self.wallet_secret.clear();
            }
        }
        // Older saves are superseded by this one
        self.in_flight = self.in_flight.split_off(&(revision + 1));
        if revision == self.revision {
            self.dirty = false;
        }
    }

    /// The bot rejected the save issued at `revision`. Everything typed is
    /// kept for a retry.
    pub fn save_failed(&mut self, revision: u64) {
        if let Some((_, outstanding)) = self.in_flight.get_mut(&revision) {
            *outstanding -= 1;
            if *outstanding == 0 {
                self.in_flight.remove(&revision);
            }
        }
    }
}
