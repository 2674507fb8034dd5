use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::StrategyConfig;

use super::percent::PercentField;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{field}: '{value}' is not a number")]
    NotANumber { field: StrategyField, value: String },

    #[error("{field}: value must be finite and non-negative")]
    OutOfDomain { field: StrategyField },
}

/// A single operator edit to the strategy form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StrategyEdit {
    ToggleAsset { asset: String },
    SetEntryProbability { value: f64 },
    SetConfidence { value: f64 },
    SetLateEntrySeconds { value: u32 },
    /// Percent as shown in the form; stored as a fraction.
    SetStopLossPercent { value: f64 },
}

/// Numeric form fields that accept free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyField {
    EntryProbabilityThreshold,
    ConfidenceThreshold,
    LateEntrySeconds,
    StopLossPercent,
}

impl std::fmt::Display for StrategyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StrategyField::EntryProbabilityThreshold => "entry_probability_threshold",
            StrategyField::ConfidenceThreshold => "confidence_threshold",
            StrategyField::LateEntrySeconds => "late_entry_seconds",
            StrategyField::StopLossPercent => "stop_loss_percent",
        };
        f.write_str(name)
    }
}

impl StrategyField {
    /// Parse operator text into an edit. Range checks are left to the bot,
    /// which rejects out-of-range values on save with a `detail` message.
    pub fn parse(self, text: &str) -> Result<StrategyEdit, InputError> {
        let trimmed = text.trim().replace(',', ".");
        let value: f64 = trimmed.parse().map_err(|_| InputError::NotANumber {
            field: self,
            value: text.to_string(),
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(InputError::OutOfDomain { field: self });
        }

        Ok(match self {
            StrategyField::EntryProbabilityThreshold => {
                StrategyEdit::SetEntryProbability { value }
            }
            StrategyField::ConfidenceThreshold => StrategyEdit::SetConfidence { value },
            StrategyField::LateEntrySeconds => {
                if value > u32::MAX as f64 {
                    return Err(InputError::OutOfDomain { field: self });
                }
                StrategyEdit::SetLateEntrySeconds {
                    value: value.round() as u32,
                }
            }
            StrategyField::StopLossPercent => StrategyEdit::SetStopLossPercent { value },
        })
    }
}

/// Editable copy of the strategy config, gated against poll overwrite by
/// `dirty`.
#[derive(Debug, Clone)]
pub struct StrategyDraft {
    draft: StrategyConfig,
    dirty: bool,
    /// Bumped on every edit; lets a save tell whether it covered the latest
    /// edits.
    revision: u64,
    /// Snapshots requested before the last accepted save may carry the old
    /// config and must not re-seed the draft.
    min_seq: u64,
}

impl Default for StrategyDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyDraft {
    pub fn new() -> Self {
        Self {
            draft: StrategyConfig::default(),
            dirty: false,
            revision: 0,
            min_seq: 0,
        }
    }

    pub fn draft(&self) -> &StrategyConfig {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Offer a freshly accepted snapshot's config. Returns true when the draft
    /// was overwritten.
    pub fn reconcile(&mut self, seq: u64, remote: &StrategyConfig) -> bool {
        if self.dirty || seq < self.min_seq {
            return false;
        }
        self.draft = remote.clone();
        true
    }

    /// Apply an edit. Marks the draft dirty even when the value is unchanged.
    pub fn apply(&mut self, edit: StrategyEdit) {
        match edit {
            StrategyEdit::ToggleAsset { asset } => {
                let asset = asset.trim().to_uppercase();
                if self.draft.has_asset(&asset) {
                    self.draft.enabled_assets.retain(|a| *a != asset);
                } else {
                    self.draft.enabled_assets.push(asset);
                }
            }
            StrategyEdit::SetEntryProbability { value } => {
                self.draft.entry_probability_threshold = value;
            }
            StrategyEdit::SetConfidence { value } => {
                self.draft.confidence_threshold = value;
            }
            StrategyEdit::SetLateEntrySeconds { value } => {
                self.draft.late_entry_seconds = value;
            }
            StrategyEdit::SetStopLossPercent { value } => {
                self.draft.stop_loss_pct = PercentField::from_display(value);
            }
        }
        self.dirty = true;
        self.revision += 1;
    }

    /// Payload for `POST /api/config` plus the revision it captures.
    pub fn begin_save(&self) -> (u64, StrategyConfig) {
        (self.revision, self.draft.canonical())
    }

    /// The bot accepted the save issued at `revision`. `refetch_seq` is the
    /// sequence number of the fetch that follows it.
    pub fn save_succeeded(&mut self, revision: u64, refetch_seq: u64) {
        self.min_seq = self.min_seq.max(refetch_seq);
        if revision == self.revision {
            self.dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(late_entry_seconds: u32) -> StrategyConfig {
        StrategyConfig {
            late_entry_seconds,
            ..StrategyConfig::default()
        }
    }

    #[test]
    fn test_clean_draft_follows_remote() {
        let mut draft = StrategyDraft::new();
        assert!(draft.reconcile(1, &remote(200)));
        assert_eq!(draft.draft().late_entry_seconds, 200);
        assert!(draft.reconcile(2, &remote(150)));
        assert_eq!(draft.draft().late_entry_seconds, 150);
    }

    #[test]
    fn test_edit_blocks_remote_overwrite() {
        let mut draft = StrategyDraft::new();
        draft.reconcile(1, &remote(180));
        draft.apply(StrategyEdit::SetLateEntrySeconds { value: 240 });
        assert!(draft.is_dirty());

        assert!(!draft.reconcile(2, &remote(180)));
        assert!(!draft.reconcile(3, &remote(300)));
        assert_eq!(draft.draft().late_entry_seconds, 240);
    }

    #[test]
    fn test_same_value_edit_still_dirties() {
        let mut draft = StrategyDraft::new();
        draft.reconcile(1, &remote(180));
        draft.apply(StrategyEdit::SetLateEntrySeconds { value: 180 });
        assert!(draft.is_dirty());
    }

    #[test]
    fn test_toggle_asset_adds_and_removes() {
        let mut draft = StrategyDraft::new();
        draft.apply(StrategyEdit::ToggleAsset { asset: "eth".into() });
        assert!(!draft.draft().has_asset("ETH"));
        draft.apply(StrategyEdit::ToggleAsset { asset: "ETH".into() });
        assert!(draft.draft().has_asset("ETH"));
    }

    #[test]
    fn test_stop_loss_percent_stored_as_fraction() {
        let mut draft = StrategyDraft::new();
        draft.apply(StrategyEdit::SetStopLossPercent { value: 35.0 });
        assert_eq!(draft.draft().stop_loss_pct, 0.35);
    }

    #[test]
    fn test_save_success_clears_dirty_and_fences_old_snapshots() {
        let mut draft = StrategyDraft::new();
        draft.reconcile(1, &remote(180));
        draft.apply(StrategyEdit::SetLateEntrySeconds { value: 240 });
        let (revision, payload) = draft.begin_save();
        assert_eq!(payload.late_entry_seconds, 240);

        draft.save_succeeded(revision, 5);
        assert!(!draft.is_dirty());
        // A poll issued before the save still carries the old value
        assert!(!draft.reconcile(4, &remote(180)));
        assert_eq!(draft.draft().late_entry_seconds, 240);
        assert!(draft.reconcile(5, &remote(240)));
    }

    #[test]
    fn test_edit_during_save_keeps_dirty() {
        let mut draft = StrategyDraft::new();
        draft.apply(StrategyEdit::SetConfidence { value: 0.9 });
        let (revision, _) = draft.begin_save();
        draft.apply(StrategyEdit::SetConfidence { value: 0.95 });

        draft.save_succeeded(revision, 3);
        assert!(draft.is_dirty());
        assert_eq!(draft.draft().confidence_threshold, 0.95);
    }

    #[test]
    fn test_field_parse() {
        assert_eq!(
            StrategyField::StopLossPercent.parse("20").unwrap(),
            StrategyEdit::SetStopLossPercent { value: 20.0 }
        );
        assert_eq!(
            StrategyField::EntryProbabilityThreshold.parse(" 0,9 ").unwrap(),
            StrategyEdit::SetEntryProbability { value: 0.9 }
        );
        assert_eq!(
            StrategyField::LateEntrySeconds.parse("240.4").unwrap(),
            StrategyEdit::SetLateEntrySeconds { value: 240 }
        );
        assert!(matches!(
            StrategyField::ConfidenceThreshold.parse("abc"),
            Err(InputError::NotANumber { .. })
        ));
        assert!(matches!(
            StrategyField::LateEntrySeconds.parse("-10"),
            Err(InputError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_edit_json_shape() {
        let edit: StrategyEdit =
            serde_json::from_str(r#"{"op": "set_late_entry_seconds", "value": 240}"#).unwrap();
        assert_eq!(edit, StrategyEdit::SetLateEntrySeconds { value: 240 });
    }

    #[test]
    fn test_field_error_names_request_field() {
        for field in [
            StrategyField::EntryProbabilityThreshold,
            StrategyField::ConfidenceThreshold,
            StrategyField::LateEntrySeconds,
            StrategyField::StopLossPercent,
        ] {
            let wire = serde_json::to_value(field).unwrap();
            assert_eq!(wire.as_str(), Some(field.to_string().as_str()));
        }

        let err = StrategyField::StopLossPercent.parse("vinte").unwrap_err();
        assert_eq!(err.to_string(), "stop_loss_percent: 'vinte' is not a number");
    }
}
