use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::report::report_model::{EntryOutcome, EntryReport, FillMode};
use crate::text::normalize::text_fingerprint;

/// One JSONL line per processed entry. The dictated value is only recorded
/// as a fingerprint.
#[derive(Debug, Serialize)]
pub struct FillTraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub mode: FillMode,
    pub spoken_key: String,
    pub value_fingerprint: String,

    pub outcome: &'static str,
    pub target: Option<String>,
    pub score: Option<f32>,
    pub detail: Option<String>,
}

impl FillTraceEvent {
    pub fn now(step: u64, mode: FillMode) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            mode,
            spoken_key: String::new(),
            value_fingerprint: String::new(),
            outcome: "",
            target: None,
            score: None,
            detail: None,
        }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.spoken_key = key.to_string();
        self.value_fingerprint = text_fingerprint(value);
        self
    }

    pub fn with_outcome(mut self, outcome: &EntryOutcome) -> Self {
        self.outcome = outcome.label();
        match outcome {
            EntryOutcome::Filled { target, score, .. } => {
                self.target = Some(target.clone());
                self.score = *score;
            }
            EntryOutcome::NotApplied { target } => self.target = Some(target.clone()),
            EntryOutcome::NoMatch { best_score } => self.score = Some(*best_score),
            EntryOutcome::NoBlock { label_contains } => self.detail = Some(label_contains.clone()),
            EntryOutcome::Failed { error } => self.detail = Some(error.clone()),
            EntryOutcome::NoRule => {}
        }
        self
    }

    pub fn from_report(step: u64, mode: FillMode, entry: &EntryReport) -> Self {
        Self::now(step, mode)
            .with_entry(&entry.key, &entry.value)
            .with_outcome(&entry.outcome)
    }
}
