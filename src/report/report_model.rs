use serde::Serialize;

use crate::fields::field_model::ControlKind;

// ============================================================================
// Fill report: one entry per dictated field/value pair
// ============================================================================

/// Which strategy handled the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FillMode {
    Profile,
    Generic,
}

/// What happened to a single spoken entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryOutcome {
    /// A control (or composite group) was changed
    Filled {
        target: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        kind: Option<ControlKind>,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f32>,
    },
    /// A target was found but nothing could be applied to it
    NotApplied { target: String },
    /// Generic mode: no field scored at or above the threshold
    NoMatch { best_score: f32 },
    /// Profile mode: no rule pattern matched the spoken key
    NoRule,
    /// Profile mode: the rule's question block is not on the page
    NoBlock { label_contains: String },
    /// Applying raised an error; the batch carried on
    Failed { error: String },
}

impl EntryOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, EntryOutcome::Filled { .. })
    }

    /// Short stable name, used by the trace and console output.
    pub fn label(&self) -> &'static str {
        match self {
            EntryOutcome::Filled { .. } => "filled",
            EntryOutcome::NotApplied { .. } => "not_applied",
            EntryOutcome::NoMatch { .. } => "no_match",
            EntryOutcome::NoRule => "no_rule",
            EntryOutcome::NoBlock { .. } => "no_block",
            EntryOutcome::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryReport {
    pub key: String,
    pub value: String,
    #[serde(flatten)]
    pub outcome: EntryOutcome,
}

/// Result of one fill invocation. Informational only: per-entry problems
/// never turn into an error for the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillReport {
    pub mode: FillMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    pub entries: Vec<EntryReport>,
}

impl FillReport {
    pub fn new(mode: FillMode, profile: Option<&str>) -> Self {
        Self {
            mode,
            profile: profile.map(str::to_string),
            entries: vec![],
        }
    }

    pub fn push(&mut self, key: &str, value: &str, outcome: EntryOutcome) {
        self.entries.push(EntryReport {
            key: key.to_string(),
            value: value.to_string(),
            outcome,
        });
    }

    pub fn filled_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_filled()).count()
    }

    pub fn outcome_for(&self, key: &str) -> Option<&EntryOutcome> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.outcome)
    }
}
