use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FillError, Result};

/// Below this combined score a generic match is not trusted.
pub const MATCH_THRESHOLD: f32 = 0.25;

/// Pause between checkbox/radio clicks so page handlers can re-render.
pub const CLICK_PACING_MS: u64 = 20;

/// One dictated field assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenEntry {
    pub key: String,
    pub value: String,
}

impl SpokenEntry {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillOptions {
    pub threshold: f32,
    pub click_pacing: Duration,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            threshold: MATCH_THRESHOLD,
            click_pacing: Duration::from_millis(CLICK_PACING_MS),
        }
    }
}

impl FillOptions {
    /// Defaults without the click pause.
    pub fn unpaced() -> Self {
        Self {
            click_pacing: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Coerce a JSON value to the text a field receives. `None` for null.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(value_to_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Read a `{ "label": value }` JSON object into entries, keeping key order.
pub fn entries_from_json(value: &Value) -> Result<Vec<SpokenEntry>> {
    let map = value.as_object().ok_or_else(|| FillError::Json {
        context: "field map".into(),
        source: <serde_json::Error as serde::de::Error>::custom("expected a JSON object of label -> value"),
    })?;

    Ok(map
        .iter()
        .filter_map(|(k, v)| {
            value_to_text(v).map(|text| SpokenEntry {
                key: k.clone(),
                value: text,
            })
        })
        .collect())
}

/// Parse a JSON object string into entries.
pub fn entries_from_json_str(raw: &str) -> Result<Vec<SpokenEntry>> {
    let value: Value = serde_json::from_str(raw).map_err(|e| FillError::Json {
        context: "field map".into(),
        source: e,
    })?;
    entries_from_json(&value)
}
