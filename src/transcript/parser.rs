use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::fill::fill_model::{SpokenEntry, entries_from_json};
use crate::transcript::ai_model::TextInference;
use crate::transcript::local_parser::{polish_locally, transcript_to_entries};

const PARSE_SYSTEM_PROMPT: &str = "You convert a messy spoken transcript about filling a form into a clean JSON map of {fieldName: value}.
- Preserve factual content.
- Normalize numbers (e.g., '$5,000' -> '$5,000'; '5k' -> '$5,000').
- Keep dates legible (e.g., 'Nov 2, 2025').
- If multiple values are present for a checkbox/radio group, output a comma-separated string.
- Do not invent fields; only use what the user said.";

const POLISH_PROMPT: &str = "Rewrite the following content into a concise, polished, professional tone for a remodeling proposal/contract. Improve grammar and clarity without changing facts:\n---\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseSource {
    Ai,
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTranscript {
    pub entries: Vec<SpokenEntry>,
    pub source: ParseSource,
}

/// Turns a final transcript into field entries: language model first when
/// one is configured, the local "Label: Value" parser otherwise or on any
/// failure.
pub struct TranscriptParser {
    backend: Option<Box<dyn TextInference>>,
}

impl TranscriptParser {
    pub fn local() -> Self {
        Self { backend: None }
    }

    pub fn with_backend(backend: Box<dyn TextInference>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn parse(&self, text: &str) -> ParsedTranscript {
        let text = text.trim();
        let local = || ParsedTranscript {
            entries: transcript_to_entries(text),
            source: ParseSource::Local,
        };

        let Some(backend) = &self.backend else {
            return local();
        };
        if text.is_empty() {
            return local();
        }

        let user = format!(
            "Transcript:\n\"\"\"{}\"\"\"\n\nReturn ONLY JSON (no backticks, no commentary).",
            text
        );
        let reply = match backend.infer(Some(PARSE_SYSTEM_PROMPT), &user) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(backend = backend.name(), error = %e, "AI transcript parse failed, using local parser");
                return local();
            }
        };

        match parse_model_json(&reply) {
            Some(entries) => ParsedTranscript {
                entries,
                source: ParseSource::Ai,
            },
            None => {
                debug!(backend = backend.name(), "model reply was not a JSON object");
                local()
            }
        }
    }
}

/// Strip an optional markdown fence and read a JSON object of entries.
pub fn parse_model_json(reply: &str) -> Option<Vec<SpokenEntry>> {
    let body = reply.trim();
    let body = body
        .strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .map(|rest| rest.trim_end().trim_end_matches("```").trim())
        .unwrap_or(body);

    let value: Value = serde_json::from_str(body).ok()?;
    entries_from_json(&value).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PolishSource {
    Ai,
    LocalRules,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polished {
    pub text: String,
    pub source: PolishSource,
}

/// Rewrites dictated prose into a professional tone.
pub struct Polisher {
    backend: Option<Box<dyn TextInference>>,
}

impl Polisher {
    pub fn local() -> Self {
        Self { backend: None }
    }

    pub fn with_backend(backend: Box<dyn TextInference>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn polish(&self, text: &str) -> Polished {
        let Some(backend) = &self.backend else {
            return Polished {
                text: polish_locally(text),
                source: PolishSource::LocalRules,
            };
        };

        match backend.infer(None, &format!("{}{}", POLISH_PROMPT, text)) {
            Ok(reply) => Polished {
                text: reply,
                source: PolishSource::Ai,
            },
            Err(e) => {
                warn!(backend = backend.name(), error = %e, "AI polish failed, leaving text unchanged");
                Polished {
                    text: text.to_string(),
                    source: PolishSource::Unchanged,
                }
            }
        }
    }
}
