use serde::Serialize;

/// Lifecycle of a dictation session. `Stopped` can be started again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Idle,
    Listening,
    Stopped,
}

/// One recognition hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub transcript: String,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn interim(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            is_final: false,
        }
    }

    pub fn final_text(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            is_final: true,
        }
    }
}

/// Callbacks a speech engine delivers while running.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// Results from `result_index` onwards are new or revised
    Results {
        result_index: usize,
        results: Vec<RecognitionResult>,
    },
    Error(String),
    End,
}

/// What a session reports to whoever is displaying it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionMessage {
    Update { interim: String, final_text: String },
    State { listening: bool },
    Error { message: String },
}

/// A continuous speech-to-text engine.
pub trait Recognizer {
    fn start(&mut self) -> Result<(), String>;

    fn stop(&mut self);
}
