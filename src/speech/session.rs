use tracing::{debug, info, warn};

use crate::error::{FillError, Result};
use crate::speech::speech_model::{
    RecognitionEvent, RecognitionResult, Recognizer, SessionMessage, SessionState,
};

const RESTRICTED_PREFIXES: [&str; 4] = ["chrome://", "chrome-extension://", "edge://", "about:"];

pub fn is_restricted_page(url: &str) -> bool {
    RESTRICTED_PREFIXES.iter().any(|p| url.starts_with(p))
}

/// Drives one recognizer for a page and accumulates the dictated text.
///
/// Only the final transcript is consumed by the fill engines; interim text
/// exists for display.
pub struct ListeningSession {
    recognizer: Option<Box<dyn Recognizer>>,
    state: SessionState,
    interim: String,
    final_text: String,
}

impl ListeningSession {
    /// `None` means the host has no speech engine; the first `start` fails.
    pub fn new(recognizer: Option<Box<dyn Recognizer>>) -> Self {
        Self {
            recognizer,
            state: SessionState::Idle,
            interim: String::new(),
            final_text: String::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }

    pub fn final_transcript(&self) -> &str {
        self.final_text.trim()
    }

    pub fn interim_transcript(&self) -> &str {
        self.interim.trim()
    }

    pub fn start(&mut self, page_url: &str) -> Result<Vec<SessionMessage>> {
        if is_restricted_page(page_url) {
            info!(page_url, "refusing to listen on restricted page");
            return Ok(vec![
                SessionMessage::Error {
                    message: FillError::RestrictedPage.to_string(),
                },
                SessionMessage::State { listening: false },
            ]);
        }

        if self.is_listening() {
            return Ok(vec![SessionMessage::State { listening: true }]);
        }

        let recognizer = self
            .recognizer
            .as_mut()
            .ok_or(FillError::SpeechUnsupported)?;

        self.interim.clear();
        self.final_text.clear();

        match recognizer.start() {
            Ok(()) => {
                self.state = SessionState::Listening;
                debug!("recognition started");
                Ok(vec![SessionMessage::State { listening: true }])
            }
            Err(e) => {
                warn!(error = %e, "recognizer failed to start");
                Ok(vec![SessionMessage::Error {
                    message: format!("Failed to start recognition: {}", e),
                }])
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
        if self.state == SessionState::Listening {
            self.state = SessionState::Stopped;
        }
    }

    pub fn handle(&mut self, event: RecognitionEvent) -> Vec<SessionMessage> {
        match event {
            RecognitionEvent::Results {
                result_index,
                results,
            } => {
                self.absorb(result_index, &results);
                vec![SessionMessage::Update {
                    interim: self.interim_transcript().to_string(),
                    final_text: self.final_transcript().to_string(),
                }]
            }
            RecognitionEvent::Error(error) => {
                let message = format!("Speech error: {}", error);
                warn!(%message);
                self.stop();
                vec![SessionMessage::Error { message }]
            }
            RecognitionEvent::End => {
                self.state = SessionState::Stopped;
                vec![SessionMessage::State { listening: false }]
            }
        }
    }

    // A final result commits its text and clears the interim line; a
    // pending one shows everything heard so far in this batch.
    fn absorb(&mut self, result_index: usize, results: &[RecognitionResult]) {
        let mut chunk = String::new();
        for result in results.iter().skip(result_index) {
            chunk.push_str(&result.transcript);
            if result.is_final {
                self.final_text.push_str(&result.transcript);
                self.final_text.push(' ');
                self.interim.clear();
            } else {
                self.interim = chunk.clone();
            }
        }
    }
}
