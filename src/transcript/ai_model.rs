use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FillError, Result};

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// A text-in, text-out language model. Every call may fail; callers fall
/// back to local heuristics.
pub trait TextInference {
    fn name(&self) -> &'static str;

    fn infer(&self, system: Option<&str>, user: &str) -> Result<String>;
}

fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| FillError::Inference {
            backend: "http",
            message: e.to_string(),
        })
}

// ============================================================================
// Ollama Backend
// ============================================================================

pub struct OllamaBackend {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/generate".to_string(),
            model: "qwen2.5:1.5b".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaBackend {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            timeout,
        }
    }
}

impl TextInference for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn infer(&self, system: Option<&str>, user: &str) -> Result<String> {
        let request = OllamaRequest {
            model: &self.model,
            prompt: user,
            system,
            stream: false,
        };

        let failed = |message: String| FillError::Inference {
            backend: "ollama",
            message,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "ollama request");
        let response = http_client(self.timeout)?
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }

        let body: OllamaResponse = response.json().map_err(|e| failed(e.to_string()))?;
        let text = body.response.trim().to_string();
        if text.is_empty() {
            return Err(failed("empty response".into()));
        }
        Ok(text)
    }
}

// ============================================================================
// OpenAI-compatible chat completions backend
// ============================================================================

pub struct OpenAiBackend {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiBackend {
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.openai.com/v1/chat/completions";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    pub fn new(api_key: &str) -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            api_key: api_key.to_string(),
            temperature: 0.2,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read the key from `env_var`; a missing or blank key is an error.
    pub fn from_env(env_var: &str) -> Result<Self> {
        match std::env::var(env_var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(FillError::MissingApiKey(env_var.to_string())),
        }
    }
}

impl TextInference for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn infer(&self, system: Option<&str>, user: &str) -> Result<String> {
        let mut messages = vec![];
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let failed = |message: String| FillError::Inference {
            backend: "openai",
            message,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "chat completion request");
        let response = http_client(self.timeout)?
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status().as_u16())));
        }

        let body: ChatResponse = response.json().map_err(|e| failed(e.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| failed("no content in response".into()))
    }
}

// ============================================================================
// Mock Backend (for testing without a model server)
// ============================================================================

/// Returns a canned reply, or fails every call when `response` is `None`.
pub struct MockTextInference {
    pub response: Option<String>,
}

impl MockTextInference {
    pub fn replying(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { response: None }
    }
}

impl TextInference for MockTextInference {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn infer(&self, _system: Option<&str>, _user: &str) -> Result<String> {
        self.response.clone().ok_or(FillError::Inference {
            backend: "mock",
            message: "unavailable".into(),
        })
    }
}
