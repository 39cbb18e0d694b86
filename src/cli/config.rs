use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::fill::fill_model::{CLICK_PACING_MS, FillOptions, MATCH_THRESHOLD};
use crate::transcript::ai_model::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_CONFIG_PATH: &str = "voice-form-fill.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "voice-form-fill",
    version,
    about = "Fill web forms from dictated field/value pairs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// AI provider for transcript parsing and polishing: none, ollama, openai
    #[arg(long, global = true)]
    pub ai: Option<String>,

    /// Model name for the AI provider
    #[arg(long, global = true)]
    pub ai_model: Option<String>,

    /// Path to config file (default: voice-form-fill.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill an HTML form from a JSON field map or a transcript
    Fill {
        /// HTML file containing the form
        #[arg(long)]
        html: String,

        /// Page URL; selects the known-form profile when it matches
        #[arg(long)]
        url: Option<String>,

        /// JSON object file of { "label": value }
        #[arg(long, conflicts_with = "transcript")]
        json: Option<String>,

        /// Transcript text file, parsed into field/value pairs first
        #[arg(long)]
        transcript: Option<String>,

        /// Minimum generic match score
        #[arg(long)]
        threshold: Option<f32>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// JSONL trace file (one line per entry)
        #[arg(long)]
        trace: Option<String>,
    },

    /// Parse a transcript into a JSON field map
    Parse {
        /// Transcript text file (reads stdin when omitted)
        #[arg(long)]
        input: Option<String>,
    },

    /// Rewrite dictated text in a professional tone
    Polish {
        /// Text file (reads stdin when omitted)
        #[arg(long)]
        input: Option<String>,
    },

    /// List the fillable fields the generic matcher sees
    Index {
        /// HTML file to index
        #[arg(long)]
        html: String,
    },

    /// Print the active form profile as YAML
    Profile,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `voice-form-fill.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    #[serde(default = "default_click_pacing")]
    pub click_pacing_ms: u64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: MATCH_THRESHOLD,
            click_pacing_ms: CLICK_PACING_MS,
        }
    }
}

impl MatchingConfig {
    pub fn fill_options(&self) -> FillOptions {
        FillOptions {
            threshold: self.threshold,
            click_pacing: Duration::from_millis(self.click_pacing_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Use profile mode on the known form's URL
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Profile YAML replacing the built-in one
    pub path: Option<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// none, ollama or openai
    #[serde(default = "default_provider")]
    pub provider: String,

    pub endpoint: Option<String>,
    pub model: Option<String>,

    /// Environment variable holding the OpenAI key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: None,
            model: None,
            api_key_env: default_api_key_env(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_threshold() -> f32 { MATCH_THRESHOLD }
fn default_click_pacing() -> u64 { CLICK_PACING_MS }
fn default_true() -> bool { true }
fn default_provider() -> String { "none".to_string() }
fn default_api_key_env() -> String { "OPENAI_API_KEY".to_string() }
fn default_timeout() -> u64 { DEFAULT_TIMEOUT_SECS }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "malformed config, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// CLI > config > defaults.
pub fn resolve_ai_config(config: &AiConfig, provider: Option<&str>, model: Option<&str>) -> AiConfig {
    AiConfig {
        provider: provider.unwrap_or(&config.provider).to_string(),
        model: model.map(str::to_string).or_else(|| config.model.clone()),
        ..config.clone()
    }
}

pub fn resolve_fill_options(config: &MatchingConfig, threshold: Option<f32>) -> FillOptions {
    let mut options = config.fill_options();
    if let Some(threshold) = threshold {
        options.threshold = threshold;
    }
    options
}
