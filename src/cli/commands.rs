use std::io::Read;
use std::time::Duration;

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::cli::config::{AiConfig, ProfileConfig};
use crate::dom::parser::parse_document;
use crate::error::{FillError, Result};
use crate::fields::indexer::index_fields;
use crate::fill::dispatch::FormFiller;
use crate::fill::fill_model::{FillOptions, SpokenEntry, entries_from_json_str};
use crate::profile::builtin::remodel_estimate_profile;
use crate::profile::profile_model::FormProfile;
use crate::report::console::format_console_report;
use crate::report::report_model::FillReport;
use crate::trace::logger::TraceLogger;
use crate::transcript::ai_model::{OllamaBackend, OpenAiBackend, TextInference};
use crate::transcript::parser::{Polisher, TranscriptParser};

/// Where the dictated field/value pairs come from.
pub enum FillSource<'a> {
    Json(&'a str),
    Transcript(&'a str),
}

// ============================================================================
// fill subcommand
// ============================================================================

pub fn cmd_fill(
    html_path: &str,
    url: Option<&str>,
    source: FillSource<'_>,
    options: FillOptions,
    format: &str,
    trace_path: Option<&str>,
    profile: Option<FormProfile>,
    ai: &AiConfig,
) -> Result<FillReport> {
    let html = read_file(html_path)?;
    let mut doc = parse_document(&html, url);

    let entries = match source {
        FillSource::Json(path) => entries_from_json_str(&read_file(path)?)?,
        FillSource::Transcript(path) => {
            let parsed = build_parser(ai)?.parse(&read_file(path)?);
            info!(source = ?parsed.source, entries = parsed.entries.len(), "parsed transcript");
            parsed.entries
        }
    };

    let tracer = trace_path.map(TraceLogger::new).unwrap_or_else(TraceLogger::disabled);
    let mut filler = FormFiller::new(options, profile).with_tracer(tracer);
    let report = filler.fill(&mut doc, &entries);

    match format {
        "json" => {
            let out = json!({ "report": report, "controls": doc.snapshot() });
            println!("{}", to_pretty_json(&out)?);
        }
        _ => print!("{}", format_console_report(&report)),
    }

    Ok(report)
}

// ============================================================================
// parse / polish subcommands
// ============================================================================

pub fn cmd_parse(input: Option<&str>, ai: &AiConfig) -> Result<Vec<SpokenEntry>> {
    let text = read_input(input)?;
    let parsed = build_parser(ai)?.parse(&text);
    debug!(source = ?parsed.source, "transcript parsed");

    let map: Map<String, Value> = parsed
        .entries
        .iter()
        .map(|e| (e.key.clone(), Value::String(e.value.clone())))
        .collect();
    println!("{}", to_pretty_json(&Value::Object(map))?);

    Ok(parsed.entries)
}

pub fn cmd_polish(input: Option<&str>, ai: &AiConfig) -> Result<String> {
    let text = read_input(input)?;
    let polisher = match build_inference(ai)? {
        Some(backend) => Polisher::with_backend(backend),
        None => Polisher::local(),
    };

    let polished = polisher.polish(&text);
    debug!(source = ?polished.source, "text polished");
    println!("{}", polished.text);
    Ok(polished.text)
}

// ============================================================================
// index / profile subcommands
// ============================================================================

pub fn cmd_index(html_path: &str) -> Result<()> {
    let doc = parse_document(&read_file(html_path)?, None);
    let fields = index_fields(&doc);

    if fields.is_empty() {
        println!("No fillable fields found.");
        return Ok(());
    }

    for field in &fields {
        println!("{:<16} {}", format!("{:?}", field.kind), field.search_text);
    }
    println!("\n{} fields", fields.len());
    Ok(())
}

pub fn cmd_profile(profile: Option<&FormProfile>) -> Result<()> {
    let spec = match profile {
        Some(p) => p.to_spec(),
        None => remodel_estimate_profile(),
    };
    let yaml = serde_yaml::to_string(&spec).map_err(|e| FillError::Yaml {
        context: "form profile".into(),
        source: e,
    })?;
    print!("{}", yaml);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// The form profile in effect: none when disabled, the YAML at `path` when
/// configured, the built-in one otherwise.
pub fn load_profile(config: &ProfileConfig) -> Result<Option<FormProfile>> {
    if !config.enabled {
        return Ok(None);
    }
    let profile = match &config.path {
        Some(path) => FormProfile::from_yaml(&read_file(path)?)?,
        None => FormProfile::compile(&remodel_estimate_profile())?,
    };
    Ok(Some(profile))
}

/// Build the inference backend named by `ai.provider`; `none` (or anything
/// unknown) means local heuristics only.
pub fn build_inference(ai: &AiConfig) -> Result<Option<Box<dyn TextInference>>> {
    let timeout = Duration::from_secs(ai.timeout_secs);
    match ai.provider.as_str() {
        "ollama" => {
            let defaults = OllamaBackend::default();
            let endpoint = ai.endpoint.as_deref().unwrap_or(&defaults.endpoint);
            let model = ai.model.as_deref().unwrap_or(&defaults.model);
            Ok(Some(Box::new(OllamaBackend::new(endpoint, model, timeout))))
        }
        "openai" => {
            let mut backend = OpenAiBackend::from_env(&ai.api_key_env)?;
            if let Some(endpoint) = &ai.endpoint {
                backend.endpoint = endpoint.clone();
            }
            if let Some(model) = &ai.model {
                backend.model = model.clone();
            }
            backend.timeout = timeout;
            Ok(Some(Box::new(backend)))
        }
        _ => Ok(None),
    }
}

fn build_parser(ai: &AiConfig) -> Result<TranscriptParser> {
    Ok(match build_inference(ai)? {
        Some(backend) => TranscriptParser::with_backend(backend),
        None => TranscriptParser::local(),
    })
}

fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| FillError::Io {
        context: path.to_string(),
        source: e,
    })
}

/// File contents, or all of stdin when no path is given.
fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(p) => read_file(p),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| FillError::Io {
                    context: "stdin".into(),
                    source: e,
                })?;
            Ok(buf)
        }
    }
}

fn to_pretty_json(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| FillError::Json {
        context: "output".into(),
        source: e,
    })
}
