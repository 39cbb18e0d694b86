use serde_json::json;
use voice_form_fill::error::FillError;
use voice_form_fill::fill::fill_model::{
    SpokenEntry, entries_from_json, entries_from_json_str, value_to_text,
};
use voice_form_fill::transcript::{
    ai_model::{MockTextInference, OpenAiBackend, TextInference},
    local_parser::{polish_locally, transcript_to_entries},
    parser::{ParseSource, PolishSource, Polisher, TranscriptParser, parse_model_json},
};

fn entry(k: &str, v: &str) -> SpokenEntry {
    SpokenEntry::new(k, v)
}

// =========================================================================
// Local transcript parser
// =========================================================================

#[test]
fn local_parser_reads_label_value_pairs() {
    let entries = transcript_to_entries("Full Name: Jane Homeowner; Phone1: 714-555-0123\nE-mail: jane@example.com");
    assert_eq!(
        entries,
        vec![
            entry("Full Name", "Jane Homeowner"),
            entry("Phone1", "714-555-0123"),
            entry("E-mail", "jane@example.com"),
        ]
    );
}

#[test]
fn local_parser_reads_set_to_phrases() {
    let entries = transcript_to_entries("set year built to 1978; Set demolition to cabinets, drywall");
    assert_eq!(
        entries,
        vec![
            entry("year built", "1978"),
            entry("demolition", "cabinets, drywall"),
        ]
    );
}

#[test]
fn local_parser_skips_unstructured_parts() {
    let entries = transcript_to_entries("um okay so\n\nNotes: call after five;;  ;");
    assert_eq!(entries, vec![entry("Notes", "call after five")]);
}

#[test]
fn local_parser_later_duplicate_overwrites_in_place() {
    let entries = transcript_to_entries("Date: Nov 1, 2025; Full Name: Jane; Date: Nov 2, 2025");
    assert_eq!(
        entries,
        vec![entry("Date", "Nov 2, 2025"), entry("Full Name", "Jane")]
    );
}

#[test]
fn local_parser_keeps_colons_in_value() {
    let entries = transcript_to_entries("Notes: arrive at 9:30");
    assert_eq!(entries, vec![entry("Notes", "arrive at 9:30")]);
}

#[test]
fn local_parser_on_empty_text() {
    assert!(transcript_to_entries("").is_empty());
    assert!(transcript_to_entries("   \n ; ").is_empty());
}

// =========================================================================
// Local polishing rules
// =========================================================================

#[test]
fn polish_locally_fixes_pronouns_and_casing() {
    assert_eq!(
        polish_locally("im gonna   start monday. i think its ok"),
        "I'm going to start monday. I think its okay"
    );
    assert_eq!(polish_locally("what now? we wait!  then go"), "What now? We wait! Then go");
}

#[test]
fn polish_locally_on_empty_text() {
    assert_eq!(polish_locally("   "), "");
}

// =========================================================================
// JSON field maps
// =========================================================================

#[test]
fn json_values_are_coerced_to_text() {
    assert_eq!(value_to_text(&json!("x")), Some("x".into()));
    assert_eq!(value_to_text(&json!(1978)), Some("1978".into()));
    assert_eq!(value_to_text(&json!(true)), Some("true".into()));
    assert_eq!(value_to_text(&json!(["Cabinets", "Drywall"])), Some("Cabinets, Drywall".into()));
    assert_eq!(value_to_text(&json!(null)), None);
}

#[test]
fn entries_from_json_keep_key_order_and_drop_nulls() {
    let entries = entries_from_json(&json!({
        "Phone1": "714-555-0123",
        "Date": "Nov 2, 2025",
        "Unknown": null,
        "Year built": 1978
    }))
    .unwrap();
    assert_eq!(
        entries,
        vec![
            entry("Phone1", "714-555-0123"),
            entry("Date", "Nov 2, 2025"),
            entry("Year built", "1978"),
        ]
    );
}

#[test]
fn entries_from_non_object_is_an_error() {
    assert!(matches!(
        entries_from_json(&json!(["a", "b"])),
        Err(FillError::Json { .. })
    ));
    assert!(matches!(
        entries_from_json_str("not json"),
        Err(FillError::Json { .. })
    ));
}

#[test]
fn model_json_strips_code_fences() {
    let fenced = "```json\n{\"Full Name\": \"Jane\"}\n```";
    assert_eq!(parse_model_json(fenced), Some(vec![entry("Full Name", "Jane")]));

    let bare_fence = "```\n{\"Notes\": \"hi\"}\n```";
    assert_eq!(parse_model_json(bare_fence), Some(vec![entry("Notes", "hi")]));

    assert_eq!(parse_model_json("Sure! Here you go."), None);
    assert_eq!(parse_model_json("[1, 2]"), None);
}

// =========================================================================
// TranscriptParser with and without a model
// =========================================================================

#[test]
fn parser_without_backend_is_local() {
    let parsed = TranscriptParser::local().parse("Notes: hello");
    assert_eq!(parsed.source, ParseSource::Local);
    assert_eq!(parsed.entries, vec![entry("Notes", "hello")]);
}

#[test]
fn parser_uses_model_json() {
    let backend = MockTextInference::replying(r#"{"Electrical budget": "Up to $5,000", "Demolition": ["Cabinets", "Back splash"]}"#);
    let parsed = TranscriptParser::with_backend(Box::new(backend))
        .parse("electrical budget five k, demo the cabinets and back splash");

    assert_eq!(parsed.source, ParseSource::Ai);
    assert_eq!(
        parsed.entries,
        vec![
            entry("Electrical budget", "Up to $5,000"),
            entry("Demolition", "Cabinets, Back splash"),
        ]
    );
}

#[test]
fn parser_falls_back_when_model_fails() {
    let parsed = TranscriptParser::with_backend(Box::new(MockTextInference::failing()))
        .parse("Full Name: Jane");
    assert_eq!(parsed.source, ParseSource::Local);
    assert_eq!(parsed.entries, vec![entry("Full Name", "Jane")]);
}

#[test]
fn parser_falls_back_on_non_json_reply() {
    let backend = MockTextInference::replying("I could not understand that.");
    let parsed = TranscriptParser::with_backend(Box::new(backend)).parse("Notes: x");
    assert_eq!(parsed.source, ParseSource::Local);
    assert_eq!(parsed.entries, vec![entry("Notes", "x")]);
}

#[test]
fn parser_skips_model_for_empty_text() {
    let backend = MockTextInference::replying(r#"{"Invented": "field"}"#);
    let parsed = TranscriptParser::with_backend(Box::new(backend)).parse("   ");
    assert_eq!(parsed.source, ParseSource::Local);
    assert!(parsed.entries.is_empty());
}

// =========================================================================
// Polisher
// =========================================================================

#[test]
fn polisher_local_rules() {
    let polished = Polisher::local().polish("im gonna do it");
    assert_eq!(polished.source, PolishSource::LocalRules);
    assert_eq!(polished.text, "I'm going to do it");
}

#[test]
fn polisher_uses_model_reply() {
    let backend = MockTextInference::replying("We will replace the cabinets.");
    let polished = Polisher::with_backend(Box::new(backend)).polish("gonna rip out cabinets");
    assert_eq!(polished.source, PolishSource::Ai);
    assert_eq!(polished.text, "We will replace the cabinets.");
}

#[test]
fn polisher_leaves_text_unchanged_when_model_fails() {
    let polished = Polisher::with_backend(Box::new(MockTextInference::failing())).polish("gonna rip out cabinets");
    assert_eq!(polished.source, PolishSource::Unchanged);
    assert_eq!(polished.text, "gonna rip out cabinets");
}

// =========================================================================
// Backends
// =========================================================================

#[test]
fn mock_backend_reports_failure() {
    let err = MockTextInference::failing().infer(None, "x").unwrap_err();
    assert!(matches!(err, FillError::Inference { backend: "mock", .. }));
}

#[test]
fn openai_backend_requires_key() {
    let var = "VOICE_FORM_FILL_TEST_KEY_THAT_IS_NEVER_SET";
    match OpenAiBackend::from_env(var) {
        Err(FillError::MissingApiKey(name)) => assert_eq!(name, var),
        Err(other) => panic!("Expected MissingApiKey, got {}", other),
        Ok(_) => panic!("Expected MissingApiKey"),
    }
}

#[test]
fn openai_backend_defaults() {
    let backend = OpenAiBackend::new("sk-test");
    assert_eq!(backend.name(), "openai");
    assert_eq!(backend.model, "gpt-4o-mini");
    assert!((backend.temperature - 0.2).abs() < 1e-6);
}
