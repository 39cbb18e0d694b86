use serde_json::Value;
use voice_form_fill::dom::parser::parse_document;
use voice_form_fill::fill::{
    dispatch::{FormFiller, fill},
    fill_model::FillOptions,
};
use voice_form_fill::fill_html;
use voice_form_fill::profile::{builtin::remodel_estimate_profile, profile_model::FormProfile};
use voice_form_fill::report::report_model::{EntryOutcome, FillMode};
use voice_form_fill::trace::logger::TraceLogger;

mod common;
use crate::common::{REMODEL_URL, by_id, contact_form, entries, fixture, remodel_form};

fn builtin() -> FormProfile {
    FormProfile::compile(&remodel_estimate_profile()).unwrap()
}

// =========================================================================
// Engine selection
// =========================================================================

#[test]
fn known_form_url_uses_profile() {
    let mut doc = remodel_form();
    let profile = builtin();
    let report = fill(
        &mut doc,
        &entries(&[("Full Name", "Jane Homeowner")]),
        Some(&profile),
        &FillOptions::unpaced(),
    );

    assert_eq!(report.mode, FillMode::Profile);
    assert_eq!(doc.value(by_id(&doc, "first_4")), "Jane");
    assert_eq!(doc.value(by_id(&doc, "last_4")), "Homeowner");
}

#[test]
fn other_url_uses_generic_matcher() {
    let mut doc = contact_form();
    let profile = builtin();
    let report = fill(
        &mut doc,
        &entries(&[("Full Name", "Jane Homeowner")]),
        Some(&profile),
        &FillOptions::unpaced(),
    );

    assert_eq!(report.mode, FillMode::Generic);
    assert_eq!(doc.value(by_id(&doc, "full_name")), "Jane Homeowner");
}

#[test]
fn known_form_markup_without_profile_falls_to_generic() {
    let mut doc = remodel_form();
    let report = fill(
        &mut doc,
        &entries(&[("Year Home was Built", "1978")]),
        None,
        &FillOptions::unpaced(),
    );

    assert_eq!(report.mode, FillMode::Generic);
    assert_eq!(doc.value(by_id(&doc, "input_10")), "1978");
}

#[test]
fn document_without_url_uses_generic_matcher() {
    let mut doc = parse_document(&fixture("remodel_estimate.html"), None);
    let profile = builtin();
    let report = fill(
        &mut doc,
        &entries(&[("Flavor", "vanilla")]),
        Some(&profile),
        &FillOptions::unpaced(),
    );
    assert_eq!(report.mode, FillMode::Generic);
}

#[test]
fn profile_mode_never_falls_back_per_entry() {
    let mut doc = remodel_form();
    let profile = builtin();
    let report = fill(
        &mut doc,
        &entries(&[("First Name", "Jane")]),
        Some(&profile),
        &FillOptions::unpaced(),
    );

    assert_eq!(report.outcome_for("First Name"), Some(&EntryOutcome::NoRule));
    assert_eq!(doc.value(by_id(&doc, "first_4")), "", "Generic matcher would have filled this");
}

#[test]
fn fill_html_parses_and_fills() {
    let (report, doc) = fill_html(
        &fixture("remodel_estimate.html"),
        Some(REMODEL_URL),
        &entries(&[("Phone1", "(714) 555-0123")]),
        &FillOptions::unpaced(),
    )
    .unwrap();

    assert_eq!(report.mode, FillMode::Profile);
    assert_eq!(doc.value(by_id(&doc, "input_6_area")), "714");
    assert_eq!(doc.value(by_id(&doc, "input_6_phone")), "5550123");
}

// =========================================================================
// FormFiller and the JSONL trace
// =========================================================================

#[test]
fn form_filler_writes_one_trace_line_per_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fill_trace.jsonl");
    let path_str = path.to_str().unwrap();

    let mut filler =
        FormFiller::new(FillOptions::unpaced(), Some(builtin())).with_tracer(TraceLogger::new(path_str));

    let mut doc = contact_form();
    filler.fill(
        &mut doc,
        &entries(&[("Full Name", "Jane Homeowner"), ("xyzzy123", "secret value")]),
    );
    let mut doc = remodel_form();
    filler.fill(&mut doc, &entries(&[("Flavor", "vanilla")]));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["step"], 0);
    assert_eq!(lines[0]["mode"], "Generic");
    assert_eq!(lines[0]["spoken_key"], "Full Name");
    assert_eq!(lines[0]["outcome"], "filled");
    assert_eq!(lines[0]["target"], "Full Name");

    assert_eq!(lines[1]["step"], 1);
    assert_eq!(lines[1]["outcome"], "no_match");
    assert!(!content.contains("secret value"), "Values are fingerprinted, never logged");
    assert_eq!(lines[1]["value_fingerprint"].as_str().unwrap().len(), 40);

    assert_eq!(lines[2]["step"], 2);
    assert_eq!(lines[2]["mode"], "Profile");
    assert_eq!(lines[2]["outcome"], "no_rule");
}

#[test]
fn unwritable_trace_path_does_not_break_fill() {
    let tracer = TraceLogger::new("/nonexistent-dir/for/trace.jsonl");
    assert!(!tracer.is_enabled());

    let mut filler = FormFiller::new(FillOptions::unpaced(), None).with_tracer(tracer);
    let mut doc = contact_form();
    let report = filler.fill(&mut doc, &entries(&[("Notes", "hello")]));
    assert_eq!(report.filled_count(), 1);
}
