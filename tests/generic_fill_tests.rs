use scraper::Selector;
use voice_form_fill::dom::dom_model::{Document, EventKind, NodeId};
use voice_form_fill::fields::field_model::{ControlKind, FieldDescriptor};
use voice_form_fill::fill::{
    fill_model::FillOptions,
    generic::fill_generic,
    matcher::{FieldMatch, best_field_match, score_field},
};
use voice_form_fill::report::report_model::{EntryOutcome, FillMode};

mod common;
use crate::common::{by_id, by_name, contact_form, entries};

fn descriptor(n: usize, label: &str, search_text: &str) -> FieldDescriptor {
    FieldDescriptor {
        element: NodeId(n),
        kind: ControlKind::Text,
        name: format!("f{}", n),
        id: String::new(),
        label: label.to_string(),
        search_text: search_text.to_string(),
    }
}

// =========================================================================
// Matcher scoring
// =========================================================================

#[test]
fn score_weights_search_text_and_label() {
    let f = descriptor(1, "Full Name", "Full Name | full_name");
    assert!((score_field(&f, "full name") - 1.0).abs() < 1e-6);

    let unlabeled = descriptor(2, "", "Company name | company");
    assert!((score_field(&unlabeled, "company") - 0.35).abs() < 1e-6);
}

#[test]
fn best_match_prefers_first_on_tie() {
    let fields = vec![
        descriptor(1, "", "Email | contact"),
        descriptor(2, "", "Email | contact"),
    ];
    match best_field_match(&fields, "email", 0.25) {
        FieldMatch::Found { field, .. } => assert_eq!(field.element, NodeId(1)),
        other => panic!("Expected a match, got {:?}", other),
    }
}

#[test]
fn best_match_reports_score_below_threshold() {
    let fields = vec![descriptor(1, "", "Email | contact | address | home")];
    match best_field_match(&fields, "email", 0.25) {
        FieldMatch::BelowThreshold { best_score } => assert!((best_score - 0.175).abs() < 1e-6),
        other => panic!("Expected below threshold, got {:?}", other),
    }
}

#[test]
fn best_match_on_no_fields() {
    assert_eq!(
        best_field_match(&[], "anything", 0.25),
        FieldMatch::BelowThreshold { best_score: 0.0 }
    );
}

#[test]
fn threshold_is_inclusive() {
    let fields = vec![descriptor(1, "", "Company name | company")];
    assert!(matches!(
        best_field_match(&fields, "company", 0.35),
        FieldMatch::Found { .. }
    ));
}

// =========================================================================
// fill_generic: text, select, contenteditable
// =========================================================================

#[test]
fn fills_text_input_with_focus_input_change() {
    let mut doc = contact_form();
    let report = fill_generic(
        &mut doc,
        &entries(&[("Full Name", "  Jane Homeowner  ")]),
        &FillOptions::unpaced(),
    );

    let full_name = by_id(&doc, "full_name");
    assert_eq!(doc.value(full_name), "Jane Homeowner", "Value is trimmed");
    assert_eq!(
        doc.events_for(full_name),
        vec![EventKind::Focus, EventKind::Input, EventKind::Change]
    );
    assert_eq!(doc.focused(), Some(full_name));

    assert_eq!(report.mode, FillMode::Generic);
    assert_eq!(report.entries[0].value, "Jane Homeowner");
    match &report.entries[0].outcome {
        EntryOutcome::Filled { target, kind, score } => {
            assert_eq!(target, "Full Name");
            assert_eq!(*kind, Some(ControlKind::Text));
            assert!((score.unwrap() - 1.0).abs() < 1e-6);
        }
        other => panic!("Expected Filled, got {:?}", other),
    }
}

#[test]
fn fills_by_wrapping_label_and_block_label() {
    let mut doc = contact_form();
    fill_generic(
        &mut doc,
        &entries(&[
            ("Email Address", "jane@example.com"),
            ("Phone Number", "714-555-0123"),
            ("Company", "Acme Remodeling"),
            ("Notes", "Call after 5pm"),
        ]),
        &FillOptions::unpaced(),
    );

    assert_eq!(doc.value(by_name(&doc, "email")), "jane@example.com");
    assert_eq!(doc.value(by_name(&doc, "phoneNumber")), "714-555-0123");
    assert_eq!(doc.value(by_name(&doc, "company")), "Acme Remodeling");
    assert_eq!(doc.value(by_id(&doc, "notes")), "Call after 5pm");
}

#[test]
fn select_picks_most_similar_option() {
    let mut doc = contact_form();
    let report = fill_generic(
        &mut doc,
        &entries(&[("State", "California")]),
        &FillOptions::unpaced(),
    );

    let state = by_id(&doc, "state");
    assert_eq!(doc.value(state), "CA");
    assert_eq!(doc.events_for(state), vec![EventKind::Change]);
    assert!(report.entries[0].outcome.is_filled());
}

#[test]
fn select_without_similar_option_is_not_applied() {
    let mut doc = contact_form();
    let report = fill_generic(
        &mut doc,
        &entries(&[("State", "Texas")]),
        &FillOptions::unpaced(),
    );

    let state = by_id(&doc, "state");
    assert_eq!(doc.selected_index(state), Some(0), "Selection untouched");
    assert!(doc.events_for(state).is_empty());
    assert_eq!(
        report.outcome_for("State"),
        Some(&EntryOutcome::NotApplied {
            target: "State".into()
        })
    );
}

#[test]
fn contenteditable_gets_text_and_input_event() {
    let mut doc = contact_form();
    fill_generic(
        &mut doc,
        &entries(&[("Project summary", "New kitchen and bath")]),
        &FillOptions::unpaced(),
    );

    let summary = by_id(&doc, "summary");
    assert_eq!(doc.inner_text(summary), "New kitchen and bath");
    assert_eq!(doc.events_for(summary), vec![EventKind::Focus, EventKind::Input]);
}

// =========================================================================
// fill_generic: checkbox and radio groups
// =========================================================================

#[test]
fn checkbox_group_checks_every_wanted_option() {
    let mut doc = contact_form();
    let report = fill_generic(
        &mut doc,
        &entries(&[("Services", "Painting, Roofing")]),
        &FillOptions::unpaced(),
    );

    let services = Selector::parse(r#"input[name="services"]"#).unwrap();
    let boxes = doc.select_all(Document::ROOT, &services);
    let checked: Vec<bool> = boxes.iter().map(|b| doc.is_checked(*b)).collect();
    assert_eq!(checked, vec![true, false, true]);

    match report.outcome_for("Services") {
        Some(EntryOutcome::Filled { kind, .. }) => assert_eq!(*kind, Some(ControlKind::Checkbox)),
        other => panic!("Expected Filled, got {:?}", other),
    }
}

#[test]
fn checkbox_fill_is_idempotent() {
    let mut doc = contact_form();
    let batch = entries(&[("Services", "Painting")]);

    fill_generic(&mut doc, &batch, &FillOptions::unpaced());
    fill_generic(&mut doc, &batch, &FillOptions::unpaced());

    let paint = by_name(&doc, "services");
    assert!(doc.is_checked(paint), "Second pass must not toggle it off");
    let clicks = doc
        .events_for(paint)
        .into_iter()
        .filter(|k| *k == EventKind::Click)
        .count();
    assert_eq!(clicks, 1);
}

#[test]
fn radio_group_selects_by_label() {
    let mut doc = contact_form();
    fill_generic(
        &mut doc,
        &entries(&[("Preferred contact", "phone")]),
        &FillOptions::unpaced(),
    );

    assert!(doc.is_checked(by_id(&doc, "pc2")));
    assert!(!doc.is_checked(by_id(&doc, "pc1")));
}

#[test]
fn group_without_wanted_option_is_not_applied() {
    let mut doc = contact_form();
    let report = fill_generic(
        &mut doc,
        &entries(&[("Services", "Plumbing")]),
        &FillOptions::unpaced(),
    );

    assert!(matches!(
        report.outcome_for("Services"),
        Some(EntryOutcome::NotApplied { .. })
    ));
    assert!(doc.events().is_empty());
}

// =========================================================================
// fill_generic: misses and batch behavior
// =========================================================================

#[test]
fn unmatched_key_changes_nothing() {
    let mut doc = contact_form();
    let report = fill_generic(
        &mut doc,
        &entries(&[("xyzzy123", "whatever")]),
        &FillOptions::unpaced(),
    );

    assert_eq!(
        report.outcome_for("xyzzy123"),
        Some(&EntryOutcome::NoMatch { best_score: 0.0 })
    );
    assert!(doc.events().is_empty());
}

#[test]
fn custom_threshold_rejects_weak_matches() {
    let mut doc = contact_form();
    let options = FillOptions {
        threshold: 0.5,
        ..FillOptions::unpaced()
    };
    let report = fill_generic(&mut doc, &entries(&[("Services", "Painting")]), &options);

    match report.outcome_for("Services") {
        Some(EntryOutcome::NoMatch { best_score }) => assert!((best_score - 0.35).abs() < 1e-6),
        other => panic!("Expected NoMatch, got {:?}", other),
    }
    assert!(!doc.is_checked(by_name(&doc, "services")));
}

#[test]
fn misses_do_not_stop_the_batch() {
    let mut doc = contact_form();
    let report = fill_generic(
        &mut doc,
        &entries(&[("xyzzy123", "a"), ("Notes", "b"), ("State", "Texas"), ("Full Name", "c")]),
        &FillOptions::unpaced(),
    );

    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.filled_count(), 2);
    assert_eq!(doc.value(by_id(&doc, "notes")), "b");
    assert_eq!(doc.value(by_id(&doc, "full_name")), "c");
}

#[test]
fn entries_apply_in_order_last_write_wins() {
    let mut doc = contact_form();
    fill_generic(
        &mut doc,
        &entries(&[("Notes", "first"), ("Notes", "second")]),
        &FillOptions::unpaced(),
    );
    assert_eq!(doc.value(by_id(&doc, "notes")), "second");
}
