use tracing::{debug, warn};

use crate::dom::dom_model::Document;
use crate::fields::indexer::index_fields;
use crate::fill::apply::apply_value;
use crate::fill::fill_model::{FillOptions, SpokenEntry};
use crate::fill::matcher::{FieldMatch, best_field_match};
use crate::report::report_model::{EntryOutcome, FillMode, FillReport};

/// Fill an arbitrary page: match each spoken key against every indexed
/// control and apply the value to the best one. Entries are independent;
/// a miss or an error on one never stops the rest.
pub fn fill_generic(doc: &mut Document, entries: &[SpokenEntry], options: &FillOptions) -> FillReport {
    let mut report = FillReport::new(FillMode::Generic, None);

    for entry in entries {
        let value = entry.value.trim();
        let outcome = fill_entry(doc, &entry.key, value, options);
        report.push(&entry.key, value, outcome);
    }

    report
}

fn fill_entry(doc: &mut Document, key: &str, value: &str, options: &FillOptions) -> EntryOutcome {
    // Re-index per entry: the previous entry may have changed the page
    let fields = index_fields(doc);

    let (field, score) = match best_field_match(&fields, key, options.threshold) {
        FieldMatch::Found { field, score } => (field.clone(), score),
        FieldMatch::BelowThreshold { best_score } => {
            debug!(key, best_score, "no field matched spoken key");
            return EntryOutcome::NoMatch { best_score };
        }
    };

    let target = describe_target(&field.label, &field.name, &field.id);
    debug!(key, target = %target, score, kind = ?field.kind, "matched field");

    match apply_value(doc, &field, value, options) {
        Ok(true) => EntryOutcome::Filled {
            target,
            kind: Some(field.kind),
            score: Some(score),
        },
        Ok(false) => EntryOutcome::NotApplied { target },
        Err(e) => {
            warn!(key, error = %e, "applying value failed");
            EntryOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

fn describe_target(label: &str, name: &str, id: &str) -> String {
    [label, name, id]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("<unnamed>")
        .to_string()
}
