use tracing::{debug, warn};

use crate::dom::dom_model::{Document, NodeId};
use crate::error::Result;
use crate::fill::fill_model::{FillOptions, SpokenEntry};
use crate::profile::blocks::{find_question_by_label, question_label_text};
use crate::profile::composite::{
    click_options, set_address, set_date, set_full_name, set_phone, set_text_like,
};
use crate::profile::profile_model::{ApplyStrategy, FormProfile};
use crate::report::report_model::{EntryOutcome, FillMode, FillReport};
use crate::text::normalize::split_list;

/// Run a strategy against a located question block.
pub fn apply_strategy(
    doc: &mut Document,
    strategy: ApplyStrategy,
    block: NodeId,
    value: &str,
    options: &FillOptions,
) -> Result<bool> {
    match strategy {
        ApplyStrategy::Text => set_text_like(doc, block, value),
        ApplyStrategy::FullName => set_full_name(doc, block, value),
        ApplyStrategy::Phone => set_phone(doc, block, value),
        ApplyStrategy::Address => set_address(doc, block, value),
        ApplyStrategy::Date => set_date(doc, block, value),
        ApplyStrategy::Choice => click_options(doc, block, &[value.to_string()], options),
        ApplyStrategy::MultiChoice => click_options(doc, block, &split_list(value), options),
    }
}

/// Fill a known form through its profile. Entries without a matching rule
/// or question block are dropped; they never fall through to the generic
/// matcher.
pub fn fill_profiled(
    doc: &mut Document,
    entries: &[SpokenEntry],
    profile: &FormProfile,
    options: &FillOptions,
) -> FillReport {
    let mut report = FillReport::new(FillMode::Profile, Some(&profile.name));

    for entry in entries {
        let value = entry.value.trim();

        let Some(rule) = profile.rule_for(&entry.key) else {
            debug!(key = %entry.key, "no profile rule for spoken key");
            report.push(&entry.key, value, EntryOutcome::NoRule);
            continue;
        };

        let Some(block) = find_question_by_label(doc, &rule.label_contains) else {
            debug!(key = %entry.key, label = %rule.label_contains, "question block not found");
            report.push(
                &entry.key,
                value,
                EntryOutcome::NoBlock {
                    label_contains: rule.label_contains.clone(),
                },
            );
            continue;
        };

        let target = question_label_text(doc, block);
        let outcome = match apply_strategy(doc, rule.strategy, block, value, options) {
            Ok(true) => EntryOutcome::Filled {
                target,
                kind: None,
                score: None,
            },
            Ok(false) => EntryOutcome::NotApplied { target },
            Err(e) => {
                warn!(key = %entry.key, error = %e, "apply failed");
                EntryOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        report.push(&entry.key, value, outcome);
    }

    report
}
