use crate::report::report_model::{EntryOutcome, FillMode, FillReport};

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a fill report for terminal output.
///
/// Produces output like:
/// ```text
/// === Fill: profile remodel-estimate ===
///
/// ✓ FILLED   Full Name -> Full Name
/// ✗ SKIPPED  Flavor (no rule)
///
/// === Results: 1 filled, 1 skipped (2 total) ===
/// ```
pub fn format_console_report(report: &FillReport) -> String {
    let mut out = String::new();

    let heading = match (report.mode, report.profile.as_deref()) {
        (FillMode::Profile, Some(name)) => format!("profile {}", name),
        (FillMode::Profile, None) => "profile".to_string(),
        (FillMode::Generic, _) => "generic matcher".to_string(),
    };
    out.push_str(&format!("=== Fill: {} ===\n\n", heading));

    for entry in &report.entries {
        match &entry.outcome {
            EntryOutcome::Filled { target, score, .. } => {
                out.push_str(&format!("\u{2713} FILLED   {} -> {}", entry.key, target));
                if let Some(s) = score {
                    out.push_str(&format!(" (score {:.2})", s));
                }
                out.push('\n');
            }
            other => {
                out.push_str(&format!(
                    "\u{2717} SKIPPED  {} ({})\n",
                    entry.key,
                    describe_skip(other)
                ));
            }
        }
    }

    let filled = report.filled_count();
    let total = report.entries.len();
    out.push_str(&format!(
        "\n=== Results: {} filled, {} skipped ({} total) ===\n",
        filled,
        total - filled,
        total
    ));

    out
}

fn describe_skip(outcome: &EntryOutcome) -> String {
    match outcome {
        EntryOutcome::Filled { .. } => "filled".to_string(),
        EntryOutcome::NotApplied { target } => format!("nothing applied to {}", target),
        EntryOutcome::NoMatch { best_score } => format!("no field above threshold, best {:.2}", best_score),
        EntryOutcome::NoRule => "no rule".to_string(),
        EntryOutcome::NoBlock { label_contains } => format!("no question labelled '{}'", label_contains),
        EntryOutcome::Failed { error } => format!("error: {}", error),
    }
}
