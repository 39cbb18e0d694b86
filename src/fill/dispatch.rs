use tracing::info;

use crate::dom::dom_model::Document;
use crate::fill::fill_model::{FillOptions, SpokenEntry};
use crate::fill::generic::fill_generic;
use crate::profile::engine::fill_profiled;
use crate::profile::profile_model::FormProfile;
use crate::report::report_model::FillReport;
use crate::trace::{logger::TraceLogger, trace::FillTraceEvent};

/// Pick the strategy for this page: the profile when the document URL is the
/// profile's known form, the generic matcher otherwise.
pub fn fill(
    doc: &mut Document,
    entries: &[SpokenEntry],
    profile: Option<&FormProfile>,
    options: &FillOptions,
) -> FillReport {
    let known = profile.filter(|p| doc.url.as_deref().is_some_and(|url| p.matches_url(url)));

    match known {
        Some(profile) => {
            info!(profile = %profile.name, entries = entries.len(), "filling known form");
            fill_profiled(doc, entries, profile, options)
        }
        None => {
            info!(entries = entries.len(), "filling with generic matcher");
            fill_generic(doc, entries, options)
        }
    }
}

/// Owns the fill configuration for a page context and records a trace line
/// per entry. One fill at a time; callers serialize concurrent requests.
pub struct FormFiller {
    pub options: FillOptions,
    pub profile: Option<FormProfile>,
    tracer: TraceLogger,
    step: u64,
}

impl FormFiller {
    pub fn new(options: FillOptions, profile: Option<FormProfile>) -> Self {
        Self {
            options,
            profile,
            tracer: TraceLogger::disabled(),
            step: 0,
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn fill(&mut self, doc: &mut Document, entries: &[SpokenEntry]) -> FillReport {
        let report = fill(doc, entries, self.profile.as_ref(), &self.options);

        for entry in &report.entries {
            self.tracer
                .log(&FillTraceEvent::from_report(self.step, report.mode, entry));
            self.step += 1;
        }

        info!(
            filled = report.filled_count(),
            total = report.entries.len(),
            "fill complete"
        );
        report
    }
}
