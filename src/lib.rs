use crate::{
    dom::{dom_model::Document, parser::parse_document},
    error::Result,
    fill::{
        dispatch::fill,
        fill_model::{FillOptions, SpokenEntry},
    },
    profile::{builtin::remodel_estimate_profile, profile_model::FormProfile},
    report::report_model::FillReport,
};

pub mod cli;
pub mod dom;
pub mod error;
pub mod fields;
pub mod fill;
pub mod profile;
pub mod report;
pub mod speech;
pub mod text;
pub mod trace;
pub mod transcript;

/// Parse `html` as the page at `url` and fill it, using the built-in
/// profile when `url` is the known form. Returns the report and the
/// mutated document.
pub fn fill_html(
    html: &str,
    url: Option<&str>,
    entries: &[SpokenEntry],
    options: &FillOptions,
) -> Result<(FillReport, Document)> {
    let profile = FormProfile::compile(&remodel_estimate_profile())?;
    let mut doc = parse_document(html, url);
    let report = fill(&mut doc, entries, Some(&profile), options);
    Ok((report, doc))
}
