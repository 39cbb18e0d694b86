use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

static ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("valid ordinal regex"));

const FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%A, %B %d, %Y",
];

/// Parse a dictated calendar date ("2025-11-02", "Nov 2, 2025",
/// "November 2nd 2025", "11/02/2025", ...). ISO datetimes keep their date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = ORDINAL_SUFFIX.replace_all(raw.trim(), "$1");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Some(date) = FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(&cleaned, f).ok())
    {
        return Some(date);
    }

    // 2025-11-02T10:30, 2025-11-02 10:30:00
    let prefix = cleaned.get(..10)?;
    if cleaned.len() > 10 && matches!(cleaned.as_bytes()[10], b'T' | b' ') {
        return NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok();
    }
    None
}

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Spellings a month sub-control might accept, most likely first.
pub fn month_candidates(date: NaiveDate) -> Vec<String> {
    let month = date.month();
    let name = MONTH_NAMES[(month - 1) as usize];
    vec![
        month.to_string(),
        format!("{:02}", month),
        name.to_string(),
        name[..3].to_string(),
    ]
}

pub fn day_candidates(date: NaiveDate) -> Vec<String> {
    let day = date.day();
    vec![day.to_string(), format!("{:02}", day)]
}

pub fn year_candidates(date: NaiveDate) -> Vec<String> {
    vec![format!("{:04}", date.year())]
}
