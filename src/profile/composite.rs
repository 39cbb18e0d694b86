use std::sync::LazyLock;

use scraper::Selector;
use tracing::debug;

use crate::dom::dom_model::{Document, EventKind, NodeId};
use crate::dom::selector::compile;
use crate::error::Result;
use crate::fields::classifier::is_text_like;
use crate::fill::apply::{assign_quiet, assign_text, best_option, choose_option, closest_option_label, pace};
use crate::fill::fill_model::FillOptions;
use crate::text::dates::{day_candidates, month_candidates, parse_calendar_date, year_candidates};
use crate::text::normalize::{normalize, similarity};

static NATIVE_DATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[type="date"]"#).expect("valid selector"));
static CHOICE_INPUT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"input[type="checkbox"], input[type="radio"]"#).expect("valid selector")
});
static PHONE_NUMBER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"input[name*="phone"], input[id*="phone"], input[name*="number"]"#)
        .expect("valid selector")
});
static SELECT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("select").expect("valid selector"));

// ============================================================================
// Sub-control lookup inside a question block
// ============================================================================

/// `tag[name*="needle"], tag[id*="needle"]` for every tag and needle.
fn name_or_id_contains(tags: &[&str], needles: &[&str]) -> String {
    tags.iter()
        .flat_map(|tag| {
            needles.iter().flat_map(move |needle| {
                ["name", "id"].map(|attr| format!(r#"{tag}[{attr}*="{needle}"]"#))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn sub_input(doc: &Document, block: NodeId, needles: &[&str]) -> Result<Option<NodeId>> {
    sub_control(doc, block, &["input"], needles, &[])
}

/// First control under `block` whose name or id contains one of `needles`,
/// skipping anything in `exclude`.
fn sub_control(
    doc: &Document,
    block: NodeId,
    tags: &[&str],
    needles: &[&str],
    exclude: &[NodeId],
) -> Result<Option<NodeId>> {
    let selector = compile(&name_or_id_contains(tags, needles))?;
    Ok(doc
        .select_all(block, &selector)
        .into_iter()
        .find(|id| !exclude.contains(id)))
}

// ============================================================================
// Strategies
// ============================================================================

/// First text-like control in the block gets the whole value.
pub fn set_text_like(doc: &mut Document, block: NodeId, value: &str) -> Result<bool> {
    let target = doc
        .descendants(block)
        .into_iter()
        .find(|id| doc.element(*id).is_some_and(is_text_like));

    match target {
        Some(id) => {
            assign_text(doc, id, value)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// "Jane Q. Homeowner" → first "Jane Q.", last "Homeowner".
pub fn set_full_name(doc: &mut Document, block: NodeId, value: &str) -> Result<bool> {
    let first = sub_input(doc, block, &["first"])?;
    let last = match first {
        Some(f) => sub_control(doc, block, &["input"], &["last"], &[f])?,
        None => None,
    };

    let (Some(first), Some(last)) = (first, last) else {
        return set_text_like(doc, block, value);
    };

    let parts: Vec<&str> = value.split_whitespace().collect();
    let (first_value, last_value) = match parts.split_last() {
        Some((last_token, leading)) if !leading.is_empty() => (leading.join(" "), last_token.to_string()),
        _ => (value.to_string(), String::new()),
    };

    assign_quiet(doc, first, &first_value)?;
    assign_quiet(doc, last, &last_value)?;
    Ok(true)
}

/// Ten or more digits split into area code and number when the block has
/// both sub-controls; anything else goes to a single text control as-is.
pub fn set_phone(doc: &mut Document, block: NodeId, value: &str) -> Result<bool> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();

    let area = sub_input(doc, block, &["area"])?;
    let number = area.and_then(|a| {
        doc.select_all(block, &PHONE_NUMBER)
            .into_iter()
            .find(|id| *id != a)
    });

    match (area, number) {
        (Some(area), Some(number)) if digits.len() >= 10 => {
            assign_quiet(doc, area, &digits[0..3])?;
            assign_quiet(doc, number, &digits[3..10])?;
            Ok(true)
        }
        _ => set_text_like(doc, block, value),
    }
}

/// "123 Main St, Irvine, CA 92618[, Country]" across the address
/// sub-controls; fewer than three segments all go to the street line.
pub fn set_address(doc: &mut Document, block: NodeId, value: &str) -> Result<bool> {
    let street2 = sub_input(doc, block, &["addr2", "addr_line2"])?;
    let exclude: Vec<NodeId> = street2.into_iter().collect();
    let street1 = sub_control(doc, block, &["input"], &["addr", "street"], &exclude)?;
    let city = sub_input(doc, block, &["city"])?;
    let state = sub_input(doc, block, &["state"])?;
    let zip = sub_input(doc, block, &["zip", "postal"])?;
    let country = sub_control(doc, block, &["select"], &["country"], &[])?;

    let segments: Vec<&str> = value.split(',').map(str::trim).collect();
    let mut assignments: Vec<(NodeId, String)> = vec![];

    if segments.len() >= 3 {
        let mut state_zip = segments[2].split_whitespace();
        let state_value = state_zip.next().unwrap_or("").to_string();
        let zip_value = state_zip.next().unwrap_or("").to_string();

        assignments.extend(street1.map(|id| (id, segments[0].to_string())));
        assignments.extend(city.map(|id| (id, segments[1].to_string())));
        assignments.extend(state.map(|id| (id, state_value)));
        assignments.extend(zip.map(|id| (id, zip_value)));
    } else if let Some(id) = street1 {
        assignments.push((id, value.to_string()));
    }

    let mut changed = !assignments.is_empty();
    for (id, text) in assignments {
        assign_quiet(doc, id, &text)?;
    }

    if let (Some(country), Some(wanted)) = (country, segments.get(3).filter(|s| !s.is_empty())) {
        let want = normalize(wanted);
        if let Some(index) = best_option(doc, country, |text, val| {
            similarity(text, &want).max(similarity(val, &want))
        }) {
            choose_option(doc, country, index)?;
            changed = true;
        }
    }

    Ok(changed)
}

/// Native date input (value assigned as dictated), or month/day/year
/// sub-controls. Dates that do not parse are dropped for three-part widgets;
/// raw text is never typed there.
pub fn set_date(doc: &mut Document, block: NodeId, value: &str) -> Result<bool> {
    if let Some(input) = doc.select_first(block, &NATIVE_DATE) {
        assign_quiet(doc, input, value)?;
        return Ok(true);
    }

    let tags = ["select", "input"];
    let month = sub_control(doc, block, &tags, &["month"], &[])?;
    let day = sub_control(doc, block, &tags, &["day"], &[])?;
    let year = sub_control(doc, block, &tags, &["year"], &[])?;

    let (Some(month), Some(day), Some(year)) = (month, day, year) else {
        debug!("date block has no date sub-controls");
        return Ok(false);
    };

    let Some(date) = parse_calendar_date(value) else {
        debug!(value, "unparseable date dropped");
        return Ok(false);
    };

    let parts = [
        (month, month_candidates(date)),
        (day, day_candidates(date)),
        (year, year_candidates(date)),
    ];
    let mut complete = true;
    for (id, candidates) in &parts {
        if assign_first_accepted(doc, *id, candidates)? {
            doc.dispatch(*id, EventKind::Change);
        } else {
            debug!(value, "date part has no matching option");
            complete = false;
        }
    }
    Ok(complete)
}

fn assign_first_accepted(doc: &mut Document, id: NodeId, candidates: &[String]) -> Result<bool> {
    for candidate in candidates {
        if doc.set_value(id, candidate)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Tick every checkbox/radio whose option label contains a want-token; for
/// a select, pick the option closest to the first want-token.
pub fn click_options(
    doc: &mut Document,
    block: NodeId,
    wants: &[String],
    options: &FillOptions,
) -> Result<bool> {
    let norms: Vec<String> = wants
        .iter()
        .map(|w| normalize(w))
        .filter(|w| !w.is_empty())
        .collect();

    let boxes = doc.select_all(block, &CHOICE_INPUT);

    if !boxes.is_empty() {
        let mut matched = false;
        for b in boxes {
            let mut label = closest_option_label(doc, b);
            if label.is_empty() {
                label = doc.value(b);
            }
            let label = normalize(&label);

            if !norms.iter().any(|w| label.contains(w.as_str())) {
                continue;
            }
            matched = true;
            if !doc.is_checked(b) {
                doc.click(b)?;
                pace(options);
            }
        }
        return Ok(matched);
    }

    let Some(select) = doc.select_first(block, &SELECT) else {
        return Ok(false);
    };
    let first = norms.first().cloned().unwrap_or_default();
    match best_option(doc, select, |text, _| similarity(text, &first)) {
        Some(index) => {
            choose_option(doc, select, index)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
