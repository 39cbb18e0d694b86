use std::sync::LazyLock;

use regex::Regex;

use crate::fill::fill_model::SpokenEntry;

static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:set\s+)?([^:]+?)\s*(?::| to )\s*(.+)$").expect("valid pair regex")
});
static PART_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n;]+").expect("valid separator regex"));

static PRONOUN_IM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(i'm|im)\b").expect("valid regex"));
static PRONOUN_I: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bi\b").expect("valid regex"));
static OK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bok\b").expect("valid regex"));
static GONNA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bgonna\b").expect("valid regex"));

/// Offline parser for "Label: Value" and "Set Label to Value" phrases,
/// separated by newlines or semicolons. A repeated label keeps its first
/// position and takes the latest value.
pub fn transcript_to_entries(text: &str) -> Vec<SpokenEntry> {
    let mut entries: Vec<SpokenEntry> = vec![];

    for part in PART_SEPARATOR.split(text).map(str::trim).filter(|p| !p.is_empty()) {
        let Some(caps) = PAIR.captures(part) else {
            continue;
        };
        let key = caps[1].trim();
        let value = caps[2].trim();

        match entries.iter_mut().find(|e| e.key == key) {
            Some(existing) => existing.value = value.to_string(),
            None => entries.push(SpokenEntry::new(key, value)),
        }
    }

    entries
}

/// Rule-based cleanup used when no language model is configured.
pub fn polish_locally(text: &str) -> String {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = PRONOUN_IM.replace_all(&cleaned, "I'm");
    let cleaned = PRONOUN_I.replace_all(&cleaned, "I");
    let cleaned = OK.replace_all(&cleaned, "okay");
    let cleaned = GONNA.replace_all(&cleaned, "going to");

    capitalize_sentences(&cleaned)
}

fn capitalize_sentences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_start = true;

    for c in text.chars() {
        if at_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            at_start = false;
            continue;
        }
        if matches!(c, '.' | '?' | '!') {
            at_start = true;
        } else if !c.is_whitespace() {
            at_start = false;
        }
        out.push(c);
    }

    out
}
