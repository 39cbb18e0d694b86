use std::collections::HashSet;

/// Lower-case `raw`, replace every run of characters outside ASCII `a-z0-9`
/// with a single space, and trim. Accented letters act as separators.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

fn token_set(raw: &str) -> HashSet<String> {
    normalize(raw)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Token-overlap similarity in `[0, 1]`: shared unique words divided by the
/// size of the larger word set. Zero when either side has no words.
pub fn similarity(a: &str, b: &str) -> f32 {
    let left = token_set(a);
    let right = token_set(b);

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    shared as f32 / left.len().max(right.len()) as f32
}

/// Collapse internal whitespace runs to one space and trim.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn an identifier like `first_name`, `zip-code` or `phoneNumber` into
/// space separated words.
pub fn prettify_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;

    for c in raw.chars() {
        if c == '_' || c == '-' {
            if !out.ends_with(' ') {
                out.push(' ');
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = c.is_lowercase();
        out.push(c);
    }

    out.trim().to_string()
}

/// Split a dictated value on `,` / `;` into normalized want-tokens,
/// dropping empties.
pub fn want_tokens(value: &str) -> Vec<String> {
    split_list(value)
        .iter()
        .map(|part| normalize(part))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Split on `,` / `;` runs, keeping the raw (trimmed) pieces.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// SHA-1 fingerprint, used where dictated values must not be written in clear.
pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
