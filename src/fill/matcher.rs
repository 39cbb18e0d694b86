use crate::fields::field_model::FieldDescriptor;
use crate::text::normalize::similarity;

/// Weight of the full signature vs the bare label in the field score.
const SEARCH_TEXT_WEIGHT: f32 = 0.7;
const LABEL_WEIGHT: f32 = 0.3;

pub fn score_field(field: &FieldDescriptor, spoken_key: &str) -> f32 {
    similarity(&field.search_text, spoken_key) * SEARCH_TEXT_WEIGHT
        + similarity(&field.label, spoken_key) * LABEL_WEIGHT
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldMatch<'a> {
    Found { field: &'a FieldDescriptor, score: f32 },
    BelowThreshold { best_score: f32 },
}

/// Highest-scoring field for `spoken_key`; the earliest field wins ties.
pub fn best_field_match<'a>(
    fields: &'a [FieldDescriptor],
    spoken_key: &str,
    threshold: f32,
) -> FieldMatch<'a> {
    let mut best: Option<(&FieldDescriptor, f32)> = None;

    for field in fields {
        let score = score_field(field, spoken_key);
        if score > best.map_or(0.0, |(_, s)| s) {
            best = Some((field, score));
        }
    }

    match best {
        Some((field, score)) if score >= threshold => FieldMatch::Found { field, score },
        Some((_, score)) => FieldMatch::BelowThreshold { best_score: score },
        None => FieldMatch::BelowThreshold { best_score: 0.0 },
    }
}
