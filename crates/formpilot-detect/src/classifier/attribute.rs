//! Attribute pattern-match strategy.

use formpilot_protocols::ClassificationStrategy;

use super::{Scored, best_by_rank};
use crate::candidate::CandidateElement;
use crate::tables::ClassifierTables;

/// Upper bound for an attribute match.
const MAX_CONFIDENCE: f64 = 0.9;

/// Each matched pattern contributes `len × base_weight` to its type; the
/// type's confidence is its share of all matched weight, capped at 0.9.
pub(super) fn score(tables: &ClassifierTables, candidate: &CandidateElement) -> Option<Scored> {
    let identifier = candidate.identifier();
    if identifier.is_empty() {
        return None;
    }

    let mut matched = Vec::new();
    for entry in &tables.field_patterns {
        if entry
            .excludes
            .iter()
            .any(|x| identifier.contains(x.as_str()))
        {
            continue;
        }
        let weight: f64 = entry
            .patterns
            .iter()
            .filter(|pattern| identifier.contains(pattern.as_str()))
            .map(|pattern| pattern.chars().count() as f64 * entry.base_weight)
            .sum();
        if weight > 0.0 {
            matched.push((entry.field_type, weight));
        }
    }

    let total: f64 = matched.iter().map(|(_, weight)| weight).sum();
    if total <= 0.0 {
        return None;
    }
    let scores = matched
        .into_iter()
        .map(|(field_type, weight)| (field_type, (weight / total).min(MAX_CONFIDENCE)));

    best_by_rank(scores).map(|(field_type, confidence)| {
        Scored::new(field_type, confidence, ClassificationStrategy::AttributePattern)
    })
}
