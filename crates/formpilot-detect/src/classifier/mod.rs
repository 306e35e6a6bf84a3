//! Field classifier.
//!
//! Strategies run in priority order: attribute pattern-match, context
//! phrases, document position. The first result that clears its own
//! threshold is taken; otherwise the highest-confidence result wins, with an
//! earlier strategy keeping its result on an exact tie. Elements still
//! unmapped after that fall back to their declared input type.

mod attribute;
mod context;
mod fallback;
mod position;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use formpilot_protocols::{ClassificationStrategy, ElementId, FieldMapping, FieldType, Profile};

use crate::candidate::CandidateElement;
use crate::resolve::resolve_value;
use crate::tables::ClassifierTables;

pub const ATTRIBUTE_THRESHOLD: f64 = 0.5;
pub const CONTEXT_THRESHOLD: f64 = 0.4;
pub const POSITION_THRESHOLD: f64 = 0.3;

/// A strategy's verdict for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub field_type: FieldType,
    pub confidence: f64,
    pub strategy: ClassificationStrategy,
}

impl Scored {
    fn new(field_type: FieldType, confidence: f64, strategy: ClassificationStrategy) -> Self {
        Self {
            field_type,
            confidence: confidence.clamp(0.0, 1.0),
            strategy,
        }
    }
}

/// Output of one classification pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Mappings above the retention threshold, in document order.
    pub mappings: Vec<FieldMapping>,
    /// Mappings at or below the retention threshold, kept for diagnostics.
    pub hints: Vec<FieldMapping>,
}

pub struct FieldClassifier {
    tables: Arc<ClassifierTables>,
    retain_threshold: f64,
}

impl FieldClassifier {
    pub fn new(tables: Arc<ClassifierTables>, retain_threshold: f64) -> Self {
        Self {
            tables,
            retain_threshold,
        }
    }

    /// Classify fillable candidates and resolve their values against `profile`.
    ///
    /// Candidates must already have passed the fillability filter; their
    /// order defines the position index within each form.
    pub fn classify(&self, candidates: &[CandidateElement], profile: &Profile) -> Classification {
        let positions = position_indexes(candidates);
        let mut result = Classification::default();

        for candidate in candidates {
            let position = positions.get(&candidate.element).copied();
            let Some(scored) = self.classify_candidate(candidate, position) else {
                debug!("No classification for {}", candidate.element);
                continue;
            };
            let mapping = FieldMapping {
                element: candidate.element,
                field_type: scored.field_type,
                confidence: scored.confidence,
                value: resolve_value(scored.field_type, profile),
                strategy: scored.strategy,
            };
            debug!(
                element = %mapping.element,
                field_type = %mapping.field_type,
                confidence = mapping.confidence,
                strategy = ?mapping.strategy,
                "Classified field"
            );
            if mapping.confidence > self.retain_threshold {
                result.mappings.push(mapping);
            } else {
                result.hints.push(mapping);
            }
        }
        result
    }

    /// Best verdict for a single candidate, or `None` when nothing matched.
    pub fn classify_candidate(
        &self,
        candidate: &CandidateElement,
        position: Option<usize>,
    ) -> Option<Scored> {
        let mut best: Option<Scored> = None;

        let attempts = [
            (attribute::score(&self.tables, candidate), ATTRIBUTE_THRESHOLD),
            (context::score(&self.tables, candidate), CONTEXT_THRESHOLD),
            (
                position.and_then(|index| position::score(&self.tables, index)),
                POSITION_THRESHOLD,
            ),
        ];
        for (scored, threshold) in attempts {
            let Some(scored) = scored else {
                continue;
            };
            if scored.confidence >= threshold {
                return Some(scored);
            }
            best = keep_better(best, scored);
        }

        let unmapped = best.is_none_or(|b| b.confidence <= self.retain_threshold);
        if unmapped {
            if let Some(scored) = fallback::score(candidate) {
                best = keep_better(best, scored);
            }
        }
        best
    }
}

/// Replace `current` only on a strictly higher confidence.
fn keep_better(current: Option<Scored>, next: Scored) -> Option<Scored> {
    match current {
        Some(current) if current.confidence >= next.confidence => Some(current),
        _ => Some(next),
    }
}

/// Zero-based index of each candidate among the candidates sharing its form
/// (or among the form-less candidates).
fn position_indexes(candidates: &[CandidateElement]) -> HashMap<ElementId, usize> {
    let mut counters: HashMap<Option<ElementId>, usize> = HashMap::new();
    let mut indexes = HashMap::new();
    for candidate in candidates {
        let counter = counters.entry(candidate.form).or_insert(0);
        indexes.insert(candidate.element, *counter);
        *counter += 1;
    }
    indexes
}

/// Highest score per field type wins; equal scores go to the type declared
/// first.
fn best_by_rank(scores: impl IntoIterator<Item = (FieldType, f64)>) -> Option<(FieldType, f64)> {
    let mut scores: Vec<(FieldType, f64)> = scores.into_iter().collect();
    scores.sort_by_key(|(field_type, _)| field_type.rank());
    scores.into_iter().fold(None, |best, (field_type, score)| match best {
        Some((_, best_score)) if best_score >= score => best,
        _ => Some((field_type, score)),
    })
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
