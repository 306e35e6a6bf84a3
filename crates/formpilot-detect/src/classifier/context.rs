//! Context-phrase strategy.

use formpilot_protocols::ClassificationStrategy;

use super::{Scored, best_by_rank};
use crate::candidate::CandidateElement;
use crate::tables::ClassifierTables;

const PER_PHRASE: f64 = 0.3;
const MAX_CONFIDENCE: f64 = 0.7;

pub(super) fn score(tables: &ClassifierTables, candidate: &CandidateElement) -> Option<Scored> {
    let text = &candidate.context_text;
    if text.is_empty() {
        return None;
    }

    let scores = tables.context_phrases.iter().filter_map(|entry| {
        let hits = entry
            .phrases
            .iter()
            .filter(|phrase| text.contains(phrase.as_str()))
            .count();
        (hits > 0).then(|| {
            (
                entry.field_type,
                (hits as f64 * PER_PHRASE).min(MAX_CONFIDENCE),
            )
        })
    });

    best_by_rank(scores).map(|(field_type, confidence)| {
        Scored::new(field_type, confidence, ClassificationStrategy::ContextPhrase)
    })
}
