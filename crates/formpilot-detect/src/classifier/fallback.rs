//! Fallback from the element's own declared kind.

use formpilot_protocols::{ClassificationStrategy, FieldType};

use super::Scored;
use crate::candidate::CandidateElement;

pub(super) fn score(candidate: &CandidateElement) -> Option<Scored> {
    let (field_type, confidence) = match candidate.tag.as_str() {
        "input" => match candidate.effective_input_type() {
            "email" => (FieldType::Email, 0.8),
            "tel" => (FieldType::Phone, 0.8),
            _ => return None,
        },
        "textarea" => (FieldType::CoverLetter, 0.3),
        _ => return None,
    };
    Some(Scored::new(field_type, confidence, ClassificationStrategy::Fallback))
}
