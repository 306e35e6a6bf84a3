//! The shared "which value is better" comparator.

use crate::validation::{is_valid_email, is_valid_phone};

/// How a profile field's values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Longer text carries more information.
    FreeText,
    Email,
    Phone,
    /// Short values; only replaced by a meaningfully longer one.
    General,
}

/// Extracted general values must be this much longer to replace existing ones.
const GENERAL_LENGTH_MARGIN: f64 = 1.2;

impl ValueKind {
    /// Whether a value passes this kind's format rules.
    pub fn is_valid(&self, value: &str) -> bool {
        match self {
            ValueKind::Email => is_valid_email(value),
            ValueKind::Phone => is_valid_phone(value),
            ValueKind::FreeText | ValueKind::General => true,
        }
    }
}

/// Pick between the stored value and a candidate. The stored value wins every
/// tie.
pub fn choose_better_value<'a>(existing: &'a str, candidate: &'a str, kind: ValueKind) -> &'a str {
    let existing_trimmed = existing.trim();
    let candidate_trimmed = candidate.trim();
    if existing_trimmed.is_empty() {
        return candidate;
    }
    if candidate_trimmed.is_empty() {
        return existing;
    }
    let existing_len = existing_trimmed.chars().count();
    let candidate_len = candidate_trimmed.chars().count();

    match kind {
        ValueKind::FreeText => {
            if candidate_len > existing_len {
                candidate
            } else {
                existing
            }
        }
        ValueKind::Email | ValueKind::Phone => {
            if !kind.is_valid(existing) && kind.is_valid(candidate) {
                candidate
            } else {
                existing
            }
        }
        ValueKind::General => {
            if candidate_len as f64 > existing_len as f64 * GENERAL_LENGTH_MARGIN {
                candidate
            } else {
                existing
            }
        }
    }
}
