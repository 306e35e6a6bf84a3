//! Document-position strategy. Low-confidence last resort: it only knows the
//! conventional first/last/email/phone ordering.

use formpilot_protocols::ClassificationStrategy;

use super::Scored;
use crate::tables::ClassifierTables;

pub(super) fn score(tables: &ClassifierTables, index: usize) -> Option<Scored> {
    tables
        .position_rule(index)
        .map(|rule| Scored::new(rule.field_type, rule.confidence, ClassificationStrategy::Position))
}
