//! Skill list reconciliation.

use std::collections::HashMap;

use formpilot_protocols::SkillMergeStrategy;

/// Skills shorter than this (in characters) are dropped.
const MIN_SKILL_LEN: usize = 2;

/// Reconcile two skill lists.
///
/// Every strategy's result is normalized: whitespace collapsed, one entry per
/// case-insensitive skill carrying its best spelling, single characters
/// dropped, and at most `max_skills` entries in first-appearance order.
/// Only case variants are folded; distinct names such as `JS` and
/// `javascript` stay separate entries.
pub fn merge_skills(
    existing: &[String],
    extracted: &[String],
    strategy: SkillMergeStrategy,
    max_skills: usize,
) -> Vec<String> {
    match strategy {
        SkillMergeStrategy::Replace if !extracted.is_empty() => normalize(extracted, max_skills),
        SkillMergeStrategy::Replace => normalize(existing, max_skills),
        SkillMergeStrategy::PreserveExisting if existing.is_empty() => normalize(extracted, max_skills),
        SkillMergeStrategy::PreserveExisting => existing.to_vec(),
        SkillMergeStrategy::Merge => {
            let combined: Vec<String> = existing.iter().chain(extracted).cloned().collect();
            normalize(&combined, max_skills)
        }
    }
}

fn normalize(skills: &[String], max_skills: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut best: HashMap<String, String> = HashMap::new();

    for skill in skills {
        let cleaned = skill.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.chars().count() < MIN_SKILL_LEN {
            continue;
        }
        let key = cleaned.to_lowercase();
        match best.get_mut(&key) {
            Some(current) => {
                if is_better_spelling(&cleaned, current) {
                    *current = cleaned;
                }
            }
            None => {
                order.push(key.clone());
                best.insert(key, cleaned);
            }
        }
    }

    order
        .into_iter()
        .take(max_skills)
        .filter_map(|key| best.remove(&key))
        .collect()
}

/// Short acronyms in capitals (`SQL`) beat mixed case (`JavaScript`), which
/// beats long all-caps, which beats all lowercase. Equal ranks fall back to
/// lexicographic order so the choice never depends on input order.
fn is_better_spelling(candidate: &str, current: &str) -> bool {
    let (a, b) = (spelling_rank(candidate), spelling_rank(current));
    a > b || (a == b && candidate < current)
}

fn spelling_rank(skill: &str) -> u8 {
    let has_upper = skill.chars().any(char::is_uppercase);
    let has_lower = skill.chars().any(char::is_lowercase);
    match (has_upper, has_lower) {
        (true, false) if skill.chars().count() <= 4 => 3,
        (true, true) => 2,
        (true, false) => 1,
        _ => 0,
    }
}
