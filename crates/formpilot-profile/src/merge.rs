//! Profile merge engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use formpilot_protocols::{ExtractedProfileData, FieldMergeStrategy, MergePolicy, Profile};

use crate::compare::{ValueKind, choose_better_value};
use crate::skills::merge_skills;

/// One field whose value the merge changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Dotted camelCase profile path, e.g. `personalInfo.address.city`.
    pub path: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOutcome {
    pub profile: Profile,
    pub changes: Vec<FieldChange>,
}

impl MergeOutcome {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Merge extracted data into a copy of `existing`, stamped with the current
/// time.
pub fn merge(existing: &Profile, extracted: &ExtractedProfileData, policy: &MergePolicy) -> MergeOutcome {
    merge_at(existing, extracted, policy, Utc::now())
}

/// Merge with an explicit timestamp. `existing` is never modified; persisting
/// the result is up to the caller.
pub fn merge_at(
    existing: &Profile,
    extracted: &ExtractedProfileData,
    policy: &MergePolicy,
    now: DateTime<Utc>,
) -> MergeOutcome {
    let mut profile = existing.clone();
    let mut merger = FieldMerger {
        policy,
        changes: Vec::new(),
    };
    let confidence = &extracted.confidence;

    if confidence.personal_info >= policy.min_confidence {
        let strategy = policy.personal_info;
        let from = &extracted.personal_info;
        let to = &mut profile.personal_info;
        merger.field("personalInfo.firstName", &mut to.first_name, from.first_name.as_deref(), strategy, ValueKind::General);
        merger.field("personalInfo.lastName", &mut to.last_name, from.last_name.as_deref(), strategy, ValueKind::General);
        merger.field("personalInfo.email", &mut to.email, from.email.as_deref(), strategy, ValueKind::Email);
        merger.field("personalInfo.phone", &mut to.phone, from.phone.as_deref(), strategy, ValueKind::Phone);

        let from = &from.address;
        let to = &mut to.address;
        merger.field("personalInfo.address.street", &mut to.street, from.street.as_deref(), strategy, ValueKind::General);
        merger.field("personalInfo.address.city", &mut to.city, from.city.as_deref(), strategy, ValueKind::General);
        merger.field("personalInfo.address.state", &mut to.state, from.state.as_deref(), strategy, ValueKind::General);
        merger.field("personalInfo.address.zipCode", &mut to.zip_code, from.zip_code.as_deref(), strategy, ValueKind::General);
        merger.field("personalInfo.address.country", &mut to.country, from.country.as_deref(), strategy, ValueKind::General);
    } else {
        debug!(
            "Ignoring extracted personal info (confidence {} < {})",
            confidence.personal_info, policy.min_confidence
        );
    }

    if confidence.work_info >= policy.min_confidence {
        let strategy = policy.work_info;
        let from = &extracted.work_info;
        let to = &mut profile.work_info;
        merger.field("workInfo.title", &mut to.title, from.title.as_deref(), strategy, ValueKind::General);
        merger.field("workInfo.experience", &mut to.experience, from.experience.as_deref(), strategy, ValueKind::FreeText);
        merger.field("workInfo.linkedin", &mut to.linkedin, from.linkedin.as_deref(), strategy, ValueKind::General);
        merger.field("workInfo.github", &mut to.github, from.github.as_deref(), strategy, ValueKind::General);
        merger.field("workInfo.website", &mut to.website, from.website.as_deref(), strategy, ValueKind::General);
    } else {
        debug!(
            "Ignoring extracted work info (confidence {} < {})",
            confidence.work_info, policy.min_confidence
        );
    }

    if confidence.skills >= policy.min_confidence {
        let skills = merge_skills(
            &profile.work_info.skills,
            &extracted.skills,
            policy.skills,
            policy.max_skills,
        );
        if skills != profile.work_info.skills {
            merger.changes.push(FieldChange {
                path: "workInfo.skills".to_string(),
                from: profile.work_info.skills.join(", "),
                to: skills.join(", "),
            });
            profile.work_info.skills = skills;
        }
    }

    profile.last_updated = Some(now);
    debug!("Merged profile with {} changes", merger.changes.len());
    MergeOutcome {
        profile,
        changes: merger.changes,
    }
}

struct FieldMerger<'a> {
    policy: &'a MergePolicy,
    changes: Vec<FieldChange>,
}

impl FieldMerger<'_> {
    fn field(
        &mut self,
        path: &str,
        target: &mut String,
        extracted: Option<&str>,
        strategy: FieldMergeStrategy,
        kind: ValueKind,
    ) {
        let Some(extracted) = extracted.map(str::trim).filter(|v| !v.is_empty()) else {
            return;
        };
        if !kind.is_valid(extracted) {
            debug!("Rejecting invalid extracted value for {}", path);
            return;
        }
        let existing_empty = target.trim().is_empty();

        let next = match strategy {
            FieldMergeStrategy::PreserveExisting => {
                if existing_empty {
                    extracted
                } else {
                    return;
                }
            }
            FieldMergeStrategy::PreferExtracted => {
                if self.policy.preserve_user_modifications && !existing_empty {
                    return;
                }
                extracted
            }
            FieldMergeStrategy::MergeIntelligent => choose_better_value(target, extracted, kind),
        };

        if next != target.as_str() {
            let next = next.to_string();
            self.changes.push(FieldChange {
                path: path.to_string(),
                from: std::mem::replace(target, next.clone()),
                to: next,
            });
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
