//! Merge policy for reconciling extracted data with the stored profile.

use serde::{Deserialize, Serialize};

/// How a personal/work field is reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMergeStrategy {
    /// Only fill fields that are empty in the stored profile.
    PreserveExisting,
    /// Extracted values win when present and valid.
    PreferExtracted,
    /// Keep whichever of the two values is better.
    MergeIntelligent,
}

/// How the skill list is reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillMergeStrategy {
    Replace,
    Merge,
    PreserveExisting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergePolicy {
    #[serde(default = "default_personal_info")]
    pub personal_info: FieldMergeStrategy,

    #[serde(default = "default_work_info")]
    pub work_info: FieldMergeStrategy,

    #[serde(default = "default_skills")]
    pub skills: SkillMergeStrategy,

    /// Under `prefer_extracted`, never overwrite a field the user already filled.
    #[serde(default = "default_preserve_user_modifications")]
    pub preserve_user_modifications: bool,

    /// Extracted categories below this confidence are ignored.
    #[serde(default)]
    pub min_confidence: f64,

    #[serde(default = "default_max_skills")]
    pub max_skills: usize,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            personal_info: default_personal_info(),
            work_info: default_work_info(),
            skills: default_skills(),
            preserve_user_modifications: default_preserve_user_modifications(),
            min_confidence: 0.0,
            max_skills: default_max_skills(),
        }
    }
}

fn default_personal_info() -> FieldMergeStrategy {
    FieldMergeStrategy::PreserveExisting
}

fn default_work_info() -> FieldMergeStrategy {
    FieldMergeStrategy::MergeIntelligent
}

fn default_skills() -> SkillMergeStrategy {
    SkillMergeStrategy::Merge
}

fn default_preserve_user_modifications() -> bool {
    true
}

fn default_max_skills() -> usize {
    30
}
