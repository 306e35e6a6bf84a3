//! Fill run results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field::{FieldType, UploadPurpose};
use crate::document::ElementId;

/// Per-item state machine.
///
/// Fields move `Pending -> Filling -> Verifying -> {Success | RolledBack}`,
/// uploads move `Pending -> Uploading -> Verifying -> {Success | RolledBack}`.
/// `Skipped`, `Incompatible` and `Failed` are terminal exits from the first
/// active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillState {
    Pending,
    Filling,
    Uploading,
    Verifying,
    Success,
    Skipped,
    RolledBack,
    Incompatible,
    Failed,
}

impl FillState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FillState::Success
                | FillState::Skipped
                | FillState::RolledBack
                | FillState::Incompatible
                | FillState::Failed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum FillTarget {
    Field(FieldType),
    Upload(UploadPurpose),
}

/// Final outcome of one field write or file upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillOutcome {
    pub element: ElementId,
    pub target: FillTarget,
    pub state: FillState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregate result of a fill run. Always carries partial success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub fields_filled: usize,
    pub files_uploaded: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub cancelled: bool,
    pub outcomes: Vec<FillOutcome>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            fields_filled: 0,
            files_uploaded: 0,
            skipped: 0,
            errors: Vec::new(),
            cancelled: false,
            outcomes: Vec::new(),
        }
    }

    /// Record an outcome and update the counters.
    pub fn record(&mut self, outcome: FillOutcome) {
        match (outcome.state, outcome.target) {
            (FillState::Success, FillTarget::Field(_)) => self.fields_filled += 1,
            (FillState::Success, FillTarget::Upload(_)) => self.files_uploaded += 1,
            (FillState::Skipped, _) => self.skipped += 1,
            (FillState::RolledBack | FillState::Incompatible | FillState::Failed, _) => {
                if let Some(detail) = &outcome.detail {
                    self.errors.push(detail.clone());
                }
            }
            _ => {}
        }
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
