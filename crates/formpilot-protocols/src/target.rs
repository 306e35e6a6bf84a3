//! Automation target protocol.
//!
//! The automation target is the page context fields are written into. It is
//! reached over a request/response channel owned by the host; this trait is
//! the engine's view of that channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TargetError;
use crate::types::{CvRecord, Profile, RunReport};

/// Payload of a trigger-autofill command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofillRequest {
    pub profile: Profile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv: Option<CvRecord>,
}

#[async_trait]
pub trait AutomationTarget: Send + Sync {
    /// Lightweight liveness probe.
    async fn probe(&self) -> Result<(), TargetError>;

    /// Re-inject the automation logic into the target.
    async fn reestablish(&self) -> Result<(), TargetError>;

    /// Run a full scan-and-fill pass inside the target.
    async fn trigger_autofill(&self, request: AutofillRequest) -> Result<RunReport, TargetError>;
}
