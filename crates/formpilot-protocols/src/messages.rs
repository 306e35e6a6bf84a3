//! In-process message shapes exchanged with the automation target and the
//! owning process.

use serde::{Deserialize, Serialize};

use crate::target::AutofillRequest;
use crate::types::RunReport;

/// Commands sent to the automation target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum EngineCommand {
    Ping,
    TriggerAutofill(AutofillRequest),
}

/// Notifications sent back to the owning process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EngineEvent {
    Pong,
    RunComplete(RunReport),
    Error { message: String },
}

/// Receives run completion and unrecoverable errors.
pub trait RunNotifier: Send + Sync {
    fn run_complete(&self, report: &RunReport);

    fn run_failed(&self, message: &str);
}
