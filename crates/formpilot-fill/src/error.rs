//! Run-level errors surfaced to the owner of the engine.

use thiserror::Error;

use formpilot_protocols::{StoreError, TargetError};

/// Shown to the user when the automation target cannot be reached even after
/// re-establishing it.
pub const COMMUNICATION_FAILURE_MESSAGE: &str =
    "Could not communicate with the page. Please refresh and try again.";

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("Could not communicate with the page. Please refresh and try again.")]
    Communication,

    #[error("Autofill is disabled")]
    AutofillDisabled,

    #[error("No profile saved. Create a profile before filling forms.")]
    MissingProfile,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Target(TargetError),
}

impl RecoveryError {
    pub fn is_terminal_communication(&self) -> bool {
        matches!(self, RecoveryError::Communication)
    }
}
