//! Automation target (messaging collaborator) errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Automation target unreachable: {0}")]
    Unreachable(String),

    #[error("Automation target did not respond within {0} ms")]
    Timeout(u64),

    #[error("Failed to inject automation logic: {0}")]
    InjectionFailed(String),

    #[error("Malformed response from automation target: {0}")]
    Protocol(String),

    #[error("Automation target error: {0}")]
    Execution(String),
}

impl TargetError {
    /// Whether this error means the channel to the target is broken, as opposed
    /// to the target answering with a failure of its own.
    pub fn is_communication_failure(&self) -> bool {
        matches!(
            self,
            TargetError::Unreachable(_) | TargetError::Timeout(_) | TargetError::Protocol(_)
        )
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
