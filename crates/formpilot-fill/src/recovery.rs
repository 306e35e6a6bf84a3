//! Liveness probe with a single re-establish-and-retry.

use std::sync::Arc;

use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use formpilot_protocols::{AutofillRequest, AutomationTarget, RunReport, TargetError};

use crate::error::RecoveryError;
use crate::options::RecoveryOptions;

pub struct RecoveryOrchestrator {
    target: Arc<dyn AutomationTarget>,
    options: RecoveryOptions,
}

impl RecoveryOrchestrator {
    pub fn new(target: Arc<dyn AutomationTarget>, options: RecoveryOptions) -> Self {
        Self { target, options }
    }

    pub fn options(&self) -> &RecoveryOptions {
        &self.options
    }

    /// Run a fill in the target.
    ///
    /// A communication failure triggers exactly one re-establish, a settle
    /// delay and one retry. Failing again ends with
    /// [`RecoveryError::Communication`]. Errors the target itself reports
    /// are returned as they are, without a retry.
    pub async fn run(&self, request: AutofillRequest) -> Result<RunReport, RecoveryError> {
        let err = match self.attempt(request.clone()).await {
            Ok(report) => return Ok(report),
            Err(err) if err.is_communication_failure() => err,
            Err(err) => return Err(RecoveryError::Target(err)),
        };

        warn!("Automation target not responding ({}); re-establishing", err);
        if let Err(e) = self.target.reestablish().await {
            error!("Re-establishing the automation target failed: {}", e);
            return Err(RecoveryError::Communication);
        }
        sleep(self.options.settle_delay).await;

        match self.attempt(request).await {
            Ok(report) => {
                info!("Automation target recovered after re-establishing");
                Ok(report)
            }
            Err(err) if err.is_communication_failure() => {
                error!("Automation target still unreachable after retry: {}", err);
                Err(RecoveryError::Communication)
            }
            Err(err) => Err(RecoveryError::Target(err)),
        }
    }

    async fn attempt(&self, request: AutofillRequest) -> Result<RunReport, TargetError> {
        self.probe().await?;
        debug!("Automation target alive; triggering autofill");
        self.target.trigger_autofill(request).await
    }

    async fn probe(&self) -> Result<(), TargetError> {
        let limit = self.options.probe_timeout;
        match timeout(limit, self.target.probe()).await {
            Ok(result) => result,
            Err(_) => Err(TargetError::Timeout(limit.as_millis() as u64)),
        }
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
