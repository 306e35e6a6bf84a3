//! Storage → automation target → notifier.

use std::sync::Arc;

use tracing::{debug, info};

use formpilot_protocols::{AutofillRequest, ProfileStore, RunNotifier, RunReport};

use crate::error::RecoveryError;
use crate::recovery::RecoveryOrchestrator;

/// Handles a user's autofill request end to end.
pub struct AutofillCoordinator {
    store: Arc<dyn ProfileStore>,
    recovery: RecoveryOrchestrator,
    notifier: Arc<dyn RunNotifier>,
}

impl AutofillCoordinator {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        recovery: RecoveryOrchestrator,
        notifier: Arc<dyn RunNotifier>,
    ) -> Self {
        Self {
            store,
            recovery,
            notifier,
        }
    }

    /// Load the stored profile and CV and run a fill in the target.
    ///
    /// Every outcome, success or failure, is also reported to the notifier.
    pub async fn trigger(&self) -> Result<RunReport, RecoveryError> {
        let result = self.prepare_and_run().await;
        match &result {
            Ok(report) => self.notifier.run_complete(report),
            Err(e) => self.notifier.run_failed(&e.to_string()),
        }
        result
    }

    async fn prepare_and_run(&self) -> Result<RunReport, RecoveryError> {
        if !self.store.autofill_enabled().await? {
            info!("Autofill is switched off; ignoring trigger");
            return Err(RecoveryError::AutofillDisabled);
        }
        let profile = self
            .store
            .load_profile()
            .await?
            .ok_or(RecoveryError::MissingProfile)?;
        let cv = self.store.load_cv().await?;
        if cv.is_none() {
            debug!("No CV stored; upload fields will be skipped");
        }

        self.recovery.run(AutofillRequest { profile, cv }).await
    }
}
