use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::error::COMMUNICATION_FAILURE_MESSAGE;
use formpilot_protocols::Profile;

/// Target whose first `failing_probes` probes fail.
#[derive(Default)]
struct ScriptedTarget {
    failing_probes: AtomicUsize,
    hang: AtomicBool,
    reestablish_fails: bool,
    execution_error: Option<String>,
    probes: AtomicUsize,
    reestablished: AtomicUsize,
    triggered: AtomicUsize,
}

impl ScriptedTarget {
    fn failing(probes: usize) -> Self {
        Self {
            failing_probes: AtomicUsize::new(probes),
            ..Self::default()
        }
    }
}

#[async_trait]
impl AutomationTarget for ScriptedTarget {
    async fn probe(&self) -> Result<(), TargetError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let remaining = self.failing_probes.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_probes.store(remaining - 1, Ordering::SeqCst);
            return Err(TargetError::Unreachable("no receiving end".to_string()));
        }
        Ok(())
    }

    async fn reestablish(&self) -> Result<(), TargetError> {
        self.reestablished.fetch_add(1, Ordering::SeqCst);
        if self.reestablish_fails {
            return Err(TargetError::InjectionFailed("tab closed".to_string()));
        }
        self.hang.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn trigger_autofill(&self, _request: AutofillRequest) -> Result<RunReport, TargetError> {
        self.triggered.fetch_add(1, Ordering::SeqCst);
        match &self.execution_error {
            Some(message) => Err(TargetError::Execution(message.clone())),
            None => Ok(RunReport::new()),
        }
    }
}

fn request() -> AutofillRequest {
    AutofillRequest {
        profile: Profile::default(),
        cv: None,
    }
}

fn orchestrator(target: Arc<ScriptedTarget>) -> RecoveryOrchestrator {
    RecoveryOrchestrator::new(target, RecoveryOptions::default())
}

#[tokio::test(start_paused = true)]
async fn test_healthy_target_runs_once() {
    let target = Arc::new(ScriptedTarget::default());
    let report = orchestrator(Arc::clone(&target)).run(request()).await;

    assert!(report.is_ok());
    assert_eq!(target.probes.load(Ordering::SeqCst), 1);
    assert_eq!(target.reestablished.load(Ordering::SeqCst), 0);
    assert_eq!(target.triggered.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_reestablish() {
    let target = Arc::new(ScriptedTarget::failing(1));
    let start = tokio::time::Instant::now();
    let report = orchestrator(Arc::clone(&target)).run(request()).await;

    assert!(report.is_ok());
    assert_eq!(target.reestablished.load(Ordering::SeqCst), 1);
    assert_eq!(target.probes.load(Ordering::SeqCst), 2);
    assert_eq!(target.triggered.load(Ordering::SeqCst), 1);
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_second_failure_is_terminal() {
    let target = Arc::new(ScriptedTarget::failing(usize::MAX));
    let err = orchestrator(Arc::clone(&target))
        .run(request())
        .await
        .unwrap_err();

    assert!(err.is_terminal_communication());
    assert_eq!(err.to_string(), COMMUNICATION_FAILURE_MESSAGE);
    assert_eq!(target.reestablished.load(Ordering::SeqCst), 1);
    assert_eq!(target.probes.load(Ordering::SeqCst), 2);
    assert_eq!(target.triggered.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reestablish_failure_is_terminal() {
    let target = Arc::new(ScriptedTarget {
        reestablish_fails: true,
        ..ScriptedTarget::failing(1)
    });
    let err = orchestrator(Arc::clone(&target))
        .run(request())
        .await
        .unwrap_err();

    assert!(err.is_terminal_communication());
    assert_eq!(target.probes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_probe_timeout_counts_as_communication_failure() {
    let target = Arc::new(ScriptedTarget::default());
    target.hang.store(true, Ordering::SeqCst);
    let report = orchestrator(Arc::clone(&target)).run(request()).await;

    // The re-establish clears the hang, so the retry succeeds.
    assert!(report.is_ok());
    assert_eq!(target.reestablished.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_execution_error_is_not_retried() {
    let target = Arc::new(ScriptedTarget {
        execution_error: Some("page crashed".to_string()),
        ..ScriptedTarget::default()
    });
    let err = orchestrator(Arc::clone(&target))
        .run(request())
        .await
        .unwrap_err();

    assert!(!err.is_terminal_communication());
    assert!(err.to_string().contains("page crashed"));
    assert_eq!(target.reestablished.load(Ordering::SeqCst), 0);
}
