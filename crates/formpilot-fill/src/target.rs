//! In-process automation target.
//!
//! Hosts a [`FormEngine`] together with the document it fills. `detach`
//! stands in for the page losing its injected automation logic, e.g. after
//! a navigation; until `reestablish` runs, every request fails as
//! unreachable.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use formpilot_protocols::{
    AutofillRequest, AutomationTarget, EngineCommand, EngineEvent, FieldPort, RunReport,
    TargetError,
};

use crate::CancellationToken;
use crate::engine::FormEngine;

pub struct LocalTarget<P> {
    engine: Arc<FormEngine>,
    port: Mutex<P>,
    attached: AtomicBool,
    reinjections: AtomicUsize,
    shutdown: CancellationToken,
    current_run: parking_lot::Mutex<Option<CancellationToken>>,
}

impl<P> LocalTarget<P>
where
    P: FieldPort + 'static,
{
    pub fn new(engine: Arc<FormEngine>, port: P) -> Self {
        Self {
            engine,
            port: Mutex::new(port),
            attached: AtomicBool::new(true),
            reinjections: AtomicUsize::new(0),
            shutdown: CancellationToken::new(),
            current_run: parking_lot::Mutex::new(None),
        }
    }

    pub fn engine(&self) -> &Arc<FormEngine> {
        &self.engine
    }

    /// Drop the connection to the document until the next re-establish.
    pub fn detach(&self) {
        debug!("Local target detached");
        self.attached.store(false, Ordering::SeqCst);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// How many times the automation logic has been re-established.
    pub fn reinjections(&self) -> usize {
        self.reinjections.load(Ordering::SeqCst)
    }

    /// Exclusive access to the hosted document.
    pub async fn port(&self) -> MutexGuard<'_, P> {
        self.port.lock().await
    }

    /// Stop the fill in progress, if any. Later triggers run normally.
    pub fn cancel_run(&self) -> bool {
        match self.current_run.lock().as_ref() {
            Some(token) => {
                debug!("Cancelling in-flight fill");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Token that stops the current fill and every later one.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn into_port(self) -> P {
        self.port.into_inner()
    }

    /// Answer a command the way a messaging endpoint would.
    pub async fn handle(&self, command: EngineCommand) -> EngineEvent {
        let result = match command {
            EngineCommand::Ping => self.probe().await.map(|_| EngineEvent::Pong),
            EngineCommand::TriggerAutofill(request) => self
                .trigger_autofill(request)
                .await
                .map(EngineEvent::RunComplete),
        };
        result.unwrap_or_else(|e| EngineEvent::Error {
            message: e.to_string(),
        })
    }

    fn ensure_attached(&self) -> Result<(), TargetError> {
        if self.is_attached() {
            Ok(())
        } else {
            Err(TargetError::Unreachable(
                "automation logic is not attached to the document".to_string(),
            ))
        }
    }
}

#[async_trait]
impl<P> AutomationTarget for LocalTarget<P>
where
    P: FieldPort + 'static,
{
    async fn probe(&self) -> Result<(), TargetError> {
        self.ensure_attached()
    }

    async fn reestablish(&self) -> Result<(), TargetError> {
        self.attached.store(true, Ordering::SeqCst);
        let count = self.reinjections.fetch_add(1, Ordering::SeqCst) + 1;
        info!(reinjections = count, "Automation logic re-established");
        Ok(())
    }

    async fn trigger_autofill(&self, request: AutofillRequest) -> Result<RunReport, TargetError> {
        self.ensure_attached()?;
        let mut port = self.port.lock().await;
        let run = self.shutdown.child_token();
        *self.current_run.lock() = Some(run.clone());
        let report = self
            .engine
            .fill(&mut *port, &request.profile, request.cv.as_ref(), &run)
            .await;
        self.current_run.lock().take();
        Ok(report)
    }
}
