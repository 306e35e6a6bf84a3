//! Rescan scheduling.
//!
//! Document mutations arrive in bursts. Each mutation pushes the debounce
//! deadline out; a single [`ScanTrigger::Mutation`] fires once the document
//! has been quiet for the whole window. An optional periodic timer runs
//! alongside.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use formpilot_config::ScanConfig;

use crate::CancellationToken;
use crate::engine::ScanTrigger;

const MUTATION_BUFFER: usize = 64;
const TRIGGER_BUFFER: usize = 8;

/// Trailing-edge debounce state, driven by explicit instants.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Record an event at `now`, restarting the quiet window.
    pub fn signal(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Whether the window elapsed by `now`. Fires at most once per burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn clear(&mut self) {
        self.deadline = None;
    }
}

/// Handle used to report document mutations to a running scheduler.
#[derive(Debug, Clone)]
pub struct MutationSignal {
    tx: mpsc::Sender<()>,
}

impl MutationSignal {
    /// Report a mutation. Returns false once the scheduler has stopped.
    pub fn notify(&self) -> bool {
        match self.tx.try_send(()) {
            // A full buffer already guarantees a pending rescan.
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RescanScheduler {
    debounce: Duration,
    periodic: Option<Duration>,
}

impl RescanScheduler {
    pub fn new(debounce: Duration, periodic: Option<Duration>) -> Self {
        Self { debounce, periodic }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.debounce(), config.periodic_interval())
    }

    /// Start the scheduler task.
    ///
    /// [`ScanTrigger::Initial`] is emitted first. The task stops when
    /// `cancel` fires or the trigger receiver is dropped.
    pub fn spawn(
        self,
        cancel: CancellationToken,
    ) -> (MutationSignal, mpsc::Receiver<ScanTrigger>, JoinHandle<()>) {
        let (mutation_tx, mutation_rx) = mpsc::channel(MUTATION_BUFFER);
        let (trigger_tx, trigger_rx) = mpsc::channel(TRIGGER_BUFFER);
        let handle = tokio::spawn(self.run(mutation_rx, trigger_tx, cancel));
        (MutationSignal { tx: mutation_tx }, trigger_rx, handle)
    }

    async fn run(
        self,
        mut mutations: mpsc::Receiver<()>,
        triggers: mpsc::Sender<ScanTrigger>,
        cancel: CancellationToken,
    ) {
        info!(
            debounce_ms = self.debounce.as_millis() as u64,
            periodic_ms = self.periodic.map(|p| p.as_millis() as u64),
            "Rescan scheduler started"
        );
        if triggers.send(ScanTrigger::Initial).await.is_err() {
            return;
        }

        let mut debouncer = Debouncer::new(self.debounce);
        let mut periodic = self.periodic.map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        let mut mutations_open = true;

        loop {
            let trigger = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Rescan scheduler cancelled");
                    break;
                }
                received = mutations.recv(), if mutations_open => {
                    match received {
                        Some(()) => debouncer.signal(Instant::now()),
                        None => mutations_open = false,
                    }
                    continue;
                }
                _ = wait_until(debouncer.deadline()) => {
                    if !debouncer.poll(Instant::now()) {
                        continue;
                    }
                    ScanTrigger::Mutation
                }
                _ = tick(&mut periodic) => {
                    // The periodic scan also covers any pending mutation.
                    debouncer.clear();
                    ScanTrigger::Periodic
                }
            };

            debug!("Emitting {} scan trigger", trigger);
            if triggers.send(trigger).await.is_err() {
                debug!("Trigger receiver dropped; stopping rescan scheduler");
                break;
            }
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
