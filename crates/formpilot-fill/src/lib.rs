//! # Formpilot Fill
//!
//! Writes profile values and the stored CV into a classified document, and
//! orchestrates runs against an automation target.
//!
//! ## Components
//!
//! - [`FillExecutor`] - per-field write/verify/rollback state machine
//! - [`FormEngine`] - explicit engine object: scanner + executor + last snapshot
//! - [`RescanScheduler`] - debounced, periodic scan triggers
//! - [`RecoveryOrchestrator`] - liveness probe with a single re-establish/retry
//! - [`AutofillCoordinator`] - storage → target → notifier glue
//! - [`LocalTarget`] - in-process automation target over any `FieldPort`

pub mod coordinator;
pub mod engine;
pub mod error;
pub mod executor;
pub mod notifier;
pub mod options;
pub mod recovery;
pub mod scheduler;
pub mod target;

pub use coordinator::AutofillCoordinator;
pub use engine::{FormEngine, ScanTrigger};
pub use error::{COMMUNICATION_FAILURE_MESSAGE, RecoveryError};
pub use executor::FillExecutor;
pub use notifier::{ChannelNotifier, TracingNotifier};
pub use options::{EngineOptions, FillOptions, RecoveryOptions};
pub use recovery::RecoveryOrchestrator;
pub use scheduler::{Debouncer, MutationSignal, RescanScheduler};
pub use target::LocalTarget;

pub use tokio_util::sync::CancellationToken;
