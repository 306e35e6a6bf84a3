//! # Formpilot Protocols
//!
//! Shared data model and port definitions for the formpilot autofill engine.
//! Contains only types and interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`DocumentTree`] - Read-only view of an automation target's element tree
//! - [`FieldPort`] - Write-and-verify port into the same tree
//! - [`ProfileStore`] - Persistent profile/CV storage collaborator
//! - [`AutomationTarget`] - Messaging collaborator that runs fills in the target
//! - [`RunNotifier`] - Completion/error notifications for the owning process

pub mod document;
pub mod error;
pub mod messages;
pub mod storage;
pub mod target;
pub mod types;

pub use document::{
    ComputedStyle, DocumentTree, ElementId, FieldPort, FileHandle, FillFeedback, InputEvent,
};
pub use error::{PortError, StoreError, TargetError};
pub use messages::{EngineCommand, EngineEvent, RunNotifier};
pub use storage::{ProfileStore, AUTOFILL_ENABLED_KEY, CV_KEY, PROFILE_KEY};
pub use target::{AutofillRequest, AutomationTarget};
pub use types::*;
