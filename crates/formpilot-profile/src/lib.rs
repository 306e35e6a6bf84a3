//! # Formpilot Profile
//!
//! Reconciles machine-extracted profile data with the stored profile, and
//! provides the storage collaborators the engine reads profiles and CVs from.
//!
//! Merging never touches storage: [`merge`] returns a new record and the
//! caller decides whether to persist it.

pub mod compare;
pub mod merge;
pub mod skills;
pub mod store;
pub mod validation;

pub use compare::{ValueKind, choose_better_value};
pub use merge::{FieldChange, MergeOutcome, merge, merge_at};
pub use skills::merge_skills;
pub use store::{FileProfileStore, MemoryProfileStore};
pub use validation::{is_valid_email, is_valid_phone};
