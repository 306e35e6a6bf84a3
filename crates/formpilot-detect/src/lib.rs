//! # Formpilot Detect
//!
//! Finds the real, fillable fields of an unknown document and classifies each
//! one to a profile attribute.
//!
//! The pipeline is `inventory` → `fillability` → `classifier` (plus `upload`
//! for file-selection elements), wrapped by [`FormScanner`] which produces an
//! immutable [`ScanSnapshot`]. Every heuristic reads its vocabulary from
//! [`ClassifierTables`], so the classifier is a pure function of the
//! candidate and the tables.

pub mod candidate;
pub mod classifier;
pub mod error;
pub mod fillability;
pub mod inventory;
pub mod resolve;
pub mod scan;
pub mod tables;
pub mod upload;

mod text;

pub use candidate::{CandidateElement, TextCaps};
pub use classifier::{Classification, FieldClassifier, Scored};
pub use error::{DetectError, Incompatibility};
pub use fillability::{NotFillable, check_fillable, is_fillable};
pub use inventory::ElementInventory;
pub use resolve::{profile_path, resolve_value};
pub use scan::{FormScanner, ScanOptions, ScanSnapshot};
pub use tables::ClassifierTables;
pub use upload::{UploadClassifier, check_compatibility};
