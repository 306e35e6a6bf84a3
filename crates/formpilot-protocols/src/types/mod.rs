//! Core data model types.

mod field;
mod policy;
mod profile;
mod run;

pub use field::*;
pub use policy::*;
pub use profile::*;
pub use run::*;
