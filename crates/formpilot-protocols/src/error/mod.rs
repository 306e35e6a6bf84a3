//! Error types for the formpilot protocol layer.

mod port;
mod store;
mod target;

pub use port::*;
pub use store::*;
pub use target::*;
