//! Document port definitions.
//!
//! The engine never owns the elements it inspects. It holds [`ElementId`]s,
//! plain structural references handed out by whatever hosts the document, and
//! talks to the host through [`DocumentTree`] (reads) and [`FieldPort`] (writes).

mod traits;
mod types;

pub use traits::{DocumentTree, FieldPort};
pub use types::{ComputedStyle, ElementId, FileHandle, FillFeedback, InputEvent};

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
