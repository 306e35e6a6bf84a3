//! HTML snapshot document for formpilot.
//!
//! Parses an HTML page into an arena DOM that implements both
//! [`DocumentTree`](formpilot_protocols::DocumentTree) and
//! [`FieldPort`](formpilot_protocols::FieldPort). Writes are applied the way a
//! browser would apply them (`maxlength` truncation, select options that must
//! exist, read-only controls), so the fill executor's verification has
//! something real to check. Every dispatched event is logged.
//!
//! Rendering follows inline styles only: `display:none`, `visibility:hidden`,
//! `opacity`, the `hidden` attribute and `type="hidden"`.

mod dom;
mod port;
mod style;

pub use dom::{DispatchedEvent, HtmlDocument};

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
