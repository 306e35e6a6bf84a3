//! Value types shared by document ports.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Structural reference to one element of the automation target.
///
/// Copyable and compared by identity. An id never keeps its element alive; a
/// port answers [`PortError::ElementGone`](crate::error::PortError::ElementGone)
/// once the element has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Effective rendering state of an element (inherited values already applied).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: f64,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "inline".to_string(),
            visibility: "visible".to_string(),
            opacity: 1.0,
        }
    }
}

impl ComputedStyle {
    /// Whether the element is actually rendered to the user.
    pub fn is_rendered(&self) -> bool {
        self.display != "none" && self.visibility != "hidden" && self.opacity > 0.0
    }
}

/// Synthetic interaction events dispatched after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputEvent {
    Focus,
    KeyDown,
    KeyUp,
    Input,
    Change,
    Blur,
}

impl InputEvent {
    /// DOM event type name.
    pub fn name(&self) -> &'static str {
        match self {
            InputEvent::Focus => "focus",
            InputEvent::KeyDown => "keydown",
            InputEvent::KeyUp => "keyup",
            InputEvent::Input => "input",
            InputEvent::Change => "change",
            InputEvent::Blur => "blur",
        }
    }
}

/// Visible marker left on an element after a fill attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillFeedback {
    Success,
    Failure,
}

/// A transferable file built from stored bytes, ready to be placed in a
/// file-selection element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
    /// Milliseconds since the Unix epoch.
    pub last_modified: i64,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
            last_modified: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}
