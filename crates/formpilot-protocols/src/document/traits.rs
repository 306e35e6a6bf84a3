//! Document port traits.

use super::types::{ComputedStyle, ElementId, FileHandle, FillFeedback, InputEvent};
use crate::error::PortError;

/// Read-only view of the automation target's element tree.
///
/// Lookups on an id that is no longer attached return `None`/empty values
/// rather than failing; the engine treats such elements as not fillable.
pub trait DocumentTree: Send + Sync {
    /// All elements, in document order.
    fn elements(&self) -> Vec<ElementId>;

    /// Lowercase tag name.
    fn tag_name(&self, element: ElementId) -> Option<String>;

    /// Raw attribute value. Boolean attributes report `Some("")`.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Preceding sibling elements, nearest first.
    fn previous_siblings(&self, element: ElementId) -> Vec<ElementId>;

    /// Concatenated descendant text, whitespace-collapsed.
    fn text_content(&self, element: ElementId) -> String;

    fn computed_style(&self, element: ElementId) -> ComputedStyle;

    /// Text of the label associated with the element, either by `for=` or by
    /// being wrapped in a `<label>`.
    fn label_text(&self, element: ElementId) -> Option<String>;

    /// Current value of a form control.
    fn value(&self, element: ElementId) -> Option<String>;

    /// Names of the files currently selected in a file input.
    fn file_names(&self, element: ElementId) -> Vec<String>;

    /// Visible text of a select's chosen option.
    fn selected_text(&self, _element: ElementId) -> Option<String> {
        None
    }

    fn has_attribute(&self, element: ElementId, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    fn is_disabled(&self, element: ElementId) -> bool {
        self.has_attribute(element, "disabled")
    }

    fn is_read_only(&self, element: ElementId) -> bool {
        self.has_attribute(element, "readonly")
    }

    /// Ancestors, nearest first.
    fn ancestors(&self, element: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut current = self.parent(element);
        while let Some(el) = current {
            out.push(el);
            current = self.parent(el);
        }
        out
    }

    /// Nearest ancestor with the given tag.
    fn closest(&self, element: ElementId, tag: &str) -> Option<ElementId> {
        self.ancestors(element)
            .into_iter()
            .find(|el| self.tag_name(*el).as_deref() == Some(tag))
    }
}

/// Write-and-verify port into the automation target.
///
/// Implementations apply writes the way a user agent would; whether the page
/// kept a value is only known by reading it back through [`DocumentTree::value`].
pub trait FieldPort: DocumentTree {
    fn focus(&mut self, element: ElementId) -> Result<(), PortError>;

    fn blur(&mut self, element: ElementId) -> Result<(), PortError>;

    fn set_value(&mut self, element: ElementId, value: &str) -> Result<(), PortError>;

    fn dispatch(&mut self, element: ElementId, event: InputEvent) -> Result<(), PortError>;

    /// Replace the element's file list.
    fn set_files(&mut self, element: ElementId, files: Vec<FileHandle>) -> Result<(), PortError>;

    fn show_feedback(&mut self, element: ElementId, feedback: FillFeedback)
        -> Result<(), PortError>;
}
