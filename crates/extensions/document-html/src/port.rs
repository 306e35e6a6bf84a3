//! Write side of the HTML snapshot document.

use tracing::debug;

use formpilot_protocols::{
    DocumentTree, ElementId, FieldPort, FileHandle, FillFeedback, InputEvent, PortError,
};

use crate::dom::{DispatchedEvent, HtmlDocument};

impl HtmlDocument {
    fn require_live(&self, element: ElementId) -> Result<(), PortError> {
        match self.live(element) {
            Some(_) => Ok(()),
            None => Err(PortError::ElementGone(element)),
        }
    }

    /// Resolve a requested select value to the value of a matching option.
    fn match_option(&self, select: ElementId, requested: &str) -> Option<String> {
        let requested = requested.trim();
        self.options(select.0)
            .into_iter()
            .find(|(_, value, text)| {
                value.eq_ignore_ascii_case(requested) || text.eq_ignore_ascii_case(requested)
            })
            .map(|(_, value, _)| value)
    }
}

impl FieldPort for HtmlDocument {
    fn focus(&mut self, element: ElementId) -> Result<(), PortError> {
        self.require_live(element)?;
        self.focused = Some(element);
        Ok(())
    }

    fn blur(&mut self, element: ElementId) -> Result<(), PortError> {
        self.require_live(element)?;
        if self.focused == Some(element) {
            self.focused = None;
        }
        Ok(())
    }

    fn set_value(&mut self, element: ElementId, value: &str) -> Result<(), PortError> {
        self.require_live(element)?;
        if self.is_read_only(element) || self.is_disabled(element) {
            return Err(PortError::Rejected {
                element,
                reason: "element is read-only or disabled".to_string(),
            });
        }

        let tag = self.tag_name(element).unwrap_or_default();
        let next = match tag.as_str() {
            "select" => match self.match_option(element, value) {
                Some(option) => option,
                None => {
                    debug!("No option matching {:?} in select {}", value, element);
                    return Ok(());
                }
            },
            "input" | "textarea" => {
                let max_length = self
                    .attribute(element, "maxlength")
                    .and_then(|m| m.trim().parse::<usize>().ok());
                match max_length {
                    Some(max) => value.chars().take(max).collect(),
                    None => value.to_string(),
                }
            }
            _ => {
                return Err(PortError::Unsupported {
                    element,
                    operation: "set_value".to_string(),
                });
            }
        };

        if let Some(data) = self.element_data_mut(element.0) {
            if !data.value_locked {
                data.value = next;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, element: ElementId, event: InputEvent) -> Result<(), PortError> {
        self.require_live(element)?;
        self.events.push(DispatchedEvent { element, event });
        Ok(())
    }

    fn set_files(&mut self, element: ElementId, files: Vec<FileHandle>) -> Result<(), PortError> {
        self.require_live(element)?;
        let is_file_input = self.tag_name(element).as_deref() == Some("input")
            && self
                .attribute(element, "type")
                .is_some_and(|t| t.eq_ignore_ascii_case("file"));
        if !is_file_input {
            return Err(PortError::Unsupported {
                element,
                operation: "set_files".to_string(),
            });
        }
        let multiple = self.has_attribute(element, "multiple");
        if let Some(data) = self.element_data_mut(element.0) {
            // A locked file input still accepts being cleared.
            if data.value_locked && !files.is_empty() {
                return Ok(());
            }
            data.files = files
                .into_iter()
                .take(if multiple { usize::MAX } else { 1 })
                .map(|f| f.name)
                .collect();
        }
        Ok(())
    }

    fn show_feedback(
        &mut self,
        element: ElementId,
        feedback: FillFeedback,
    ) -> Result<(), PortError> {
        self.require_live(element)?;
        let marker = match feedback {
            FillFeedback::Success => "success",
            FillFeedback::Failure => "failure",
        };
        self.set_attribute(element, "data-formpilot-fill", marker);
        if let Some(data) = self.element_data_mut(element.0) {
            data.feedback = Some(feedback);
        }
        Ok(())
    }
}
