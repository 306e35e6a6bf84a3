//! Errors raised by document port implementations.

use thiserror::Error;

use crate::document::ElementId;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("Element {0} is no longer attached to the document")]
    ElementGone(ElementId),

    #[error("Element {element} rejected the write: {reason}")]
    Rejected { element: ElementId, reason: String },

    #[error("Operation not supported on element {element}: {operation}")]
    Unsupported {
        element: ElementId,
        operation: String,
    },

    #[error("Port error: {0}")]
    Custom(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_element_gone() {
        let err = PortError::ElementGone(ElementId(7));
        assert!(err.to_string().contains("no longer attached"));
        assert!(err.to_string().contains("#7"));
    }

    #[test]
    fn test_port_error_rejected() {
        let err = PortError::Rejected {
            element: ElementId(3),
            reason: "read-only".to_string(),
        };
        assert!(err.to_string().contains("rejected"));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn test_port_error_unsupported() {
        let err = PortError::Unsupported {
            element: ElementId(1),
            operation: "set_files".to_string(),
        };
        assert!(err.to_string().contains("set_files"));
    }
}
