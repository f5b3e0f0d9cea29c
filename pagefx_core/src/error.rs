//! Error types for host-driven engine operations.
//!
//! Only structurally invalid input from the host is an error: referencing
//! a node that does not exist, or handing a field event to something that
//! is not a field. Clicks that land on elements no behavior is bound to
//! are ordinary no-ops, not errors.

use crate::dom::NodeId;
use thiserror::Error;

/// Errors raised while building a document or dispatching host events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The node id was never allocated by this document.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The node existed but has since been removed from the document.
    #[error("node {0} was removed from the document")]
    DetachedNode(NodeId),

    /// A field event targeted a node without a field control.
    #[error("node {0} is not a form field")]
    NotAField(NodeId),

    /// A submit event targeted a node that is not a form.
    #[error("node {0} is not a form")]
    NotAForm(NodeId),

    /// An element id used in a node spec resolves to nothing.
    #[error("no element with id \"{0}\"")]
    UnknownElementId(String),

    /// Two nodes in one document claim the same element id.
    #[error("duplicate element id \"{0}\"")]
    DuplicateElementId(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeId;

    #[test]
    fn test_unknown_node_display() {
        let err = EngineError::UnknownNode(NodeId::from_index(7));
        assert!(err.to_string().contains("unknown node"));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_element_id_display() {
        let err = EngineError::UnknownElementId("navMenu".to_string());
        assert!(err.to_string().contains("navMenu"));

        let err = EngineError::DuplicateElementId("hamburger".to_string());
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_field_errors_display() {
        let err = EngineError::NotAField(NodeId::from_index(3));
        assert!(err.to_string().contains("not a form field"));

        let err = EngineError::NotAForm(NodeId::from_index(4));
        assert!(err.to_string().contains("not a form"));
    }
}
