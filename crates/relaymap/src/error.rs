//! Error types for Relaymap operations.
//!
//! [`GraphError`] covers every way an input graph or configuration can be
//! rejected. All of them are raised before the first simulation tick; once a
//! simulation starts it cannot fail. [`RelaymapError`] wraps those together
//! with the I/O and decoding failures of the document-level API.

use std::io;

use thiserror::Error;

/// Structural problems detected while building a simulation.
///
/// These errors are deterministic: the same input always fails the same way,
/// so there is nothing to retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("link {link_index} references unknown node `{missing_id}`")]
    UnknownNodeReference {
        link_index: usize,
        missing_id: String,
    },

    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(String),

    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    #[error("link {link_index} has invalid weight {weight} (expected a finite, non-negative number)")]
    InvalidLinkWeight { link_index: usize, weight: f64 },

    #[error("node `{id}` must specify both `x` and `y` or neither")]
    MismatchedPosition { id: String },

    #[error("node `{id}` has a non-finite position")]
    InvalidPosition { id: String },

    #[error("node `{id}` has invalid degree {degree} (expected a finite, non-negative number)")]
    InvalidDegree { id: String, degree: f64 },
}

impl GraphError {
    /// Shorthand for a [`GraphError::InvalidConfiguration`] error.
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

/// The main error type for Relaymap document-level operations.
#[derive(Debug, Error)]
pub enum RelaymapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_reference_message_names_id() {
        let err = GraphError::UnknownNodeReference {
            link_index: 3,
            missing_id: "EXT-ABC".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("link 3"));
        assert!(message.contains("EXT-ABC"));
    }

    #[test]
    fn test_graph_error_wraps_into_relaymap_error() {
        let err: RelaymapError = GraphError::DuplicateNodeId("a".to_string()).into();
        assert!(matches!(
            err,
            RelaymapError::Graph(GraphError::DuplicateNodeId(ref id)) if id == "a"
        ));
    }
}
