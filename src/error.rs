//! Error types for the profile validation engine
//!
//! Two families of failure exist:
//! - [`ProfileError`]: a rule rejected a graph element. This is an expected
//!   outcome and is folded into a [`ValidationResult`](crate::profiles::ValidationResult).
//! - [`EngineError`]: the engine could not evaluate at all (unknown element,
//!   malformed diagram, bad configuration).

use crate::graph::{EdgeId, NodeId};
use thiserror::Error;

// =============================================================================
// RULE VIOLATIONS
// =============================================================================

/// Raised by a single profile rule when the element under inspection is not
/// admitted by the profile grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProfileError {
    message: String,
}

impl ProfileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

// =============================================================================
// ENGINE FAILURES
// =============================================================================

/// Failures unrelated to the profile grammar.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("node {0} does not exist in the diagram")]
    UnknownNode(NodeId),

    #[error("edge {0} does not exist in the diagram")]
    UnknownEdge(EdgeId),

    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },

    #[error("snapshot id {0} leaves no room for further ids")]
    IdSpaceExhausted(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
