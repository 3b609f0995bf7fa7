use crate::graph::{EdgeId, EdgeKind, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Graph element a validation outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRef {
    Node(NodeId),
    Edge(EdgeId),
    /// An edge proposed by the editor but not yet committed.
    Candidate {
        source: NodeId,
        kind: EdgeKind,
        target: NodeId,
    },
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Node(id) => write!(f, "{}", id),
            ElementRef::Edge(id) => write!(f, "{}", id),
            ElementRef::Candidate {
                source,
                kind,
                target,
            } => write!(f, "{} -{}-> {}", source, kind, target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Valid,
    Invalid,
}

/// Outcome of validating one element (or a whole diagram) against a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    element: Option<ElementRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rule: Option<String>,
}

impl ValidationResult {
    pub fn valid(element: Option<ElementRef>) -> Self {
        Self {
            verdict: Verdict::Valid,
            message: None,
            element,
            rule: None,
        }
    }

    /// A rule rejected `element`.
    pub fn invalid(
        element: Option<ElementRef>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            verdict: Verdict::Invalid,
            message: Some(message.into()),
            element,
            rule: Some(rule.into()),
        }
    }

    /// The engine could not evaluate `element`; no rule fired.
    pub fn internal(element: Option<ElementRef>, message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Invalid,
            message: Some(message.into()),
            element,
            rule: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.verdict == Verdict::Valid
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn element(&self) -> Option<ElementRef> {
        self.element
    }

    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.verdict, &self.message) {
            (Verdict::Valid, _) => write!(f, "valid"),
            (Verdict::Invalid, Some(message)) => write!(f, "invalid: {}", message),
            (Verdict::Invalid, None) => write!(f, "invalid"),
        }
    }
}
