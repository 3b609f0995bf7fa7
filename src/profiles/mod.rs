//! Profile validation engine
//!
//! A [`Profile`] is an ordered registry of node rules and edge rules. Each rule
//! inspects one element and either stays silent or raises a [`ProfileError`].
//! Evaluation is fail-fast: the first rule that raises determines the
//! [`ValidationResult`], so registration order is part of the contract.
//!
//! ## Usage
//! ```rust
//! use graphol_profiles::graph::{Diagram, EdgeKind, NodeKind};
//! use graphol_profiles::profiles::Profile;
//!
//! let mut diagram = Diagram::new();
//! let c1 = diagram.add_node(NodeKind::Concept, "test:C1");
//! let r1 = diagram.add_node(NodeKind::Role, "test:R1");
//!
//! let profile = Profile::owl2_ql();
//! let result = profile.validate_edge(&diagram, c1, EdgeKind::Inclusion, r1);
//! assert!(!result.is_valid());
//! assert_eq!(
//!     result.message(),
//!     Some("Type mismatch: inclusion between Concept and Role")
//! );
//! ```

mod result;
pub mod rules;

use crate::error::{EngineError, ProfileError};
use crate::graph::{Diagram, Edge, EdgeId, EdgeKind, Node, NodeId};
use crate::logging::validation_span;

pub use crate::owl::OwlProfile as ProfileKind;
pub use result::{ElementRef, ValidationResult, Verdict};

// =============================================================================
// RULE TRAITS
// =============================================================================

/// A rule over a single node.
pub trait NodeRule: Send + Sync {
    /// Stable rule identifier, reported in [`ValidationResult::rule`].
    fn name(&self) -> &'static str;

    fn check(&self, diagram: &Diagram, node: &Node) -> Result<(), ProfileError>;
}

/// A rule over an edge, committed or proposed.
pub trait EdgeRule: Send + Sync {
    /// Stable rule identifier, reported in [`ValidationResult::rule`].
    fn name(&self) -> &'static str;

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError>;
}

/// The edge under validation.
///
/// For committed edges `id` is set and neighbourhood queries made on behalf of
/// the edge must skip it, otherwise "too many inputs" style checks would count
/// the edge against itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub kind: EdgeKind,
    pub source: NodeId,
    pub target: NodeId,
    pub id: Option<EdgeId>,
}

impl Candidate {
    pub fn proposed(kind: EdgeKind, source: NodeId, target: NodeId) -> Self {
        Self {
            kind,
            source,
            target,
            id: None,
        }
    }

    pub fn committed(edge: &Edge) -> Self {
        Self {
            kind: edge.kind(),
            source: edge.source(),
            target: edge.target(),
            id: Some(edge.id()),
        }
    }

    /// True when `other` is a distinct diagram edge of kind `kind`.
    pub fn sees(&self, other: &Edge, kind: EdgeKind) -> bool {
        other.kind() == kind && Some(other.id()) != self.id
    }

    pub fn element(&self) -> ElementRef {
        match self.id {
            Some(id) => ElementRef::Edge(id),
            None => ElementRef::Candidate {
                source: self.source,
                kind: self.kind,
                target: self.target,
            },
        }
    }
}

// =============================================================================
// PROFILE
// =============================================================================

pub struct Profile {
    kind: ProfileKind,
    node_rules: Vec<Box<dyn NodeRule>>,
    edge_rules: Vec<Box<dyn EdgeRule>>,
}

impl Profile {
    pub fn new(
        kind: ProfileKind,
        node_rules: Vec<Box<dyn NodeRule>>,
        edge_rules: Vec<Box<dyn EdgeRule>>,
    ) -> Self {
        tracing::debug!(
            profile = %kind,
            node_rules = node_rules.len(),
            edge_rules = edge_rules.len(),
            "profile constructed"
        );
        Self {
            kind,
            node_rules,
            edge_rules,
        }
    }

    /// Base OWL 2 profile: Graphol typing rules only.
    pub fn owl2() -> Self {
        Self::new(ProfileKind::Owl2, Vec::new(), rules::owl2::edge_rules())
    }

    /// OWL 2 QL profile: base typing rules followed by the QL restrictions.
    pub fn owl2_ql() -> Self {
        let mut edge_rules = rules::owl2::edge_rules();
        edge_rules.extend(rules::owl2ql::edge_rules());
        Self::new(ProfileKind::Owl2Ql, rules::owl2ql::node_rules(), edge_rules)
    }

    pub fn from_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Owl2 => Self::owl2(),
            ProfileKind::Owl2Ql => Self::owl2_ql(),
        }
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    /// Display name, e.g. "OWL 2 QL".
    pub fn name(&self) -> &'static str {
        self.kind.into()
    }

    pub fn node_rule_names(&self) -> Vec<&'static str> {
        self.node_rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn edge_rule_names(&self) -> Vec<&'static str> {
        self.edge_rules.iter().map(|rule| rule.name()).collect()
    }

    /// Validates an edge the editor proposes to insert.
    pub fn validate_edge(
        &self,
        diagram: &Diagram,
        source: NodeId,
        kind: EdgeKind,
        target: NodeId,
    ) -> ValidationResult {
        let span = validation_span(self.name(), "validate_edge");
        let _enter = span.enter();
        self.check_edge(diagram, &Candidate::proposed(kind, source, target))
    }

    /// Re-validates an edge already present in the diagram.
    pub fn validate_committed_edge(&self, diagram: &Diagram, edge: EdgeId) -> ValidationResult {
        let span = validation_span(self.name(), "validate_committed_edge");
        let _enter = span.enter();
        match diagram.edge(edge) {
            Ok(edge) => self.check_edge(diagram, &Candidate::committed(edge)),
            Err(err) => self.internal_error(ElementRef::Edge(edge), err),
        }
    }

    /// Validates a node after the editor changed it, then re-validates every
    /// committed edge touching it: a new datatype or label can break structure
    /// that was valid before.
    pub fn validate_node(&self, diagram: &Diagram, node: NodeId) -> ValidationResult {
        let span = validation_span(self.name(), "validate_node");
        let _enter = span.enter();
        let node = match diagram.node(node) {
            Ok(node) => node,
            Err(err) => return self.internal_error(ElementRef::Node(node), err),
        };
        let result = self.check_node(diagram, node);
        if !result.is_valid() {
            return result;
        }
        for edge in diagram.incident_edges(node.id()) {
            let incident = self.check_edge(diagram, &Candidate::committed(edge));
            if !incident.is_valid() {
                return incident;
            }
        }
        result
    }

    /// Node rules over every node, then edge rules over every edge, both in
    /// insertion order. The first violation wins.
    pub fn validate_diagram(&self, diagram: &Diagram) -> ValidationResult {
        let span = validation_span(self.name(), "validate_diagram");
        let _enter = span.enter();
        for node in diagram.nodes() {
            let result = self.check_node(diagram, node);
            if !result.is_valid() {
                return result;
            }
        }
        for edge in diagram.edges() {
            let result = self.check_edge(diagram, &Candidate::committed(edge));
            if !result.is_valid() {
                return result;
            }
        }
        tracing::debug!(
            nodes = diagram.node_count(),
            edges = diagram.edge_count(),
            "diagram valid"
        );
        ValidationResult::valid(None)
    }

    fn check_node(&self, diagram: &Diagram, node: &Node) -> ValidationResult {
        let element = ElementRef::Node(node.id());
        for rule in &self.node_rules {
            if let Err(err) = rule.check(diagram, node) {
                return self.rejected(element, rule.name(), err);
            }
        }
        tracing::trace!(%element, "node valid");
        ValidationResult::valid(Some(element))
    }

    fn check_edge(&self, diagram: &Diagram, candidate: &Candidate) -> ValidationResult {
        let element = candidate.element();
        let (source, target) = match (diagram.node(candidate.source), diagram.node(candidate.target))
        {
            (Ok(source), Ok(target)) => (source, target),
            (Err(err), _) | (_, Err(err)) => return self.internal_error(element, err),
        };
        for rule in &self.edge_rules {
            if let Err(err) = rule.check(diagram, source, candidate, target) {
                return self.rejected(element, rule.name(), err);
            }
        }
        tracing::trace!(%element, "edge valid");
        ValidationResult::valid(Some(element))
    }

    fn rejected(&self, element: ElementRef, rule: &str, err: ProfileError) -> ValidationResult {
        tracing::debug!(%element, rule, message = err.message(), "element rejected");
        ValidationResult::invalid(Some(element), rule, err.into_message())
    }

    fn internal_error(&self, element: ElementRef, err: EngineError) -> ValidationResult {
        tracing::error!(%element, error = %err, profile = self.name(), "validation aborted");
        ValidationResult::internal(Some(element), format!("Internal validation error: {}", err))
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("kind", &self.kind)
            .field("node_rules", &self.node_rule_names())
            .field("edge_rules", &self.edge_rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    #[test]
    fn test_profile_names() {
        assert_eq!(Profile::owl2().name(), "OWL 2");
        assert_eq!(Profile::owl2_ql().name(), "OWL 2 QL");
        assert_eq!(Profile::from_kind(ProfileKind::Owl2Ql).kind(), ProfileKind::Owl2Ql);
    }

    #[test]
    fn test_ql_registers_base_rules_first() {
        let base = Profile::owl2().edge_rule_names();
        let ql = Profile::owl2_ql().edge_rule_names();
        assert!(Profile::owl2().node_rule_names().is_empty());
        assert_eq!(&ql[..base.len()], &base[..]);
        assert_eq!(ql[base.len()], "UnsupportedIndividualEquality");
    }

    #[test]
    fn test_unknown_node_is_reported_not_passed() {
        let mut diagram = Diagram::new();
        let c1 = diagram.add_node(NodeKind::Concept, "test:C1");
        let missing = NodeId::new(99);
        let result = Profile::owl2_ql().validate_edge(&diagram, c1, EdgeKind::Inclusion, missing);
        assert!(!result.is_valid());
        assert_eq!(result.rule(), None);
        assert_eq!(
            result.message(),
            Some("Internal validation error: node n99 does not exist in the diagram")
        );
    }

    #[test]
    fn test_committed_edge_element_is_edge_id() {
        let mut diagram = Diagram::new();
        let c1 = diagram.add_node(NodeKind::Concept, "test:C1");
        let c2 = diagram.add_node(NodeKind::Concept, "test:C2");
        let edge = diagram.add_edge(EdgeKind::Inclusion, c1, c2).unwrap();
        let result = Profile::owl2_ql().validate_committed_edge(&diagram, edge);
        assert!(result.is_valid());
        assert_eq!(result.element(), Some(ElementRef::Edge(edge)));
    }
}
