#![allow(dead_code)]

use graphol_profiles::graph::{Diagram, EdgeId, EdgeKind, Identity, NodeId, NodeKind};
use graphol_profiles::owl::{Datatype, Facet, Restriction};
use graphol_profiles::profiles::ValidationResult;

/// Thin builder over [`Diagram`] for rule fixtures.
#[derive(Default)]
pub struct DiagramBuilder {
    pub diagram: Diagram,
}

impl DiagramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, kind: NodeKind, text: &str) -> NodeId {
        self.diagram.add_node(kind, text)
    }

    /// Adds an operator node with an explicit identity.
    pub fn operator(&mut self, kind: NodeKind, identity: Identity) -> NodeId {
        let id = self.diagram.add_node(kind, "");
        self.identify(id, identity);
        id
    }

    pub fn concept(&mut self, label: &str) -> NodeId {
        self.node(NodeKind::Concept, label)
    }

    pub fn role(&mut self, label: &str) -> NodeId {
        self.node(NodeKind::Role, label)
    }

    pub fn attribute(&mut self, label: &str) -> NodeId {
        self.node(NodeKind::Attribute, label)
    }

    pub fn value_domain(&mut self, datatype: Datatype) -> NodeId {
        self.node(NodeKind::ValueDomain, &datatype.to_string())
    }

    pub fn individual(&mut self, label: &str) -> NodeId {
        self.node(NodeKind::Individual, label)
    }

    pub fn literal(&mut self, value: &str, datatype: Datatype) -> NodeId {
        self.node(NodeKind::Individual, &format!("\"{}\"^^{}", value, datatype))
    }

    pub fn facet(&mut self, facet: Facet, value: &str) -> NodeId {
        let id = self.node(NodeKind::Facet, "");
        self.diagram
            .node_mut(id)
            .expect("facet node")
            .set_facet(facet, value);
        id
    }

    pub fn restriction(&mut self, kind: NodeKind, restriction: Restriction) -> NodeId {
        let id = self.node(kind, "");
        self.diagram
            .node_mut(id)
            .expect("restriction node")
            .set_restriction(restriction);
        id
    }

    pub fn identify(&mut self, id: NodeId, identity: Identity) {
        self.diagram
            .node_mut(id)
            .expect("node exists")
            .set_identity(identity);
    }

    pub fn connect(&mut self, kind: EdgeKind, source: NodeId, target: NodeId) -> EdgeId {
        self.diagram
            .add_edge(kind, source, target)
            .expect("endpoints exist")
    }

    pub fn input(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        self.connect(EdgeKind::Input, source, target)
    }
}

#[track_caller]
pub fn assert_rejected(result: &ValidationResult, message: &str) {
    assert!(!result.is_valid(), "expected rejection with '{}'", message);
    assert_eq!(result.message(), Some(message));
}

#[track_caller]
pub fn assert_accepted(result: &ValidationResult) {
    assert!(
        result.is_valid(),
        "expected acceptance, got '{}' from {:?}",
        result,
        result.rule()
    );
}
