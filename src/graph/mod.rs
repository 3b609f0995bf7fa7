//! In-memory Graphol diagram model
//!
//! Nodes and edges live in insertion-ordered arenas keyed by opaque ids. The
//! validation engine only reads a [`Diagram`]; mutation is the editor's job.
//!
//! Neighbourhood queries take an edge predicate and a node predicate, so a
//! rule can express "incoming Input edges from Individual nodes, except the
//! edge being re-validated" in one call.

pub mod traversal;

use crate::error::{EngineError, EngineResult};
use crate::owl::{Datatype, Facet, Restriction, Special};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use strum::{Display, EnumIter};

pub use traversal::Traversal;

// =============================================================================
// IDS
// =============================================================================

/// Identifier of a node, unique within a diagram and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Identifier of an edge, unique within a diagram and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EdgeId(u32);

impl EdgeId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

// =============================================================================
// NODE AND EDGE KINDS
// =============================================================================

/// Closed set of Graphol node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Concept,
    Role,
    Attribute,
    ValueDomain,
    Individual,
    Union,
    DisjointUnion,
    Intersection,
    Complement,
    Enumeration,
    DatatypeRestriction,
    Facet,
    RoleChain,
    RoleInverse,
    DomainRestriction,
    RangeRestriction,
    PropertyAssertion,
}

impl NodeKind {
    /// User-facing name used in diagnostics.
    pub fn short_name(self) -> &'static str {
        match self {
            NodeKind::Concept => "concept node",
            NodeKind::Role => "role node",
            NodeKind::Attribute => "attribute node",
            NodeKind::ValueDomain => "value domain node",
            NodeKind::Individual => "individual node",
            NodeKind::Union => "union node",
            NodeKind::DisjointUnion => "disjoint union node",
            NodeKind::Intersection => "intersection node",
            NodeKind::Complement => "complement node",
            NodeKind::Enumeration => "enumeration node",
            NodeKind::DatatypeRestriction => "datatype restriction node",
            NodeKind::Facet => "facet node",
            NodeKind::RoleChain => "role chain node",
            NodeKind::RoleInverse => "role inverse node",
            NodeKind::DomainRestriction => "domain restriction node",
            NodeKind::RangeRestriction => "range restriction node",
            NodeKind::PropertyAssertion => "property assertion node",
        }
    }

    /// Short name without the trailing "node", e.g. "disjoint union".
    pub fn operator_name(self) -> &'static str {
        let name = self.short_name();
        name.strip_suffix(" node").unwrap_or(name)
    }

    /// Nodes that accept Input edges.
    pub fn is_constructor(self) -> bool {
        matches!(
            self,
            NodeKind::Union
                | NodeKind::DisjointUnion
                | NodeKind::Intersection
                | NodeKind::Complement
                | NodeKind::Enumeration
                | NodeKind::DatatypeRestriction
                | NodeKind::RoleChain
                | NodeKind::RoleInverse
                | NodeKind::DomainRestriction
                | NodeKind::RangeRestriction
                | NodeKind::PropertyAssertion
        )
    }

    pub fn is_restriction(self) -> bool {
        matches!(self, NodeKind::DomainRestriction | NodeKind::RangeRestriction)
    }

    /// Union, disjoint union and intersection.
    pub fn is_boolean_operator(self) -> bool {
        matches!(
            self,
            NodeKind::Union | NodeKind::DisjointUnion | NodeKind::Intersection
        )
    }
}

/// Semantic category a node currently denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    Concept,
    Role,
    Attribute,
    ValueDomain,
    Individual,
    Value,
    RoleInstance,
    AttributeInstance,
    Facet,
    Neutral,
    Unknown,
}

impl Identity {
    /// Derives the identity a freshly inserted node denotes before the editor
    /// runs identification over its neighbourhood.
    pub fn derive(kind: NodeKind, text: &str) -> Identity {
        match kind {
            NodeKind::Concept | NodeKind::DomainRestriction | NodeKind::RangeRestriction => {
                Identity::Concept
            }
            NodeKind::Role | NodeKind::RoleInverse | NodeKind::RoleChain => Identity::Role,
            NodeKind::Attribute => Identity::Attribute,
            NodeKind::ValueDomain | NodeKind::DatatypeRestriction => Identity::ValueDomain,
            NodeKind::Individual if is_literal(text) => Identity::Value,
            NodeKind::Individual => Identity::Individual,
            NodeKind::Facet => Identity::Facet,
            NodeKind::Union
            | NodeKind::DisjointUnion
            | NodeKind::Intersection
            | NodeKind::Complement
            | NodeKind::Enumeration
            | NodeKind::PropertyAssertion => Identity::Neutral,
        }
    }

    /// Concept, Role, Attribute or Value Domain.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Identity::Concept | Identity::Role | Identity::Attribute | Identity::ValueDomain
        )
    }

    /// Neutral or Unknown: the editor has not settled on a category.
    pub fn is_undetermined(self) -> bool {
        matches!(self, Identity::Neutral | Identity::Unknown)
    }

    /// Role or Attribute.
    pub fn is_property(self) -> bool {
        matches!(self, Identity::Role | Identity::Attribute)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Identity::Concept => "Concept",
            Identity::Role => "Role",
            Identity::Attribute => "Attribute",
            Identity::ValueDomain => "Value Domain",
            Identity::Individual => "Individual",
            Identity::Value => "Value",
            Identity::RoleInstance => "Role Instance",
            Identity::AttributeInstance => "Attribute Instance",
            Identity::Facet => "Facet",
            Identity::Neutral => "Neutral",
            Identity::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

fn is_literal(text: &str) -> bool {
    text.trim_start().starts_with('"')
}

/// Closed set of Graphol edge kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum EdgeKind {
    Inclusion,
    Equivalence,
    Input,
    Membership,
    Same,
    Different,
}

impl EdgeKind {
    /// Inclusion or Equivalence.
    pub fn is_axiom(self) -> bool {
        matches!(self, EdgeKind::Inclusion | EdgeKind::Equivalence)
    }
}

// =============================================================================
// NODES AND EDGES
// =============================================================================

/// Boolean characteristics of Role and Attribute nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyFacets {
    pub functional: bool,
    pub inverse_functional: bool,
    pub transitive: bool,
    pub symmetric: bool,
    pub asymmetric: bool,
    pub reflexive: bool,
    pub irreflexive: bool,
}

/// Constraining facet and literal value held by a Facet node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    pub facet: Facet,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    identity: Identity,
    text: String,
    #[serde(default)]
    facets: PropertyFacets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datatype: Option<Datatype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    facet: Option<FacetValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    restriction: Option<Restriction>,
}

impl Node {
    fn new(id: NodeId, kind: NodeKind, text: String) -> Self {
        let restriction = kind.is_restriction().then(Restriction::default);
        Self {
            id,
            kind,
            identity: Identity::derive(kind, &text),
            text,
            facets: PropertyFacets::default(),
            datatype: None,
            facet: None,
            restriction,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn short_name(&self) -> &'static str {
        self.kind.short_name()
    }

    pub fn facets(&self) -> &PropertyFacets {
        &self.facets
    }

    pub fn is_functional(&self) -> bool {
        self.facets.functional
    }

    pub fn is_inverse_functional(&self) -> bool {
        self.facets.inverse_functional
    }

    pub fn is_transitive(&self) -> bool {
        self.facets.transitive
    }

    /// Explicit datatype, falling back to the label of Value-Domain nodes.
    pub fn datatype(&self) -> Option<Datatype> {
        self.datatype.or_else(|| match self.kind {
            NodeKind::ValueDomain => self.text.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn facet(&self) -> Option<&FacetValue> {
        self.facet.as_ref()
    }

    pub fn restriction(&self) -> Option<Restriction> {
        self.restriction
    }

    pub fn special(&self) -> Option<Special> {
        Special::from_label(&self.text)
    }

    pub fn set_identity(&mut self, identity: Identity) -> &mut Self {
        self.identity = identity;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self
    }

    pub fn set_facets(&mut self, facets: PropertyFacets) -> &mut Self {
        self.facets = facets;
        self
    }

    pub fn set_datatype(&mut self, datatype: Datatype) -> &mut Self {
        self.datatype = Some(datatype);
        self
    }

    pub fn set_facet(&mut self, facet: Facet, value: impl Into<String>) -> &mut Self {
        self.facet = Some(FacetValue {
            facet,
            value: value.into(),
        });
        self
    }

    pub fn set_restriction(&mut self, restriction: Restriction) -> &mut Self {
        self.restriction = Some(restriction);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    id: EdgeId,
    kind: EdgeKind,
    source: NodeId,
    target: NodeId,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Endpoint opposite to `node`. Self loops return `node` itself.
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }
}

// =============================================================================
// DIAGRAM
// =============================================================================

type Incidence = SmallVec<[EdgeId; 4]>;

/// A Graphol diagram: nodes, edges and per-node incidence lists.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
    incidence: IndexMap<NodeId, Incidence>,
    next_node: u32,
    next_edge: u32,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node with the identity derived from its kind and label.
    pub fn add_node(&mut self, kind: NodeKind, text: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(id, Node::new(id, kind, text.into()));
        self.incidence.insert(id, Incidence::new());
        id
    }

    /// Commits an edge between two existing nodes.
    pub fn add_edge(
        &mut self,
        kind: EdgeKind,
        source: NodeId,
        target: NodeId,
    ) -> EngineResult<EdgeId> {
        for endpoint in [source, target] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(EngineError::UnknownNode(endpoint));
            }
        }
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.link(Edge {
            id,
            kind,
            source,
            target,
        });
        Ok(id)
    }

    fn link(&mut self, edge: Edge) {
        if let Some(list) = self.incidence.get_mut(&edge.source) {
            list.push(edge.id);
        }
        if edge.target != edge.source {
            if let Some(list) = self.incidence.get_mut(&edge.target) {
                list.push(edge.id);
            }
        }
        self.edges.insert(edge.id, edge);
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> EngineResult<Edge> {
        let edge = self
            .edges
            .shift_remove(&id)
            .ok_or(EngineError::UnknownEdge(id))?;
        for endpoint in [edge.source, edge.target] {
            if let Some(list) = self.incidence.get_mut(&endpoint) {
                list.retain(|candidate| *candidate != id);
            }
        }
        Ok(edge)
    }

    /// Removes a node together with every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> EngineResult<Node> {
        let incident = self
            .incidence
            .get(&id)
            .cloned()
            .ok_or(EngineError::UnknownNode(id))?;
        for edge in incident {
            self.remove_edge(edge)?;
        }
        self.incidence.shift_remove(&id);
        self.nodes
            .shift_remove(&id)
            .ok_or(EngineError::UnknownNode(id))
    }

    pub fn node(&self, id: NodeId) -> EngineResult<&Node> {
        self.nodes.get(&id).ok_or(EngineError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> EngineResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(EngineError::UnknownNode(id))
    }

    pub fn edge(&self, id: EdgeId) -> EngineResult<&Edge> {
        self.edges.get(&id).ok_or(EngineError::UnknownEdge(id))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Every edge touching `id`, in insertion order.
    pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.incidence
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(move |edge| self.edges.get(edge))
    }

    pub fn incoming_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.incident_edges(id).filter(move |edge| edge.target == id)
    }

    pub fn outgoing_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.incident_edges(id).filter(move |edge| edge.source == id)
    }

    /// Sources of incoming edges accepted by `edge_filter`, kept when
    /// `node_filter` accepts them.
    pub fn incoming_nodes<E, N>(
        &self,
        id: NodeId,
        edge_filter: E,
        node_filter: N,
    ) -> impl Iterator<Item = &Node>
    where
        E: Fn(&Edge) -> bool,
        N: Fn(&Node) -> bool,
    {
        self.incoming_edges(id)
            .filter(move |edge| edge_filter(edge))
            .filter_map(move |edge| self.nodes.get(&edge.source))
            .filter(move |node| node_filter(node))
    }

    /// Targets of outgoing edges accepted by `edge_filter`, kept when
    /// `node_filter` accepts them.
    pub fn outgoing_nodes<E, N>(
        &self,
        id: NodeId,
        edge_filter: E,
        node_filter: N,
    ) -> impl Iterator<Item = &Node>
    where
        E: Fn(&Edge) -> bool,
        N: Fn(&Node) -> bool,
    {
        self.outgoing_edges(id)
            .filter(move |edge| edge_filter(edge))
            .filter_map(move |edge| self.nodes.get(&edge.target))
            .filter(move |node| node_filter(node))
    }

    /// Opposite endpoints of incident edges in either direction.
    pub fn adjacent_nodes<E, N>(
        &self,
        id: NodeId,
        edge_filter: E,
        node_filter: N,
    ) -> impl Iterator<Item = &Node>
    where
        E: Fn(&Edge) -> bool,
        N: Fn(&Node) -> bool,
    {
        self.incident_edges(id)
            .filter(move |edge| edge_filter(edge))
            .filter_map(move |edge| self.nodes.get(&edge.other(id)))
            .filter(move |node| node_filter(node))
    }

    /// True for a Domain/Range restriction (other than Self) with a filler
    /// attached through an Input edge. Top fillers do not qualify.
    pub fn is_restriction_qualified(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        if !node.kind.is_restriction() || node.restriction == Some(Restriction::SelfRestriction) {
            return false;
        }
        self.incoming_nodes(
            id,
            |edge| edge.kind == EdgeKind::Input,
            |filler| {
                matches!(filler.identity, Identity::Concept | Identity::ValueDomain)
                    && !is_top_filler(filler)
            },
        )
        .next()
        .is_some()
    }

    /// Serializable view of the diagram.
    pub fn snapshot(&self) -> DiagramSnapshot {
        DiagramSnapshot {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().copied().collect(),
        }
    }

    /// Rebuilds a diagram from a snapshot, rejecting edges whose endpoints are
    /// missing and ids at the top of the id space.
    pub fn from_snapshot(snapshot: DiagramSnapshot) -> EngineResult<Self> {
        let mut diagram = Diagram::new();
        for node in snapshot.nodes {
            let next = node
                .id
                .0
                .checked_add(1)
                .ok_or_else(|| EngineError::IdSpaceExhausted(node.id.to_string()))?;
            diagram.next_node = diagram.next_node.max(next);
            diagram.incidence.insert(node.id, Incidence::new());
            diagram.nodes.insert(node.id, node);
        }
        for edge in snapshot.edges {
            for endpoint in [edge.source, edge.target] {
                if !diagram.nodes.contains_key(&endpoint) {
                    return Err(EngineError::DanglingEdge {
                        edge: edge.id,
                        node: endpoint,
                    });
                }
            }
            let next = edge
                .id
                .0
                .checked_add(1)
                .ok_or_else(|| EngineError::IdSpaceExhausted(edge.id.to_string()))?;
            diagram.next_edge = diagram.next_edge.max(next);
            diagram.link(edge);
        }
        Ok(diagram)
    }
}

fn is_top_filler(node: &Node) -> bool {
    node.special().is_some_and(Special::is_top)
        || (node.kind == NodeKind::ValueDomain && node.datatype() == Some(Datatype::Literal))
}

/// Plain node and edge lists, the exchange format for stored diagrams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_identity() {
        assert_eq!(Identity::derive(NodeKind::Concept, "test:C1"), Identity::Concept);
        assert_eq!(Identity::derive(NodeKind::RoleChain, ""), Identity::Role);
        assert_eq!(Identity::derive(NodeKind::Individual, "test:i1"), Identity::Individual);
        assert_eq!(
            Identity::derive(NodeKind::Individual, "\"32\"^^xsd:integer"),
            Identity::Value
        );
        assert_eq!(Identity::derive(NodeKind::Union, ""), Identity::Neutral);
        assert_eq!(Identity::derive(NodeKind::Facet, ""), Identity::Facet);
    }

    #[test]
    fn test_identity_display_names() {
        assert_eq!(Identity::ValueDomain.to_string(), "Value Domain");
        assert_eq!(Identity::RoleInstance.to_string(), "Role Instance");
        assert_eq!(EdgeKind::Equivalence.to_string(), "equivalence");
        assert_eq!(NodeKind::DisjointUnion.operator_name(), "disjoint union");
    }

    #[test]
    fn test_add_edge_requires_endpoints() {
        let mut diagram = Diagram::new();
        let c1 = diagram.add_node(NodeKind::Concept, "test:C1");
        let missing = NodeId::new(42);
        assert_matches!(
            diagram.add_edge(EdgeKind::Inclusion, c1, missing),
            Err(EngineError::UnknownNode(id)) if id == missing
        );
    }

    #[test]
    fn test_neighbourhood_queries() {
        let mut diagram = Diagram::new();
        let union = diagram.add_node(NodeKind::Union, "");
        let c1 = diagram.add_node(NodeKind::Concept, "test:C1");
        let c2 = diagram.add_node(NodeKind::Concept, "test:C2");
        let i1 = diagram.add_node(NodeKind::Individual, "test:i1");
        diagram.add_edge(EdgeKind::Input, c1, union).unwrap();
        diagram.add_edge(EdgeKind::Input, c2, union).unwrap();
        diagram.add_edge(EdgeKind::Membership, i1, c1).unwrap();

        let inputs: Vec<NodeId> = diagram
            .incoming_nodes(union, |e| e.kind() == EdgeKind::Input, |_| true)
            .map(Node::id)
            .collect();
        assert_eq!(inputs, vec![c1, c2]);

        let neighbours = diagram.adjacent_nodes(c1, |_| true, |_| true).count();
        assert_eq!(neighbours, 2);
        assert_eq!(diagram.outgoing_edges(c1).count(), 1);
    }

    #[test]
    fn test_remove_node_drops_incident_edges() {
        let mut diagram = Diagram::new();
        let c1 = diagram.add_node(NodeKind::Concept, "test:C1");
        let c2 = diagram.add_node(NodeKind::Concept, "test:C2");
        let edge = diagram.add_edge(EdgeKind::Inclusion, c1, c2).unwrap();
        diagram.remove_node(c2).unwrap();
        assert_eq!(diagram.edge_count(), 0);
        assert_matches!(diagram.edge(edge), Err(EngineError::UnknownEdge(_)));
        assert_eq!(diagram.incident_edges(c1).count(), 0);

        let c3 = diagram.add_node(NodeKind::Concept, "test:C3");
        assert_ne!(c3, c2);
    }

    #[test]
    fn test_restriction_qualification() {
        let mut diagram = Diagram::new();
        let restriction = diagram.add_node(NodeKind::DomainRestriction, "exists");
        let role = diagram.add_node(NodeKind::Role, "test:R1");
        diagram.add_edge(EdgeKind::Input, role, restriction).unwrap();
        assert!(!diagram.is_restriction_qualified(restriction));

        let top = diagram.add_node(NodeKind::Concept, "owl:Thing");
        let top_edge = diagram.add_edge(EdgeKind::Input, top, restriction).unwrap();
        assert!(!diagram.is_restriction_qualified(restriction));

        diagram.remove_edge(top_edge).unwrap();
        let filler = diagram.add_node(NodeKind::Concept, "test:C1");
        diagram.add_edge(EdgeKind::Input, filler, restriction).unwrap();
        assert!(diagram.is_restriction_qualified(restriction));

        diagram
            .node_mut(restriction)
            .unwrap()
            .set_restriction(Restriction::SelfRestriction);
        assert!(!diagram.is_restriction_qualified(restriction));
    }

    #[test]
    fn test_snapshot_rejects_dangling_edges() {
        let mut diagram = Diagram::new();
        let c1 = diagram.add_node(NodeKind::Concept, "test:C1");
        let c2 = diagram.add_node(NodeKind::Concept, "test:C2");
        diagram.add_edge(EdgeKind::Inclusion, c1, c2).unwrap();

        let mut snapshot = diagram.snapshot();
        let restored = Diagram::from_snapshot(snapshot.clone()).unwrap();
        assert_eq!(restored.node_count(), 2);
        assert_eq!(restored.incoming_edges(c2).count(), 1);

        snapshot.nodes.retain(|node| node.id() != c2);
        assert_matches!(
            Diagram::from_snapshot(snapshot),
            Err(EngineError::DanglingEdge { node, .. }) if node == c2
        );
    }

    #[test]
    fn test_snapshot_rejects_ids_at_the_top_of_the_id_space() {
        let node = serde_json::json!({
            "nodes": [{
                "id": u32::MAX,
                "kind": "concept",
                "identity": "concept",
                "text": "test:C1"
            }],
            "edges": []
        });
        let snapshot: DiagramSnapshot = serde_json::from_value(node).unwrap();
        assert_matches!(
            Diagram::from_snapshot(snapshot),
            Err(EngineError::IdSpaceExhausted(id)) if id == "n4294967295"
        );

        let mut diagram = Diagram::new();
        let c1 = diagram.add_node(NodeKind::Concept, "test:C1");
        let c2 = diagram.add_node(NodeKind::Concept, "test:C2");
        diagram.add_edge(EdgeKind::Inclusion, c1, c2).unwrap();
        let mut snapshot = serde_json::to_value(diagram.snapshot()).unwrap();
        snapshot["edges"][0]["id"] = serde_json::json!(u32::MAX);
        let snapshot: DiagramSnapshot = serde_json::from_value(snapshot).unwrap();
        assert_matches!(
            Diagram::from_snapshot(snapshot),
            Err(EngineError::IdSpaceExhausted(id)) if id == "e4294967295"
        );
    }
}
