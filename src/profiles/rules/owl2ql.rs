//! OWL 2 QL restrictions layered on top of the base typing rules.
//!
//! QL keeps concept inclusions in a normal form where the left-hand side is
//! an atomic concept or an unqualified existential, and drops negative
//! assertions, value-domain complements and several constructors entirely.

use crate::error::ProfileError;
use crate::graph::{Diagram, EdgeKind, Identity, Node, NodeKind};
use crate::owl::{OwlProfile, Special};
use crate::profiles::{Candidate, EdgeRule, NodeRule};

pub fn node_rules() -> Vec<Box<dyn NodeRule>> {
    vec![
        Box::new(FunctionalityUnsupported),
        Box::new(InverseFunctionalityUnsupported),
        Box::new(TransitivityUnsupported),
        Box::new(UnsupportedDatatype),
        Box::new(UnsupportedOperator),
    ]
}

/// QL edge rules; registered after the base rules.
pub fn edge_rules() -> Vec<Box<dyn EdgeRule>> {
    vec![
        Box::new(UnsupportedIndividualEquality),
        Box::new(EquivalenceBetweenConceptExpression),
        Box::new(InclusionBetweenConceptExpression),
        Box::new(InputConceptToRestrictionNode),
        Box::new(InputValueDomainToComplementNode),
        Box::new(InputValueDomainToIntersectionNode),
        Box::new(MembershipFromAttributeInstanceToComplementNode),
        Box::new(MembershipFromRoleInstanceToComplementNode),
        Box::new(MembershipFromPropertyAssertionToComplementNode),
    ]
}

// =============================================================================
// NODE RULES
// =============================================================================

pub struct FunctionalityUnsupported;

impl NodeRule for FunctionalityUnsupported {
    fn name(&self) -> &'static str {
        "FunctionalityUnsupported"
    }

    fn check(&self, _diagram: &Diagram, node: &Node) -> Result<(), ProfileError> {
        if matches!(node.kind(), NodeKind::Role | NodeKind::Attribute) && node.is_functional() {
            forbid!("Functionality of roles and attributes is forbidden in OWL 2 QL");
        }
        Ok(())
    }
}

pub struct InverseFunctionalityUnsupported;

impl NodeRule for InverseFunctionalityUnsupported {
    fn name(&self) -> &'static str {
        "InverseFunctionalityUnsupported"
    }

    fn check(&self, _diagram: &Diagram, node: &Node) -> Result<(), ProfileError> {
        if node.kind() == NodeKind::Role && node.is_inverse_functional() {
            forbid!("Inverse Functionality of roles is forbidden in OWL 2 QL");
        }
        Ok(())
    }
}

pub struct TransitivityUnsupported;

impl NodeRule for TransitivityUnsupported {
    fn name(&self) -> &'static str {
        "TransitivityUnsupported"
    }

    fn check(&self, _diagram: &Diagram, node: &Node) -> Result<(), ProfileError> {
        if node.kind() == NodeKind::Role && node.is_transitive() {
            forbid!("Transitivity of roles is forbidden in OWL 2 QL");
        }
        Ok(())
    }
}

/// Value domains must use a datatype from the QL datatype map.
pub struct UnsupportedDatatype;

impl NodeRule for UnsupportedDatatype {
    fn name(&self) -> &'static str {
        "UnsupportedDatatype"
    }

    fn check(&self, _diagram: &Diagram, node: &Node) -> Result<(), ProfileError> {
        if node.kind() != NodeKind::ValueDomain {
            return Ok(());
        }
        match node.datatype() {
            Some(datatype) if !datatype.is_supported_by(OwlProfile::Owl2Ql) => {
                forbid!("Datatype {} is forbidden in OWL 2 QL", datatype)
            }
            _ => Ok(()),
        }
    }
}

pub struct UnsupportedOperator;

impl NodeRule for UnsupportedOperator {
    fn name(&self) -> &'static str {
        "UnsupportedOperator"
    }

    fn check(&self, _diagram: &Diagram, node: &Node) -> Result<(), ProfileError> {
        if matches!(
            node.kind(),
            NodeKind::Union
                | NodeKind::DisjointUnion
                | NodeKind::DatatypeRestriction
                | NodeKind::Facet
                | NodeKind::Enumeration
                | NodeKind::RoleChain
        ) {
            forbid!(
                "Usage of {} operator is forbidden in OWL 2 QL",
                node.short_name()
            );
        }
        Ok(())
    }
}

// =============================================================================
// EDGE RULES
// =============================================================================

pub struct UnsupportedIndividualEquality;

impl EdgeRule for UnsupportedIndividualEquality {
    fn name(&self) -> &'static str {
        "UnsupportedIndividualEquality"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        _source: &Node,
        edge: &Candidate,
        _target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind == EdgeKind::Same {
            forbid!("Usage of SameIndividual assertion is forbidden in OWL 2 QL");
        }
        Ok(())
    }
}

/// Property and Unknown endpoints are left to the base rules.
fn involves_properties(source: &Node, target: &Node) -> bool {
    [source.identity(), target.identity()]
        .into_iter()
        .any(|identity| matches!(identity, Identity::Role | Identity::Attribute | Identity::Unknown))
}

fn is_qualified_restriction(diagram: &Diagram, node: &Node) -> bool {
    node.kind().is_restriction() && diagram.is_restriction_qualified(node.id())
}

/// An equivalence is a double inclusion, so neither side may be a QL
/// right-hand-side-only expression.
pub struct EquivalenceBetweenConceptExpression;

impl EdgeRule for EquivalenceBetweenConceptExpression {
    fn name(&self) -> &'static str {
        "EquivalenceBetweenConceptExpression"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Equivalence || involves_properties(source, target) {
            return Ok(());
        }
        for node in [source, target] {
            match node.kind() {
                NodeKind::Intersection => forbid!(
                    "Equivalence in presence of concepts intersection is forbidden in OWL 2 QL"
                ),
                NodeKind::Complement => forbid!(
                    "Equivalence in presence of concept complement is forbidden in OWL 2 QL"
                ),
                _ if is_qualified_restriction(diagram, node) => forbid!(
                    "Equivalence in presence of qualified {} is forbidden in OWL 2 QL",
                    node.short_name()
                ),
                _ => {}
            }
        }
        Ok(())
    }
}

pub struct InclusionBetweenConceptExpression;

impl EdgeRule for InclusionBetweenConceptExpression {
    fn name(&self) -> &'static str {
        "InclusionBetweenConceptExpression"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Inclusion || involves_properties(source, target) {
            return Ok(());
        }
        match source.kind() {
            NodeKind::Intersection => forbid!(
                "Inclusion with an intersection of concept expressions as source is forbidden in OWL 2 QL"
            ),
            NodeKind::Complement => {
                forbid!("Inclusion with a concept complement as source is forbidden in OWL 2 QL")
            }
            _ if is_qualified_restriction(diagram, source) => forbid!(
                "Inclusion with a qualified {} as source is forbidden in OWL 2 QL",
                source.short_name()
            ),
            _ => Ok(()),
        }
    }
}

/// Qualified restrictions take atomic fillers, and may not be qualified
/// while already used on the left of an inclusion or in an equivalence.
pub struct InputConceptToRestrictionNode;

impl EdgeRule for InputConceptToRestrictionNode {
    fn name(&self) -> &'static str {
        "InputConceptToRestrictionNode"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input
            || !target.kind().is_restriction()
            || source.identity() != Identity::Concept
        {
            return Ok(());
        }
        if source.kind() != NodeKind::Concept {
            forbid!(
                "OWL 2 QL admits only an atomic concept as filler for a qualified {}",
                target.short_name()
            );
        }
        if source.special().is_some_and(Special::is_top) {
            return Ok(());
        }
        let included = diagram
            .outgoing_nodes(target.id(), |e| e.kind() == EdgeKind::Inclusion, |_| true)
            .next()
            .is_some();
        if included {
            forbid!(
                "Inclusion with a qualified {} as source is forbidden in OWL 2 QL",
                target.short_name()
            );
        }
        let equivalent = diagram
            .adjacent_nodes(target.id(), |e| e.kind() == EdgeKind::Equivalence, |_| true)
            .next()
            .is_some();
        if equivalent {
            forbid!(
                "Equivalence in presence of qualified {} is forbidden in OWL 2 QL",
                target.short_name()
            );
        }
        Ok(())
    }
}

pub struct InputValueDomainToComplementNode;

impl EdgeRule for InputValueDomainToComplementNode {
    fn name(&self) -> &'static str {
        "InputValueDomainToComplementNode"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind == EdgeKind::Input
            && target.kind() == NodeKind::Complement
            && source.identity() == Identity::ValueDomain
        {
            forbid!("Complement of a value-domain expression is forbidden in OWL 2 QL");
        }
        Ok(())
    }
}

/// A value domain fed into an intersection would turn every Neutral
/// complement reachable through Neutral operators into a value-domain
/// complement.
pub struct InputValueDomainToIntersectionNode;

impl EdgeRule for InputValueDomainToIntersectionNode {
    fn name(&self) -> &'static str {
        "InputValueDomainToIntersectionNode"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input
            || target.kind() != NodeKind::Intersection
            || source.identity() != Identity::ValueDomain
        {
            return Ok(());
        }
        let mut complements = diagram.traverse(
            target.id(),
            |e| {
                matches!(
                    e.kind(),
                    EdgeKind::Input | EdgeKind::Inclusion | EdgeKind::Equivalence
                )
            },
            |node| node.identity() == Identity::Neutral,
            |node| node.kind() == NodeKind::Complement && node.identity() == Identity::Neutral,
        );
        if complements.next().is_some() {
            forbid!("Complement of a value-domain expression is forbidden in OWL 2 QL");
        }
        Ok(())
    }
}

pub struct MembershipFromAttributeInstanceToComplementNode;

impl EdgeRule for MembershipFromAttributeInstanceToComplementNode {
    fn name(&self) -> &'static str {
        "MembershipFromAttributeInstanceToComplementNode"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind == EdgeKind::Membership
            && source.identity() == Identity::AttributeInstance
            && target.kind() == NodeKind::Complement
        {
            forbid!("Negative attribute assertion is forbidden in OWL 2 QL");
        }
        Ok(())
    }
}

pub struct MembershipFromRoleInstanceToComplementNode;

impl EdgeRule for MembershipFromRoleInstanceToComplementNode {
    fn name(&self) -> &'static str {
        "MembershipFromRoleInstanceToComplementNode"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind == EdgeKind::Membership
            && source.identity() == Identity::RoleInstance
            && target.kind() == NodeKind::Complement
        {
            forbid!("Negative role assertion is forbidden in OWL 2 QL");
        }
        Ok(())
    }
}

/// Covers property assertions whose instance kind is not settled yet.
pub struct MembershipFromPropertyAssertionToComplementNode;

impl EdgeRule for MembershipFromPropertyAssertionToComplementNode {
    fn name(&self) -> &'static str {
        "MembershipFromPropertyAssertionToComplementNode"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind == EdgeKind::Membership
            && source.kind() == NodeKind::PropertyAssertion
            && source.identity() == Identity::Neutral
            && target.kind() == NodeKind::Complement
        {
            forbid!("Negative attribute/role assertion is forbidden in OWL 2 QL");
        }
        Ok(())
    }
}
