//! Graphol typing rules shared by every OWL 2 profile.
//!
//! These rules enforce the expression grammar itself: which identities may be
//! related by axiom edges, which nodes may feed which constructors and how
//! many inputs each constructor takes.

use super::other_inputs;
use crate::error::ProfileError;
use crate::graph::{Diagram, EdgeKind, Identity, Node, NodeKind};
use crate::owl::Restriction;
use crate::profiles::{Candidate, EdgeRule};
use smallvec::SmallVec;

/// Edge rules in registration order.
pub fn edge_rules() -> Vec<Box<dyn EdgeRule>> {
    vec![
        Box::new(ExpressionTyping),
        Box::new(OperatorCompatibility),
        Box::new(ValueDomainAxiom),
        Box::new(ComplementPlacement),
        Box::new(RoleChainPlacement),
        Box::new(ComplementOperatorSequence),
        Box::new(InputTarget),
        Box::new(ValueDomainInputPropagation),
        Box::new(ComplementInput),
        Box::new(BooleanOperatorInput),
        Box::new(EnumerationInput),
        Box::new(RoleInverseInput),
        Box::new(RoleChainInput),
        Box::new(DatatypeRestrictionInput),
        Box::new(PropertyAssertionInput),
        Box::new(RestrictionInput),
        Box::new(MembershipAssertion),
        Box::new(IndividualEquality),
    ]
}

// =============================================================================
// AXIOM EDGES
// =============================================================================

/// Inclusion and Equivalence relate two expressions of the same identity.
pub struct ExpressionTyping;

impl EdgeRule for ExpressionTyping {
    fn name(&self) -> &'static str {
        "ExpressionTyping"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if !edge.kind.is_axiom() {
            return Ok(());
        }
        for node in [source, target] {
            let identity = node.identity();
            if !identity.is_expression() && !identity.is_undetermined() {
                forbid!(
                    "Type mismatch: {} must involve two graphol expressions",
                    edge.kind
                );
            }
        }
        let (left, right) = (source.identity(), target.identity());
        if left.is_expression() && right.is_expression() && left != right {
            forbid!("Type mismatch: {} between {} and {}", edge.kind, left, right);
        }
        Ok(())
    }
}

/// Role and Attribute expressions never meet boolean concept operators.
pub struct OperatorCompatibility;

impl EdgeRule for OperatorCompatibility {
    fn name(&self) -> &'static str {
        "OperatorCompatibility"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if !edge.kind.is_axiom() {
            return Ok(());
        }
        let clash = |property: &Node, operator: &Node| {
            property.identity().is_property() && operator.kind().is_boolean_operator()
        };
        if clash(source, target) || clash(target, source) {
            forbid!(
                "Type mismatch: {} and {} are not compatible",
                source.short_name(),
                target.short_name()
            );
        }
        Ok(())
    }
}

pub struct ValueDomainAxiom;

impl EdgeRule for ValueDomainAxiom {
    fn name(&self) -> &'static str {
        "ValueDomainAxiom"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if !edge.kind.is_axiom() {
            return Ok(());
        }
        let between = |domain: &Node, other: &Node| {
            domain.identity() == Identity::ValueDomain
                && matches!(other.identity(), Identity::ValueDomain | Identity::Neutral)
        };
        if between(source, target) || between(target, source) {
            forbid!(
                "Type mismatch: {} between value-domain expressions",
                edge.kind
            );
        }
        Ok(())
    }
}

/// Role and Attribute complements only appear as inclusion targets.
pub struct ComplementPlacement;

impl EdgeRule for ComplementPlacement {
    fn name(&self) -> &'static str {
        "ComplementPlacement"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        match edge.kind {
            EdgeKind::Inclusion => {
                if source.kind() == NodeKind::Complement && target.identity().is_property() {
                    forbid!(
                        "Invalid source for {} inclusion: complement node",
                        target.identity()
                    );
                }
            }
            EdgeKind::Equivalence => {
                for (complement, other) in [(source, target), (target, source)] {
                    if complement.kind() == NodeKind::Complement && other.identity().is_property() {
                        forbid!(
                            "Equivalence is forbidden when expressing {} disjointness",
                            other.identity()
                        );
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

pub struct RoleChainPlacement;

impl EdgeRule for RoleChainPlacement {
    fn name(&self) -> &'static str {
        "RoleChainPlacement"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        let source_chain = source.kind() == NodeKind::RoleChain;
        let target_chain = target.kind() == NodeKind::RoleChain;
        match edge.kind {
            EdgeKind::Inclusion if source_chain && target_chain => {
                forbid!("Inclusion between role chain node and role chain node is forbidden")
            }
            EdgeKind::Inclusion if target_chain => {
                forbid!("Role chain nodes cannot be target of a Role inclusion")
            }
            EdgeKind::Equivalence if source_chain || target_chain => {
                forbid!("Equivalence is forbidden in presence of a role chain node")
            }
            _ => Ok(()),
        }
    }
}

/// A complement of a boolean operator cannot negate a property expression.
pub struct ComplementOperatorSequence;

impl EdgeRule for ComplementOperatorSequence {
    fn name(&self) -> &'static str {
        "ComplementOperatorSequence"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if !matches!(edge.kind, EdgeKind::Inclusion | EdgeKind::Membership)
            || target.kind() != NodeKind::Complement
        {
            return Ok(());
        }
        let property_side = matches!(
            source.identity(),
            Identity::Role | Identity::Attribute | Identity::RoleInstance | Identity::AttributeInstance
        ) || source.kind() == NodeKind::PropertyAssertion;
        if !property_side {
            return Ok(());
        }
        let operator = other_inputs(diagram, target, edge).find(|node| node.kind().is_boolean_operator());
        if let Some(operator) = operator {
            forbid!(
                "Detected unsupported operator sequence on {}",
                operator.short_name()
            );
        }
        Ok(())
    }
}

// =============================================================================
// INPUT EDGES
// =============================================================================

pub struct InputTarget;

impl EdgeRule for InputTarget {
    fn name(&self) -> &'static str {
        "InputTarget"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        _source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input {
            return Ok(());
        }
        if target.kind() == NodeKind::Facet {
            forbid!("Facet node cannot be target of any input");
        }
        if !target.kind().is_constructor() {
            forbid!("Input edges can only target constructor nodes");
        }
        Ok(())
    }
}

/// Feeding a value domain into a Neutral operator turns its whole Neutral
/// component into value-domain expressions; any axiom already attached to
/// that component would then relate two value domains.
pub struct ValueDomainInputPropagation;

impl EdgeRule for ValueDomainInputPropagation {
    fn name(&self) -> &'static str {
        "ValueDomainInputPropagation"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input
            || source.identity() != Identity::ValueDomain
            || target.identity() != Identity::Neutral
            || !(target.kind().is_boolean_operator() || target.kind() == NodeKind::Complement)
        {
            return Ok(());
        }
        let neutral = |node: &Node| node.identity() == Identity::Neutral;
        let component = diagram.traverse(
            target.id(),
            |other| {
                Some(other.id()) != edge.id
                    && matches!(
                        other.kind(),
                        EdgeKind::Input | EdgeKind::Inclusion | EdgeKind::Equivalence
                    )
            },
            neutral,
            neutral,
        );
        for member in component {
            let axioms = diagram
                .incident_edges(member.id())
                .filter(|axiom| axiom.kind().is_axiom() && Some(axiom.id()) != edge.id);
            for axiom in axioms {
                let other_id = axiom.other(member.id());
                let Ok(other) = diagram.node(other_id) else {
                    tracing::error!(
                        edge = %axiom.id(),
                        node = %other_id,
                        "axiom endpoint missing from diagram"
                    );
                    continue;
                };
                if matches!(other.identity(), Identity::ValueDomain | Identity::Neutral) {
                    forbid!(
                        "Type mismatch: {} between value-domain expressions",
                        axiom.kind()
                    );
                }
            }
        }
        Ok(())
    }
}

pub struct ComplementInput;

impl EdgeRule for ComplementInput {
    fn name(&self) -> &'static str {
        "ComplementInput"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input || target.kind() != NodeKind::Complement {
            return Ok(());
        }
        let identity = source.identity();
        if !identity.is_expression() && identity != Identity::Neutral {
            forbid!("Invalid input to complement node: {}", identity);
        }
        if other_inputs(diagram, target, edge).next().is_some() {
            forbid!("Too many inputs to complement node");
        }
        if identity.is_property() {
            let used_as_expression = diagram.incident_edges(target.id()).any(|other| {
                Some(other.id()) != edge.id
                    && match other.kind() {
                        EdgeKind::Input | EdgeKind::Inclusion => other.source() == target.id(),
                        EdgeKind::Equivalence => true,
                        _ => false,
                    }
            });
            if used_as_expression {
                forbid!("Invalid negative {} expression", identity);
            }
        }
        Ok(())
    }
}

/// Inputs of union, disjoint union and intersection nodes.
pub struct BooleanOperatorInput;

impl EdgeRule for BooleanOperatorInput {
    fn name(&self) -> &'static str {
        "BooleanOperatorInput"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input || !target.kind().is_boolean_operator() {
            return Ok(());
        }
        let identity = source.identity();
        if !matches!(
            identity,
            Identity::Concept | Identity::ValueDomain | Identity::Neutral
        ) {
            forbid!("Invalid input to {}: {}", target.short_name(), identity);
        }
        if is_attribute_range(diagram, source) {
            forbid!(
                "Invalid input to {}: {}",
                target.short_name(),
                source.short_name()
            );
        }
        let resolved = target.identity();
        if identity != Identity::Neutral && resolved.is_expression() && resolved != identity {
            forbid!(
                "Type mismatch: {} between {} and {}",
                target.kind().operator_name(),
                identity,
                resolved
            );
        }
        Ok(())
    }
}

fn is_attribute_range(diagram: &Diagram, node: &Node) -> bool {
    node.kind() == NodeKind::RangeRestriction
        && diagram
            .incoming_nodes(
                node.id(),
                |edge| edge.kind() == EdgeKind::Input,
                |input| input.identity() == Identity::Attribute,
            )
            .next()
            .is_some()
}

pub struct EnumerationInput;

impl EdgeRule for EnumerationInput {
    fn name(&self) -> &'static str {
        "EnumerationInput"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input || target.kind() != NodeKind::Enumeration {
            return Ok(());
        }
        let identity = source.identity();
        if !matches!(identity, Identity::Individual | Identity::Value) {
            forbid!("Invalid input to enumeration node: {}", identity);
        }
        let mixed = other_inputs(diagram, target, edge).any(|node| {
            matches!(node.identity(), Identity::Individual | Identity::Value)
                && node.identity() != identity
        });
        if mixed {
            forbid!("Invalid input to enumeration node: {}", identity);
        }
        Ok(())
    }
}

pub struct RoleInverseInput;

impl EdgeRule for RoleInverseInput {
    fn name(&self) -> &'static str {
        "RoleInverseInput"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input || target.kind() != NodeKind::RoleInverse {
            return Ok(());
        }
        if source.kind() != NodeKind::Role {
            forbid!("Invalid input to role inverse node: {}", source.short_name());
        }
        if other_inputs(diagram, target, edge).next().is_some() {
            forbid!("Too many inputs to role inverse node");
        }
        Ok(())
    }
}

pub struct RoleChainInput;

impl EdgeRule for RoleChainInput {
    fn name(&self) -> &'static str {
        "RoleChainInput"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input || target.kind() != NodeKind::RoleChain {
            return Ok(());
        }
        if !matches!(source.kind(), NodeKind::Role | NodeKind::RoleInverse) {
            forbid!("Invalid input to role chain node: {}", source.short_name());
        }
        Ok(())
    }
}

/// One value domain plus facets compatible with its datatype.
pub struct DatatypeRestrictionInput;

impl EdgeRule for DatatypeRestrictionInput {
    fn name(&self) -> &'static str {
        "DatatypeRestrictionInput"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input || target.kind() != NodeKind::DatatypeRestriction {
            return Ok(());
        }
        match source.kind() {
            NodeKind::ValueDomain => {
                if other_inputs(diagram, target, edge).any(|n| n.kind() == NodeKind::ValueDomain) {
                    forbid!("Too many value-domain nodes in input to datatype restriction node");
                }
                let Some(datatype) = source.datatype() else {
                    return Ok(());
                };
                let facets = other_inputs(diagram, target, edge).filter_map(Node::facet);
                for value in facets {
                    if !value.facet.constrains(datatype) {
                        forbid!(
                            "Type mismatch: datatype {} is not compatible by facet {}",
                            datatype,
                            value.facet
                        );
                    }
                }
                Ok(())
            }
            NodeKind::Facet => {
                let Some(value) = source.facet() else {
                    return Ok(());
                };
                let datatype = other_inputs(diagram, target, edge)
                    .find(|n| n.kind() == NodeKind::ValueDomain)
                    .and_then(Node::datatype);
                match datatype {
                    Some(datatype) if !value.facet.constrains(datatype) => forbid!(
                        "Type mismatch: facet {} is not compatible by datatype {}",
                        value.facet,
                        datatype
                    ),
                    _ => Ok(()),
                }
            }
            _ => forbid!(
                "Invalid input to datatype restriction node: {}",
                source.short_name()
            ),
        }
    }
}

/// Role Instances pair two individuals; Attribute Instances pair an
/// individual with a value.
pub struct PropertyAssertionInput;

impl EdgeRule for PropertyAssertionInput {
    fn name(&self) -> &'static str {
        "PropertyAssertionInput"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input || target.kind() != NodeKind::PropertyAssertion {
            return Ok(());
        }
        if source.kind() != NodeKind::Individual {
            forbid!(
                "Invalid input to property assertion node: {}",
                source.short_name()
            );
        }
        let identity = source.identity();
        if target.identity() == Identity::RoleInstance && identity == Identity::Value {
            forbid!("Invalid input to Role Instance: Value");
        }
        let inputs: SmallVec<[&Node; 2]> = other_inputs(diagram, target, edge).collect();
        if inputs.len() >= 2 {
            forbid!("Too many inputs to property assertion node");
        }
        if inputs.is_empty() && identity == Identity::Value {
            forbid!("Value cannot be used as the first component of a property assertion");
        }
        if target.identity() == Identity::AttributeInstance {
            let repeated = inputs.iter().any(|input| input.identity() == identity);
            match identity {
                Identity::Individual if repeated => {
                    forbid!("Too many individuals in input to Attribute Instance")
                }
                Identity::Value if repeated => {
                    forbid!("Too many values in input to Attribute Instance")
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// A property plus at most one filler of matching kind.
pub struct RestrictionInput;

impl EdgeRule for RestrictionInput {
    fn name(&self) -> &'static str {
        "RestrictionInput"
    }

    fn check(
        &self,
        diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Input || !target.kind().is_restriction() {
            return Ok(());
        }
        let inputs: SmallVec<[&Node; 2]> = other_inputs(diagram, target, edge).collect();
        if inputs.len() >= 2 {
            forbid!("Too many inputs to {}", target.short_name());
        }
        if matches!(
            source.kind(),
            NodeKind::RoleChain | NodeKind::PropertyAssertion
        ) {
            forbid!(
                "Invalid input to {}: {}",
                target.short_name(),
                source.short_name()
            );
        }
        let identity = source.identity();
        if !identity.is_expression() && identity != Identity::Neutral {
            forbid!("Invalid input to {}: {}", target.short_name(), identity);
        }
        let side = match target.kind() {
            NodeKind::DomainRestriction => "domain",
            _ => "range",
        };
        if target.restriction() == Some(Restriction::SelfRestriction) {
            match identity {
                Identity::Attribute => forbid!("Attributes do not have self"),
                Identity::Concept | Identity::ValueDomain => forbid!(
                    "Invalid restriction type for qualified {} restriction: self",
                    side
                ),
                _ => {}
            }
        }
        let Some(other) = inputs.first() else {
            return Ok(());
        };
        let paired = other.identity();
        if target.kind() == NodeKind::RangeRestriction
            && (paired == Identity::Attribute || identity == Identity::Attribute)
        {
            forbid!("Too many inputs to attribute range restriction");
        }
        if identity == Identity::Neutral || paired == Identity::Neutral {
            return Ok(());
        }
        let pair = |a: Identity, b: Identity| {
            (identity == a && paired == b) || (identity == b && paired == a)
        };
        let admitted = match target.kind() {
            NodeKind::DomainRestriction => {
                pair(Identity::Role, Identity::Concept)
                    || pair(Identity::Attribute, Identity::ValueDomain)
            }
            _ => pair(Identity::Role, Identity::Concept),
        };
        if !admitted {
            forbid!(
                "Invalid qualified {} restriction: {} + {}",
                side,
                identity,
                paired
            );
        }
        Ok(())
    }
}

// =============================================================================
// ASSERTION EDGES
// =============================================================================

pub struct MembershipAssertion;

impl EdgeRule for MembershipAssertion {
    fn name(&self) -> &'static str {
        "MembershipAssertion"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if edge.kind != EdgeKind::Membership {
            return Ok(());
        }
        let asserted = target.identity();
        match source.identity() {
            Identity::Individual => {
                if !matches!(asserted, Identity::Concept | Identity::Neutral) {
                    forbid!("Invalid target for Concept assertion: {}", asserted);
                }
            }
            Identity::RoleInstance => {
                if target.kind() == NodeKind::RoleChain {
                    forbid!("Invalid target for Role assertion: {}", target.short_name());
                }
                if !matches!(asserted, Identity::Role | Identity::Neutral) {
                    forbid!("Invalid target for Role assertion: {}", asserted);
                }
            }
            Identity::AttributeInstance => {
                if !matches!(asserted, Identity::Attribute | Identity::Neutral) {
                    forbid!("Invalid target for Attribute assertion: {}", asserted);
                }
            }
            Identity::Neutral if source.kind() == NodeKind::PropertyAssertion => {
                if !matches!(
                    asserted,
                    Identity::Role | Identity::Attribute | Identity::Neutral
                ) {
                    forbid!("Invalid target for property assertion: {}", asserted);
                }
            }
            other => forbid!("Invalid source for membership edge: {}", other),
        }
        Ok(())
    }
}

/// Same and Different relate individuals only.
pub struct IndividualEquality;

impl EdgeRule for IndividualEquality {
    fn name(&self) -> &'static str {
        "IndividualEquality"
    }

    fn check(
        &self,
        _diagram: &Diagram,
        source: &Node,
        edge: &Candidate,
        target: &Node,
    ) -> Result<(), ProfileError> {
        if !matches!(edge.kind, EdgeKind::Same | EdgeKind::Different) {
            return Ok(());
        }
        if source.identity() != Identity::Individual {
            forbid!(
                "Invalid source for {} individual assertion: {}",
                edge.kind,
                source.identity()
            );
        }
        if target.identity() != Identity::Individual {
            forbid!(
                "Invalid target for {} individual assertion: {}",
                edge.kind,
                target.identity()
            );
        }
        Ok(())
    }
}
