//! Rule sets registered by the built-in profiles.
//!
//! Every rule is a unit struct implementing [`NodeRule`](super::NodeRule) or
//! [`EdgeRule`](super::EdgeRule). Rules return `Ok(())` whenever the element
//! falls outside their scope.

/// Rejects the element under inspection with a formatted message.
macro_rules! forbid {
    ($($arg:tt)*) => {
        return Err($crate::error::ProfileError::new(format!($($arg)*)))
    };
}

pub mod owl2;
pub mod owl2ql;

use super::Candidate;
use crate::graph::{Diagram, EdgeKind, Node};

/// Sources of the other Input edges already feeding `target`.
fn other_inputs<'a>(
    diagram: &'a Diagram,
    target: &'a Node,
    edge: &'a Candidate,
) -> impl Iterator<Item = &'a Node> + 'a {
    diagram.incoming_nodes(
        target.id(),
        move |other| edge.sees(other, EdgeKind::Input),
        |_| true,
    )
}
