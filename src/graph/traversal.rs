//! Lazy breadth-first traversal over a [`Diagram`].
//!
//! Three predicates steer a walk:
//! - `edge_filter` decides which incident edges are followed (both directions),
//! - `descend` decides whether a discovered node is expanded further,
//! - `select` decides whether a discovered node is yielded.
//!
//! The start node is always expanded and yielded only if `select` accepts it.
//! Every node is visited at most once, so cyclic diagrams terminate.

use super::{Diagram, Edge, Node, NodeId};
use ahash::AHashSet;
use std::collections::VecDeque;

pub struct Traversal<'a, E, D, S> {
    diagram: &'a Diagram,
    start: NodeId,
    queue: VecDeque<NodeId>,
    visited: AHashSet<NodeId>,
    edge_filter: E,
    descend: D,
    select: S,
}

impl<'a, E, D, S> Traversal<'a, E, D, S>
where
    E: Fn(&Edge) -> bool,
    D: Fn(&Node) -> bool,
    S: Fn(&Node) -> bool,
{
    pub fn new(diagram: &'a Diagram, start: NodeId, edge_filter: E, descend: D, select: S) -> Self {
        let mut visited = AHashSet::new();
        visited.insert(start);
        Self {
            diagram,
            start,
            queue: VecDeque::from([start]),
            visited,
            edge_filter,
            descend,
            select,
        }
    }

    fn expand(&mut self, id: NodeId) {
        for edge in self.diagram.incident_edges(id) {
            if !(self.edge_filter)(edge) {
                continue;
            }
            let next = edge.other(id);
            if self.visited.insert(next) {
                self.queue.push_back(next);
            }
        }
    }
}

impl<'a, E, D, S> Iterator for Traversal<'a, E, D, S>
where
    E: Fn(&Edge) -> bool,
    D: Fn(&Node) -> bool,
    S: Fn(&Node) -> bool,
{
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.queue.pop_front() {
            let Ok(node) = self.diagram.node(id) else {
                tracing::error!(node = %id, start = %self.start, "traversal reached unknown node");
                continue;
            };
            if id == self.start || (self.descend)(node) {
                self.expand(id);
            }
            if (self.select)(node) {
                return Some(node);
            }
        }
        None
    }
}

impl Diagram {
    /// Starts a lazy breadth-first walk from `start`.
    pub fn traverse<E, D, S>(
        &self,
        start: NodeId,
        edge_filter: E,
        descend: D,
        select: S,
    ) -> Traversal<'_, E, D, S>
    where
        E: Fn(&Edge) -> bool,
        D: Fn(&Node) -> bool,
        S: Fn(&Node) -> bool,
    {
        Traversal::new(self, start, edge_filter, descend, select)
    }
}
