//! Read-only iteration over nodes and labeled edges.
//!
//! These accessors are the surface consumed by visualization and other
//! inspection collaborators: they expose the structure without allowing
//! mutation. Branch lookups used by evaluation and code generation also
//! live here.

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use super::HebGraph;
use crate::node::Node;

impl<O, A> HebGraph<O, A> {
    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<O, A>> {
        self.storage().node_weights()
    }

    /// Iterate over all edges as `(source, destination, index)` triples.
    pub fn edges(&self) -> impl Iterator<Item = (&Node<O, A>, &Node<O, A>, usize)> {
        self.storage().edge_references().map(|edge| {
            (
                self.node_at(edge.source()),
                self.node_at(edge.target()),
                *edge.weight(),
            )
        })
    }

    /// All nodes without predecessors.
    ///
    /// A finished graph has exactly one; during incremental construction
    /// there may be several.
    pub fn roots(&self) -> Vec<&Node<O, A>> {
        self.storage()
            .externals(Direction::Incoming)
            .map(|idx| self.node_at(idx))
            .collect()
    }

    /// The successor of a named node along the edge carrying `index`.
    #[must_use]
    pub fn successor_with_index(&self, name: &str, index: usize) -> Option<&Node<O, A>> {
        let idx = self.index_of(name)?;
        self.follow(idx, index).map(|next| self.node_at(next))
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.names.get(name).copied()
    }

    /// Outgoing `(index, destination)` pairs in ascending index order.
    pub(crate) fn outgoing_sorted(&self, idx: NodeIndex) -> Vec<(usize, NodeIndex)> {
        let mut out: Vec<(usize, NodeIndex)> = self
            .storage()
            .edges(idx)
            .map(|edge| (*edge.weight(), edge.target()))
            .collect();
        out.sort_by_key(|(index, _)| *index);
        out
    }

    /// Destination of the outgoing edge carrying `index`, if any.
    pub(crate) fn follow(&self, idx: NodeIndex, index: usize) -> Option<NodeIndex> {
        self.storage()
            .edges(idx)
            .find(|edge| *edge.weight() == index)
            .map(|edge| edge.target())
    }
}
