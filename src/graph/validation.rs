//! Structural invariants and their diagnostics.
//!
//! Local invariants (unique edge indices, terminal out-degrees) are
//! enforced at construction time by [`HebGraph::add_edge`]; this module
//! holds the whole-graph checks that only make sense once assembly is
//! done: a unique root, no leftover placeholders, and local acyclicity.
//! Cycle scanning is delegated to [`petgraph::algo`].

use miette::Diagnostic;
use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::NodeIndex;
use thiserror::Error;

use super::HebGraph;
use crate::node::{Node, NodeVariant};

/// A malformed behavior graph.
///
/// Structural errors are fatal to the constructing or validating call and
/// never leave a partially mutated graph behind.
#[derive(Debug, Error, Diagnostic)]
pub enum StructureError {
    /// Two outgoing edges of one node carry the same branch index.
    #[error("node `{node}` already has an outgoing edge with index {index}")]
    #[diagnostic(
        code(hebg::graph::duplicate_edge_index),
        help("outgoing edge indices must be pairwise distinct per node")
    )]
    DuplicateEdgeIndex { node: String, index: usize },

    /// A terminal-variant node was used as an edge source.
    #[error("cannot add an outgoing edge to {variant} node `{node}`")]
    #[diagnostic(
        code(hebg::graph::terminal_source),
        help("action and behavior nodes are terminal; branch from a feature condition instead")
    )]
    TerminalSource {
        node: String,
        variant: NodeVariant,
    },

    /// No node with in-degree 0 exists.
    #[error("behavior graph `{behavior}` has no root node")]
    #[diagnostic(
        code(hebg::graph::no_root),
        help("a finished graph needs exactly one node without predecessors")
    )]
    NoRoot { behavior: String },

    /// More than one node with in-degree 0 exists.
    #[error("behavior graph `{behavior}` has multiple roots: {roots:?}")]
    #[diagnostic(
        code(hebg::graph::multiple_roots),
        help("a finished graph needs exactly one node without predecessors")
    )]
    MultipleRoots { behavior: String, roots: Vec<String> },

    /// An [`EmptyNode`](crate::node::EmptyNode) survived into a finished graph.
    #[error("placeholder node `{name}` was never resolved")]
    #[diagnostic(
        code(hebg::graph::unresolved_placeholder),
        help("replace every placeholder with a concrete node before using the graph")
    )]
    UnresolvedPlaceholder { name: String },

    /// The graph contains a directed cycle.
    #[error("behavior graph `{behavior}` contains a cycle")]
    #[diagnostic(
        code(hebg::graph::local_cycle),
        help("behavior graphs must be acyclic; cycles across behaviors are handled by unrolling")
    )]
    LocalCycle { behavior: String },
}

impl<O, A> HebGraph<O, A> {
    /// The unique in-degree-0 node of the graph.
    pub fn root(&self) -> Result<&Node<O, A>, StructureError> {
        self.root_index().map(|idx| self.node_at(idx))
    }

    pub(crate) fn root_index(&self) -> Result<NodeIndex, StructureError> {
        let mut externals = self.storage().externals(Direction::Incoming);
        let Some(root) = externals.next() else {
            return Err(StructureError::NoRoot {
                behavior: self.behavior().to_string(),
            });
        };
        if externals.next().is_some() {
            let roots = self
                .storage()
                .externals(Direction::Incoming)
                .map(|idx| self.node_at(idx).name().to_string())
                .collect();
            return Err(StructureError::MultipleRoots {
                behavior: self.behavior().to_string(),
                roots,
            });
        }
        Ok(root)
    }

    /// Check the whole-graph invariants of a finished graph.
    ///
    /// Verifies the unique root, rejects leftover placeholders, and scans
    /// for local cycles. Branch coverage of feature conditions is *not*
    /// checked here; a gap surfaces lazily as
    /// [`EvaluateError::NoMatchingBranch`](super::EvaluateError::NoMatchingBranch)
    /// when an observation actually reaches it.
    pub fn validate(&self) -> Result<(), StructureError> {
        self.root_index()?;
        for node in self.nodes() {
            if let Node::Empty(placeholder) = node {
                return Err(StructureError::UnresolvedPlaceholder {
                    name: placeholder.name().to_string(),
                });
            }
        }
        if is_cyclic_directed(self.storage()) {
            return Err(StructureError::LocalCycle {
                behavior: self.behavior().to_string(),
            });
        }
        Ok(())
    }
}
