//! Behavior graph storage, construction, and evaluation.
//!
//! A [`HebGraph`] is an edge-labeled directed graph owned by exactly one
//! behavior. Leaf nodes are actions or sub-behaviors; inner nodes are
//! feature conditions whose outgoing edges carry pairwise-distinct `usize`
//! indices selecting the branch to follow. Storage is delegated to
//! [`petgraph`]'s directed graph; this module layers the structural
//! invariants and the recursive evaluator on top.
//!
//! # Construction
//!
//! Graphs are assembled through [`HebGraph::add_node`] and
//! [`HebGraph::add_edge`], which insert missing endpoints on the fly and
//! enforce the invariants that can be checked locally (unique edge indices
//! per source, no outgoing edges on terminal variants). Whole-graph
//! invariants (unique root, no leftover placeholders, local acyclicity) are
//! checked by [`HebGraph::validate`].
//!
//! # Quick Start
//!
//! ```
//! use hebg::graph::HebGraph;
//! use hebg::node::{Action, FeatureCondition};
//!
//! let above_zero = FeatureCondition::new("Greater or equal to 0 ?", |obs: &f64| {
//!     usize::from(*obs >= 0.0)
//! });
//!
//! let mut graph: HebGraph<f64, i64> = HebGraph::new("Is above zero");
//! graph.add_edge(above_zero.clone(), Action::of(0), 0)?;
//! graph.add_edge(above_zero, Action::of(1), 1)?;
//!
//! assert_eq!(graph.evaluate(&-1.5)?, 0);
//! assert_eq!(graph.evaluate(&1.5)?, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod evaluation;
mod iteration;
mod validation;


pub use evaluation::EvaluateError;
pub use validation::StructureError;

use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use crate::node::Node;

/// Edge-labeled behavior graph owned by one behavior.
///
/// Nodes are identified by name: adding a node whose name is already
/// present refers to the existing node rather than creating a parallel one.
pub struct HebGraph<O, A> {
    /// Identity of the owning behavior.
    behavior: String,
    /// Underlying storage; edge weights are branch indices.
    graph: DiGraph<Node<O, A>, usize>,
    /// Name → storage index lookup.
    names: FxHashMap<String, NodeIndex>,
    /// Synthetic label → original name, populated by unrolling.
    origins: FxHashMap<String, String>,
}

impl<O, A> HebGraph<O, A> {
    /// Create an empty graph owned by the named behavior.
    pub fn new(behavior: impl Into<String>) -> Self {
        Self {
            behavior: behavior.into(),
            graph: DiGraph::new(),
            names: FxHashMap::default(),
            origins: FxHashMap::default(),
        }
    }

    /// Identity of the behavior owning this graph.
    #[must_use]
    pub fn behavior(&self) -> &str {
        &self.behavior
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Whether a node with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Look up a node by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node<O, A>> {
        self.names.get(name).map(|&idx| &self.graph[idx])
    }

    /// Original (pre-unrolling) name behind a node label.
    ///
    /// Labels of nodes spliced in by unrolling are synthetic; this resolves
    /// them back to the name the node had in its source graph. Labels
    /// without a recorded origin resolve to themselves.
    #[must_use]
    pub fn origin_of<'a>(&'a self, name: &'a str) -> &'a str {
        self.origins.get(name).map_or(name, String::as_str)
    }

    /// Insert a node, returning whether it was newly added.
    ///
    /// Re-adding an existing name is a no-op; the existing node wins.
    pub fn add_node(&mut self, node: impl Into<Node<O, A>>) -> bool {
        let node = node.into();
        if self.names.contains_key(node.name()) {
            tracing::trace!(node = %node.name(), "node already present; keeping existing");
            return false;
        }
        self.intern(node);
        true
    }

    /// Insert a labeled edge, adding missing endpoints.
    ///
    /// Fails, leaving the graph unchanged, if `source` already has an
    /// outgoing edge carrying `index`, or if `source` is a terminal
    /// variant (action or behavior).
    pub fn add_edge(
        &mut self,
        source: impl Into<Node<O, A>>,
        destination: impl Into<Node<O, A>>,
        index: usize,
    ) -> Result<(), StructureError> {
        let source = source.into();
        let destination = destination.into();

        // All checks happen before any mutation.
        let variant = match self.names.get(source.name()) {
            Some(&idx) => {
                if self.graph.edges(idx).any(|edge| *edge.weight() == index) {
                    return Err(StructureError::DuplicateEdgeIndex {
                        node: source.name().to_string(),
                        index,
                    });
                }
                self.graph[idx].variant()
            }
            None => source.variant(),
        };
        if variant.is_terminal() {
            return Err(StructureError::TerminalSource {
                node: source.name().to_string(),
                variant,
            });
        }

        let source_idx = self.intern(source);
        let destination_idx = self.intern(destination);
        self.graph.add_edge(source_idx, destination_idx, index);
        Ok(())
    }

    /// Insert or look up a node by name.
    fn intern(&mut self, node: Node<O, A>) -> NodeIndex {
        if let Some(&idx) = self.names.get(node.name()) {
            return idx;
        }
        let name = node.name().to_string();
        let idx = self.graph.add_node(node);
        self.names.insert(name, idx);
        idx
    }

    /// Connect two existing nodes by name. Unroller internal.
    pub(crate) fn link(
        &mut self,
        source: &str,
        destination: &str,
        index: usize,
    ) -> Result<(), StructureError> {
        debug_assert!(self.contains(source) && self.contains(destination));
        let source_idx = self.names[source];
        let destination_idx = self.names[destination];
        if self
            .graph
            .edges(source_idx)
            .any(|edge| *edge.weight() == index)
        {
            return Err(StructureError::DuplicateEdgeIndex {
                node: source.to_string(),
                index,
            });
        }
        self.graph.add_edge(source_idx, destination_idx, index);
        Ok(())
    }

    pub(crate) fn record_origin(&mut self, label: &str, origin: &str) {
        if label != origin {
            self.origins.insert(label.to_string(), origin.to_string());
        }
    }

    pub(crate) fn storage(&self) -> &DiGraph<Node<O, A>, usize> {
        &self.graph
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node<O, A> {
        &self.graph[idx]
    }
}
