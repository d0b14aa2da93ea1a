//! Cycle-safe inlining of explainable sub-behaviors.
//!
//! Unrolling produces a *flattened* copy of a behavior graph: every
//! explainable behavior node is replaced in place by a copy of its own
//! graph, recursively, so the result explains the whole decision in one
//! picture. Opaque behaviors have no graph to splice and stay as leaf
//! nodes ("rolled"). Behaviors that are already being expanded further up
//! the call path also stay rolled; that guard is what keeps mutually
//! referencing behaviors finite.
//!
//! Spliced node labels are disambiguated with a deterministic prefix,
//! `<identity>#<occurrence><SEPARATOR>`, and the original names stay
//! recoverable through [`HebGraph::origin_of`].
//!
//! ```
//! use hebg::behavior::Behavior;
//! use hebg::graph::HebGraph;
//! use hebg::node::{Action, FeatureCondition};
//! use hebg::unroll::unroll;
//!
//! let has_axe = FeatureCondition::new("Has axe ?", |axes: &u32| usize::from(*axes > 0));
//! let fetch = Behavior::explainable("Fetch axe", || {
//!     let mut g = HebGraph::new("Fetch axe");
//!     g.add_node(Action::new("take axe", "take axe"));
//!     Ok(g)
//! });
//!
//! let mut graph: HebGraph<u32, &str> = HebGraph::new("Cut tree");
//! graph.add_edge(has_axe.clone(), fetch, 0)?;
//! graph.add_edge(has_axe, Action::new("cut", "cut"), 1)?;
//!
//! let flat = unroll(&graph)?;
//! assert!(flat.contains("Fetch axe#1>take axe"));
//! assert_eq!(flat.origin_of("Fetch axe#1>take axe"), "take axe");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::behavior::Behavior;
use crate::graph::{HebGraph, StructureError};
use crate::node::Node;

/// Separator between the occurrence prefix and the spliced node's name.
pub const BEHAVIOR_SEPARATOR: &str = ">";

/// Flatten a behavior graph by inlining its explainable sub-behaviors.
///
/// The input is validated first; a malformed graph fails before any
/// expansion. Unrolling never mutates the input and is idempotent:
/// unrolling an already unrolled graph reproduces it label for label.
pub fn unroll<O, A>(graph: &HebGraph<O, A>) -> Result<HebGraph<O, A>, StructureError>
where
    A: Clone,
{
    graph.validate()?;
    let mut unroller = Unroller {
        out: HebGraph::new(graph.behavior()),
        active: FxHashSet::from_iter([graph.behavior().to_string()]),
        occurrences: FxHashMap::default(),
    };
    unroller.splice_graph(graph, "")?;
    Ok(unroller.out)
}

/// One unrolling pass over a graph and its transitive sub-graphs.
struct Unroller<O, A> {
    out: HebGraph<O, A>,
    /// Identities of behaviors currently being expanded on the call path.
    active: FxHashSet<String>,
    /// How many copies of each behavior identity have been spliced so far.
    occurrences: FxHashMap<String, usize>,
}

impl<O, A: Clone> Unroller<O, A> {
    /// Splice a whole graph into `out` under a label prefix.
    ///
    /// Returns the label of the spliced root, which stands in for the
    /// behavior node the graph replaces.
    fn splice_graph(
        &mut self,
        graph: &HebGraph<O, A>,
        prefix: &str,
    ) -> Result<String, StructureError> {
        let root = graph.root_index()?;
        // Fan-in safety: each source node is spliced exactly once, so
        // shared successors stay shared in the copy.
        let mut labels: FxHashMap<NodeIndex, String> = FxHashMap::default();
        for idx in graph.storage().node_indices() {
            let label = self.splice_node(graph, idx, prefix)?;
            labels.insert(idx, label);
        }
        for edge in graph.storage().edge_references() {
            self.out.link(
                &labels[&edge.source()],
                &labels[&edge.target()],
                *edge.weight(),
            )?;
        }
        Ok(labels[&root].clone())
    }

    /// Splice one node, expanding it if it is an expandable behavior.
    fn splice_node(
        &mut self,
        graph: &HebGraph<O, A>,
        idx: NodeIndex,
        prefix: &str,
    ) -> Result<String, StructureError> {
        let node = graph.node_at(idx);
        let label = format!("{prefix}{}", node.name());
        match node {
            Node::Action(action) => {
                self.out.add_node(action.with_name(label.clone()));
            }
            Node::FeatureCondition(condition) => {
                self.out.add_node(condition.with_name(label.clone()));
            }
            Node::Behavior(behavior) => {
                if self.expandable(graph, behavior)
                    && let Some(sub) = behavior.graph()?
                {
                    return self.expand(behavior.identity(), &sub, prefix);
                }
                self.out.add_node(behavior.with_name(label.clone()));
            }
            Node::Empty(placeholder) => {
                // Validation rejects placeholders before splicing starts.
                return Err(StructureError::UnresolvedPlaceholder {
                    name: placeholder.name().to_string(),
                });
            }
        }
        self.out.record_origin(&label, graph.origin_of(node.name()));
        Ok(label)
    }

    /// Whether a behavior node gets replaced by its own graph.
    fn expandable(&self, graph: &HebGraph<O, A>, behavior: &Behavior<O, A>) -> bool {
        if !behavior.is_explainable() {
            return false;
        }
        // A node with a recorded origin is a copy rolled by an earlier
        // unrolling pass; keeping it rolled makes unrolling idempotent.
        if graph.origin_of(behavior.name()) != behavior.name() {
            return false;
        }
        if self.active.contains(behavior.identity()) {
            tracing::warn!(
                behavior = %behavior.identity(),
                "behavior references itself through its sub-behaviors; keeping it rolled"
            );
            return false;
        }
        true
    }

    /// Replace a behavior node with a spliced copy of its graph.
    fn expand(
        &mut self,
        identity: &str,
        sub: &HebGraph<O, A>,
        prefix: &str,
    ) -> Result<String, StructureError> {
        let identity = identity.to_string();
        sub.validate()?;

        let occurrence = {
            let count = self.occurrences.entry(identity.clone()).or_insert(0);
            *count += 1;
            *count
        };
        let child_prefix = format!("{prefix}{identity}#{occurrence}{BEHAVIOR_SEPARATOR}");
        tracing::debug!(behavior = %identity, prefix = %child_prefix, "inlining behavior graph");

        self.active.insert(identity.clone());
        let root_label = self.splice_graph(sub, &child_prefix);
        self.active.remove(&identity);
        root_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Action, FeatureCondition};

    fn above_zero() -> FeatureCondition<i64> {
        FeatureCondition::new("Greater or equal to 0 ?", |obs: &i64| {
            usize::from(*obs >= 0)
        })
    }

    #[test]
    fn graph_without_behaviors_is_copied_verbatim() {
        let mut graph: HebGraph<i64, i64> = HebGraph::new("flat");
        graph.add_edge(above_zero(), Action::of(0), 0).unwrap();
        graph.add_edge(above_zero(), Action::of(1), 1).unwrap();

        let flat = unroll(&graph).unwrap();
        assert_eq!(flat.len(), 3);
        assert!(flat.contains("Greater or equal to 0 ?"));
        assert_eq!(flat.evaluate(&3).unwrap(), 1);
    }

    #[test]
    fn explainable_behavior_is_spliced_with_prefixed_labels() {
        let sub = Behavior::explainable("negate", || {
            let mut g: HebGraph<i64, i64> = HebGraph::new("negate");
            g.add_edge(above_zero(), Action::new("minus one", -1), 0)?;
            g.add_edge(above_zero(), Action::new("one", 1), 1)?;
            Ok(g)
        });

        let pick = FeatureCondition::new("pick", |obs: &i64| usize::from(*obs % 2 == 0));
        let mut graph: HebGraph<i64, i64> = HebGraph::new("top");
        graph.add_edge(pick.clone(), Action::of(9), 0).unwrap();
        graph.add_edge(pick, sub, 1).unwrap();

        let flat = unroll(&graph).unwrap();
        assert!(flat.contains("negate#1>Greater or equal to 0 ?"));
        assert!(flat.contains("negate#1>one"));
        assert_eq!(flat.origin_of("negate#1>one"), "one");
        // The spliced root inherits the behavior node's incoming edge.
        let next = flat.successor_with_index("pick", 1).unwrap();
        assert_eq!(next.name(), "negate#1>Greater or equal to 0 ?");
    }

    #[test]
    fn occurrences_of_one_behavior_get_distinct_prefixes() {
        let sub = Behavior::explainable("leaf", || {
            let mut g: HebGraph<i64, i64> = HebGraph::new("leaf");
            g.add_node(Action::of(7));
            Ok(g)
        });

        let outer = FeatureCondition::new("outer", |obs: &i64| usize::from(*obs >= 0));
        let mut graph: HebGraph<i64, i64> = HebGraph::new("top");
        graph.add_edge(outer.clone(), sub.clone(), 0).unwrap();
        graph
            .add_edge(outer, sub.with_name("leaf again"), 1)
            .unwrap();

        let flat = unroll(&graph).unwrap();
        assert!(flat.contains("leaf#1>action 7"));
        assert!(flat.contains("leaf#2>action 7"));
    }

    #[test]
    fn malformed_graph_fails_before_expansion() {
        let mut twin: HebGraph<i64, i64> = HebGraph::new("twin roots");
        twin.add_node(Action::of(0));
        twin.add_node(Action::of(1));
        assert!(matches!(
            unroll(&twin),
            Err(StructureError::MultipleRoots { .. })
        ));
    }
}
