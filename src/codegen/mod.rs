//! Compilation of behavior graphs into standalone decision programs.
//!
//! [`generate`] walks a graph in pre-order and compiles it into a
//! [`GeneratedBehavior`]: a nested-conditional [`Decision`] program, a
//! deterministic source rendering of that program, and a [`Manifest`] of
//! the callables the program needs at run time. The artifact carries no
//! graph callables itself; [`GeneratedBehavior::bind`] injects them by
//! name and yields an executable [`BoundBehavior`] reproducing the
//! graph's evaluation semantics.
//!
//! Explainable sub-behaviors are inlined into the program. A behavior that
//! is already being inlined further up the compilation path is emitted as
//! a `known_behaviors` call instead, the same guard that keeps unrolling
//! finite. Manifest entries and rendered names always use the original
//! (pre-unrolling) node names.
//!
//! ```
//! use hebg::codegen::generate;
//! use hebg::graph::HebGraph;
//! use hebg::node::{Action, FeatureCondition};
//!
//! let above = FeatureCondition::new("Greater or equal to 0 ?", |obs: &i64| {
//!     usize::from(*obs >= 0)
//! });
//! let mut graph: HebGraph<i64, i64> = HebGraph::new("Is above zero");
//! graph.add_edge(above.clone(), Action::of(0), 0)?;
//! graph.add_edge(above, Action::of(1), 1)?;
//!
//! let generated = generate(&graph)?;
//! assert_eq!(generated.entry_point(), "is_above_zero");
//! assert!(generated.manifest().actions.contains("action 1"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bind;
mod render;


pub use bind::{Bindings, BindingError, BoundBehavior};

use std::collections::BTreeSet;

use miette::Diagnostic;
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::{HebGraph, StructureError};
use crate::node::Node;

/// A malformed graph reached the code generator.
///
/// Generation is fail-fast: no partial artifact is ever produced.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerationError {
    /// A feature condition has no outgoing edges to compile into branches.
    #[error("feature condition `{condition}` has no outgoing edges")]
    #[diagnostic(
        code(hebg::codegen::dangling_condition),
        help("every feature condition needs at least one indexed branch")
    )]
    DanglingCondition { condition: String },

    /// The graph (or an inlined sub-graph) is structurally invalid.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Structure(#[from] StructureError),
}

/// Run-time requirements of a generated decision program.
///
/// Three disjoint name sets, keyed by original (pre-unrolling) node names,
/// each name at most once per set. `BTreeSet` keeps serialized manifests
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Actions the program calls through.
    pub actions: BTreeSet<String>,
    /// Feature conditions the program branches on.
    pub feature_conditions: BTreeSet<String>,
    /// Behaviors the program calls through without inlining them.
    pub known_behaviors: BTreeSet<String>,
}

/// A compiled decision program.
///
/// The tree mirrors the graph's branching structure with sub-behaviors
/// already inlined; leaves are name-keyed calls resolved at bind time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Call through the action bound under `name`.
    CallAction { name: String },
    /// Call through the behavior bound under `name`.
    CallBehavior { name: String },
    /// Evaluate the feature condition bound under `condition` and follow
    /// the arm matching its selector; arms are in ascending index order.
    Branch {
        condition: String,
        arms: Vec<(usize, Decision)>,
    },
}

/// The artifact produced by [`generate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedBehavior {
    behavior: String,
    entry_point: String,
    decision: Decision,
    source: String,
    manifest: Manifest,
}

impl GeneratedBehavior {
    /// Name of the behavior this program was generated from.
    #[must_use]
    pub fn behavior(&self) -> &str {
        &self.behavior
    }

    /// Snake-case entry-point name used in the rendered source.
    #[must_use]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// The compiled decision program.
    #[must_use]
    pub fn decision(&self) -> &Decision {
        &self.decision
    }

    /// Deterministic source rendering of the program.
    ///
    /// Byte-for-byte reproducible for a given graph.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run-time requirements of the program.
    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Resolve the program against a set of bindings.
    ///
    /// Every name the program calls through must be bound; the first
    /// missing one fails the whole bind. The returned unit reproduces
    /// [`HebGraph::evaluate`](crate::graph::HebGraph::evaluate) semantics
    /// over the graph's covered domain.
    pub fn bind<O, A>(
        &self,
        bindings: &Bindings<O, A>,
    ) -> Result<BoundBehavior<O, A>, BindingError> {
        bind::bind_program(&self.behavior, &self.decision, bindings)
    }
}

/// Compile a behavior graph into a decision program.
pub fn generate<O, A>(graph: &HebGraph<O, A>) -> Result<GeneratedBehavior, GenerationError> {
    graph.validate()?;
    let mut generator = Generator {
        manifest: Manifest::default(),
        active: FxHashSet::from_iter([graph.behavior().to_string()]),
    };
    let root = graph.root_index()?;
    let decision = generator.compile(graph, root)?;

    let entry_point = render::snake_case(graph.behavior());
    let source = render::render(&entry_point, &decision);
    Ok(GeneratedBehavior {
        behavior: graph.behavior().to_string(),
        entry_point,
        decision,
        source,
        manifest: generator.manifest,
    })
}

/// One compilation pass over a graph and its inlined sub-graphs.
struct Generator {
    manifest: Manifest,
    /// Identities of behaviors currently being inlined.
    active: FxHashSet<String>,
}

impl Generator {
    fn compile<O, A>(
        &mut self,
        graph: &HebGraph<O, A>,
        idx: NodeIndex,
    ) -> Result<Decision, GenerationError> {
        match graph.node_at(idx) {
            Node::Action(action) => {
                let name = graph.origin_of(action.name()).to_string();
                self.manifest.actions.insert(name.clone());
                Ok(Decision::CallAction { name })
            }
            Node::FeatureCondition(condition) => {
                let branches = graph.outgoing_sorted(idx);
                if branches.is_empty() {
                    return Err(GenerationError::DanglingCondition {
                        condition: condition.name().to_string(),
                    });
                }
                let name = graph.origin_of(condition.name()).to_string();
                self.manifest.feature_conditions.insert(name.clone());
                let mut arms = Vec::with_capacity(branches.len());
                for (index, target) in branches {
                    arms.push((index, self.compile(graph, target)?));
                }
                Ok(Decision::Branch {
                    condition: name,
                    arms,
                })
            }
            Node::Behavior(behavior) => {
                let identity = behavior.identity().to_string();
                if !self.active.contains(&identity)
                    && let Some(sub) = behavior.graph()?
                {
                    sub.validate()?;
                    tracing::debug!(behavior = %identity, "inlining behavior into program");
                    self.active.insert(identity.clone());
                    let root = sub.root_index()?;
                    let decision = self.compile(&sub, root);
                    self.active.remove(&identity);
                    return decision;
                }
                if behavior.is_explainable() {
                    tracing::debug!(
                        behavior = %identity,
                        "behavior is already being inlined; emitting a call instead"
                    );
                }
                let name = graph.origin_of(behavior.name()).to_string();
                self.manifest.known_behaviors.insert(name.clone());
                Ok(Decision::CallBehavior { name })
            }
            Node::Empty(placeholder) => Err(StructureError::UnresolvedPlaceholder {
                name: placeholder.name().to_string(),
            }
            .into()),
        }
    }
}
