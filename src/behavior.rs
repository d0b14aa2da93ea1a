//! Named observation → action policies.
//!
//! A [`Behavior`] is either *explainable* — it owns a behavior graph, built
//! lazily by a supplied build capability and memoized behind a single-writer
//! lock — or *opaque* — a bare callable the core invokes directly. The
//! distinction drives every downstream algorithm: evaluation recurses into
//! explainable graphs, unrolling splices them in place, and code generation
//! inlines them, while opaque behaviors always stay leaf calls.
//!
//! Behaviors carry a stable *identity* distinct from their display name.
//! Unrolling renames spliced node copies for global uniqueness, but cycle
//! detection and generated-code manifests always anchor on the identity.
//!
//! # Examples
//!
//! ```
//! use hebg::behavior::Behavior;
//!
//! // An opaque behavior: no graph, evaluation calls straight through.
//! let look: Behavior<String, &'static str> =
//!     Behavior::opaque("Look for a nearby cat", |_obs: &String| "move to cat");
//! assert!(!look.is_explainable());
//! assert_eq!(look.evaluate(&"anything".to_string()).unwrap(), "move to cat");
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::graph::{EvaluateError, HebGraph, StructureError};
use crate::node::PolicyFn;

/// Build capability producing a behavior's graph on first use.
pub type GraphBuildFn<O, A> =
    Arc<dyn Fn() -> Result<HebGraph<O, A>, StructureError> + Send + Sync>;

/// A named observation → action policy.
///
/// Cloning a behavior is cheap and shares the underlying policy or graph;
/// clones compare as the same identity for cycle detection.
pub struct Behavior<O, A> {
    name: String,
    core: Arc<BehaviorCore<O, A>>,
}

struct BehaviorCore<O, A> {
    identity: String,
    kind: BehaviorKind<O, A>,
}

enum BehaviorKind<O, A> {
    Opaque(PolicyFn<O, A>),
    Explainable {
        build: GraphBuildFn<O, A>,
        built: Mutex<Option<Arc<HebGraph<O, A>>>>,
    },
}

impl<O, A> Behavior<O, A> {
    /// Create an opaque behavior from a direct policy callable.
    pub fn opaque(
        name: impl Into<String>,
        policy: impl Fn(&O) -> A + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        Self {
            core: Arc::new(BehaviorCore {
                identity: name.clone(),
                kind: BehaviorKind::Opaque(Arc::new(policy)),
            }),
            name,
        }
    }

    /// Create an explainable behavior whose graph is built on first need.
    ///
    /// The build callable runs at most once on success; a failed build is
    /// surfaced as a [`StructureError`] and retried on the next access.
    /// Mutually referencing behaviors are expressed by constructing the
    /// partner behavior inside the build closure; the unroller's cycle
    /// guard keeps the resulting lazy recursion finite.
    pub fn explainable(
        name: impl Into<String>,
        build: impl Fn() -> Result<HebGraph<O, A>, StructureError> + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        Self {
            core: Arc::new(BehaviorCore {
                identity: name.clone(),
                kind: BehaviorKind::Explainable {
                    build: Arc::new(build),
                    built: Mutex::new(None),
                },
            }),
            name,
        }
    }

    /// Display name of this behavior node.
    ///
    /// Equal to [`identity`](Self::identity) unless the node is a renamed
    /// copy produced by unrolling.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable identity of the underlying policy.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.core.identity
    }

    /// Whether this behavior owns a graph.
    #[must_use]
    pub fn is_explainable(&self) -> bool {
        matches!(self.core.kind, BehaviorKind::Explainable { .. })
    }

    /// The behavior's graph, building and memoizing it on first access.
    ///
    /// Returns `Ok(None)` for opaque behaviors.
    pub fn graph(&self) -> Result<Option<Arc<HebGraph<O, A>>>, StructureError> {
        match &self.core.kind {
            BehaviorKind::Opaque(_) => Ok(None),
            BehaviorKind::Explainable { build, built } => {
                self.force(build, built).map(Some)
            }
        }
    }

    fn force(
        &self,
        build: &GraphBuildFn<O, A>,
        built: &Mutex<Option<Arc<HebGraph<O, A>>>>,
    ) -> Result<Arc<HebGraph<O, A>>, StructureError> {
        let mut slot = built.lock();
        if let Some(graph) = slot.as_ref() {
            return Ok(Arc::clone(graph));
        }
        tracing::debug!(behavior = %self.core.identity, "building behavior graph");
        let graph = Arc::new(build()?);
        *slot = Some(Arc::clone(&graph));
        Ok(graph)
    }

    /// Copy of this behavior under a different graph label.
    ///
    /// The policy, graph, and identity are shared; only the display name
    /// changes.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            core: Arc::clone(&self.core),
        }
    }
}

impl<O, A: Clone> Behavior<O, A> {
    /// Produce the action for an observation.
    ///
    /// Explainable behaviors evaluate their graph from its root; opaque
    /// behaviors invoke their callable directly.
    pub fn evaluate(&self, observation: &O) -> Result<A, EvaluateError> {
        match &self.core.kind {
            BehaviorKind::Opaque(policy) => Ok(policy(observation)),
            BehaviorKind::Explainable { build, built } => {
                self.force(build, built)?.evaluate(observation)
            }
        }
    }
}

impl<O, A> Clone for Behavior<O, A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            core: Arc::clone(&self.core),
        }
    }
}

impl<O, A> fmt::Debug for Behavior<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("name", &self.name)
            .field("identity", &self.core.identity)
            .field("explainable", &self.is_explainable())
            .finish()
    }
}

impl<O, A> fmt::Display for Behavior<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
