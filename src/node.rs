//! Node model for hierarchical explainable behavior graphs.
//!
//! A behavior graph is made of a closed set of node variants:
//!
//! - [`Action`]: a terminal node carrying an opaque action value
//! - [`FeatureCondition`]: a branching node computing a discrete selector
//!   from an observation
//! - [`Behavior`](crate::behavior::Behavior): a named sub-policy, either
//!   explainable (owns a graph) or opaque (callable only)
//! - [`EmptyNode`]: a construction-time placeholder for unresolved targets
//!
//! Every algorithm in this crate (`evaluate`, `unroll`, `generate`) matches
//! exhaustively on [`Node`]; adding a variant is a deliberate, checked
//! extension. Nodes are identified by name within their owning graph; the
//! observation (`O`) and action (`A`) payloads stay opaque to the core.
//!
//! # Examples
//!
//! ```
//! use hebg::node::{Action, FeatureCondition, Node, NodeVariant};
//!
//! let pet: Action<&str> = Action::new("Pet the cat", "pet");
//! assert_eq!(pet.name(), "Pet the cat");
//!
//! let near = FeatureCondition::new("Is hand near the cat ?", |distance: &f64| {
//!     usize::from(*distance < 1.0)
//! });
//! assert_eq!(near.evaluate(&0.2), 1);
//! let near: Node<f64, &str> = near.into();
//! assert_eq!(near.variant(), NodeVariant::FeatureCondition);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::behavior::Behavior;

/// Callable computing a branch selector from an observation.
///
/// Expected (not enforced) to be pure and to return a non-negative index
/// matching one of the node's outgoing edges.
pub type ConditionFn<O> = Arc<dyn Fn(&O) -> usize + Send + Sync>;

/// Callable producing an action value directly from an observation.
///
/// Used by opaque behaviors and by the bindings injected into generated
/// decision units.
pub type PolicyFn<O, A> = Arc<dyn Fn(&O) -> A + Send + Sync>;

/// Classification of a node within a behavior graph.
///
/// Mirrors the closed variant set of [`Node`] without carrying payloads,
/// for use in diagnostics and structural checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeVariant {
    /// Terminal node yielding an action value.
    Action,
    /// Branching node computing an edge selector.
    FeatureCondition,
    /// Sub-policy node, explainable or opaque.
    Behavior,
    /// Unresolved construction placeholder.
    Empty,
}

impl NodeVariant {
    /// Terminal variants must have out-degree 0.
    ///
    /// Behaviors count as terminal regardless of explainability: the
    /// evaluator recurses into a behavior's own graph, never through
    /// outgoing edges of the behavior node itself.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeVariant::Action | NodeVariant::Behavior)
    }
}

impl fmt::Display for NodeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action => write!(f, "action"),
            Self::FeatureCondition => write!(f, "feature_condition"),
            Self::Behavior => write!(f, "behavior"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// A node of a behavior graph.
///
/// The generic parameters are the opaque observation (`O`) and action value
/// (`A`) types; the core never inspects either.
pub enum Node<O, A> {
    /// Terminal action node.
    Action(Action<A>),
    /// Branching feature condition node.
    FeatureCondition(FeatureCondition<O>),
    /// Sub-behavior node.
    Behavior(Behavior<O, A>),
    /// Construction placeholder; must not survive into a finished graph.
    Empty(EmptyNode),
}

impl<O, A> Node<O, A> {
    /// Name of this node, unique within its owning graph.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Node::Action(action) => action.name(),
            Node::FeatureCondition(condition) => condition.name(),
            Node::Behavior(behavior) => behavior.name(),
            Node::Empty(placeholder) => placeholder.name(),
        }
    }

    /// Variant classification of this node.
    #[must_use]
    pub fn variant(&self) -> NodeVariant {
        match self {
            Node::Action(_) => NodeVariant::Action,
            Node::FeatureCondition(_) => NodeVariant::FeatureCondition,
            Node::Behavior(_) => NodeVariant::Behavior,
            Node::Empty(_) => NodeVariant::Empty,
        }
    }
}

impl<O, A: Clone> Clone for Node<O, A> {
    fn clone(&self) -> Self {
        match self {
            Node::Action(action) => Node::Action(action.clone()),
            Node::FeatureCondition(condition) => Node::FeatureCondition(condition.clone()),
            Node::Behavior(behavior) => Node::Behavior(behavior.clone()),
            Node::Empty(placeholder) => Node::Empty(placeholder.clone()),
        }
    }
}

impl<O, A> fmt::Debug for Node<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("variant", &self.variant())
            .field("name", &self.name())
            .finish()
    }
}

impl<O, A> fmt::Display for Node<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl<O, A> From<Action<A>> for Node<O, A> {
    fn from(action: Action<A>) -> Self {
        Node::Action(action)
    }
}

impl<O, A> From<FeatureCondition<O>> for Node<O, A> {
    fn from(condition: FeatureCondition<O>) -> Self {
        Node::FeatureCondition(condition)
    }
}

impl<O, A> From<Behavior<O, A>> for Node<O, A> {
    fn from(behavior: Behavior<O, A>) -> Self {
        Node::Behavior(behavior)
    }
}

impl<O, A> From<EmptyNode> for Node<O, A> {
    fn from(placeholder: EmptyNode) -> Self {
        Node::Empty(placeholder)
    }
}

/// Terminal node holding an opaque action value.
///
/// Evaluation returns a clone of the value; the core never interprets it.
#[derive(Clone)]
pub struct Action<A> {
    name: String,
    value: A,
}

impl<A> Action<A> {
    /// Create a named action.
    pub fn new(name: impl Into<String>, value: A) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Name of this action node.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The opaque action value.
    #[must_use]
    pub fn value(&self) -> &A {
        &self.value
    }

    /// Copy of this action under a different graph label.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self
    where
        A: Clone,
    {
        Self {
            name: name.into(),
            value: self.value.clone(),
        }
    }
}

impl<A: fmt::Display> Action<A> {
    /// Create an action named after its value, `action <value>`.
    pub fn of(value: A) -> Self {
        let name = format!("action {value}");
        Self { name, value }
    }
}

impl<A> fmt::Debug for Action<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

/// Branching node computing a discrete edge selector from an observation.
pub struct FeatureCondition<O> {
    name: String,
    condition: ConditionFn<O>,
}

impl<O> FeatureCondition<O> {
    /// Create a named feature condition from a selector callable.
    pub fn new(
        name: impl Into<String>,
        condition: impl Fn(&O) -> usize + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            condition: Arc::new(condition),
        }
    }

    /// Name of this condition node.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compute the branch selector for an observation.
    #[must_use]
    pub fn evaluate(&self, observation: &O) -> usize {
        (self.condition)(observation)
    }

    /// The underlying selector callable.
    #[must_use]
    pub fn condition(&self) -> ConditionFn<O> {
        Arc::clone(&self.condition)
    }

    /// Copy of this condition under a different graph label.
    ///
    /// The selector callable is shared, not duplicated.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: Arc::clone(&self.condition),
        }
    }
}

impl<O> Clone for FeatureCondition<O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            condition: Arc::clone(&self.condition),
        }
    }
}

impl<O> fmt::Debug for FeatureCondition<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureCondition")
            .field("name", &self.name)
            .finish()
    }
}

/// Placeholder for an edge target that has not been resolved yet.
///
/// Useful while assembling graphs incrementally; a finished graph must not
/// contain any. [`HebGraph::validate`](crate::graph::HebGraph::validate)
/// rejects graphs that still do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmptyNode {
    name: String,
}

impl EmptyNode {
    /// Create a named placeholder.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name of this placeholder.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
