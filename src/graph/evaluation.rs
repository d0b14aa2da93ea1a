//! Recursive graph evaluation.
//!
//! Evaluation walks from the root: feature conditions compute a branch
//! index and follow the matching edge, action nodes yield their value, and
//! behavior nodes either recurse into their own graph (explainable) or call
//! through directly (opaque). Evaluation is pure; a failed call leaves the
//! graph fully usable.

use miette::Diagnostic;
use petgraph::graph::NodeIndex;
use thiserror::Error;

use super::{HebGraph, StructureError};
use crate::node::Node;

/// A contract violation between condition author and graph author.
///
/// Fatal to the evaluating call only; the graph itself stays valid.
#[derive(Debug, Error, Diagnostic)]
pub enum EvaluateError {
    /// A feature condition produced an index with no matching edge.
    #[error("feature condition `{condition}` returned branch index {index} with no matching edge")]
    #[diagnostic(
        code(hebg::graph::no_matching_branch),
        help("every index the condition can return needs an outgoing edge with that index")
    )]
    NoMatchingBranch { condition: String, index: usize },

    /// The graph (or a lazily built sub-graph) is malformed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Structure(#[from] StructureError),
}

impl<O, A: Clone> HebGraph<O, A> {
    /// Produce the action for an observation, walking from the root.
    pub fn evaluate(&self, observation: &O) -> Result<A, EvaluateError> {
        let root = self.root_index()?;
        self.evaluate_node(root, observation)
    }

    fn evaluate_node(&self, idx: NodeIndex, observation: &O) -> Result<A, EvaluateError> {
        match self.node_at(idx) {
            Node::Action(action) => Ok(action.value().clone()),
            Node::FeatureCondition(condition) => {
                let index = condition.evaluate(observation);
                match self.follow(idx, index) {
                    Some(next) => self.evaluate_node(next, observation),
                    None => Err(EvaluateError::NoMatchingBranch {
                        condition: condition.name().to_string(),
                        index,
                    }),
                }
            }
            Node::Behavior(behavior) => behavior.evaluate(observation),
            Node::Empty(placeholder) => Err(StructureError::UnresolvedPlaceholder {
                name: placeholder.name().to_string(),
            }
            .into()),
        }
    }
}
