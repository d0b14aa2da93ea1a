//! Instantiation of generated programs with real callables.
//!
//! A [`GeneratedBehavior`](super::GeneratedBehavior) only names its
//! requirements; [`Bindings`] supplies the callables behind those names,
//! and binding resolves every name up front so the resulting
//! [`BoundBehavior`] runs without any lookups or missing-name failures.

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;

use super::Decision;
use crate::graph::EvaluateError;
use crate::node::{ConditionFn, PolicyFn};

/// A manifest requirement without a bound callable.
#[derive(Debug, Error, Diagnostic)]
pub enum BindingError {
    /// No callable was bound for an action name.
    #[error("no callable bound for action `{name}`")]
    #[diagnostic(
        code(hebg::codegen::missing_action),
        help("bind every name in the manifest's `actions` set")
    )]
    MissingAction { name: String },

    /// No callable was bound for a feature-condition name.
    #[error("no callable bound for feature condition `{name}`")]
    #[diagnostic(
        code(hebg::codegen::missing_feature_condition),
        help("bind every name in the manifest's `feature_conditions` set")
    )]
    MissingFeatureCondition { name: String },

    /// No callable was bound for a known-behavior name.
    #[error("no callable bound for behavior `{name}`")]
    #[diagnostic(
        code(hebg::codegen::missing_behavior),
        help("bind every name in the manifest's `known_behaviors` set")
    )]
    MissingBehavior { name: String },
}

/// Name-keyed callables satisfying a program's manifest.
///
/// Built fluently, one entry per call:
///
/// ```
/// use hebg::codegen::Bindings;
///
/// let bindings: Bindings<f64, i64> = Bindings::new()
///     .feature_condition("Greater or equal to 0 ?", |obs: &f64| {
///         usize::from(*obs >= 0.0)
///     })
///     .action("action 0", |_obs: &f64| 0)
///     .action("action 1", |_obs: &f64| 1);
/// ```
pub struct Bindings<O, A> {
    actions: FxHashMap<String, PolicyFn<O, A>>,
    feature_conditions: FxHashMap<String, ConditionFn<O>>,
    known_behaviors: FxHashMap<String, PolicyFn<O, A>>,
}

impl<O, A> Bindings<O, A> {
    /// Create an empty set of bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: FxHashMap::default(),
            feature_conditions: FxHashMap::default(),
            known_behaviors: FxHashMap::default(),
        }
    }

    /// Bind the callable behind an action name.
    #[must_use]
    pub fn action(
        mut self,
        name: impl Into<String>,
        policy: impl Fn(&O) -> A + Send + Sync + 'static,
    ) -> Self {
        self.actions.insert(name.into(), Arc::new(policy));
        self
    }

    /// Bind the selector behind a feature-condition name.
    #[must_use]
    pub fn feature_condition(
        mut self,
        name: impl Into<String>,
        condition: impl Fn(&O) -> usize + Send + Sync + 'static,
    ) -> Self {
        self.feature_conditions.insert(name.into(), Arc::new(condition));
        self
    }

    /// Bind the policy behind a known-behavior name.
    #[must_use]
    pub fn known_behavior(
        mut self,
        name: impl Into<String>,
        policy: impl Fn(&O) -> A + Send + Sync + 'static,
    ) -> Self {
        self.known_behaviors.insert(name.into(), Arc::new(policy));
        self
    }
}

impl<O, A> Default for Bindings<O, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// An executable decision program with all callables resolved.
pub struct BoundBehavior<O, A> {
    behavior: String,
    root: BoundDecision<O, A>,
}

enum BoundDecision<O, A> {
    Call(PolicyFn<O, A>),
    Branch {
        condition: String,
        selector: ConditionFn<O>,
        arms: Vec<(usize, BoundDecision<O, A>)>,
    },
}

impl<O, A> BoundBehavior<O, A> {
    /// Name of the behavior this program was generated from.
    #[must_use]
    pub fn behavior(&self) -> &str {
        &self.behavior
    }

    /// Produce the action for an observation.
    ///
    /// Reproduces the source graph's evaluation semantics over its covered
    /// domain; a selector outside its arms fails with
    /// [`EvaluateError::NoMatchingBranch`], exactly as evaluation does.
    pub fn call(&self, observation: &O) -> Result<A, EvaluateError> {
        Self::run(&self.root, observation)
    }

    fn run(decision: &BoundDecision<O, A>, observation: &O) -> Result<A, EvaluateError> {
        match decision {
            BoundDecision::Call(policy) => Ok(policy(observation)),
            BoundDecision::Branch {
                condition,
                selector,
                arms,
            } => {
                let index = selector(observation);
                let arm = arms.iter().find(|(arm_index, _)| *arm_index == index);
                match arm {
                    Some((_, next)) => Self::run(next, observation),
                    None => Err(EvaluateError::NoMatchingBranch {
                        condition: condition.clone(),
                        index,
                    }),
                }
            }
        }
    }
}

pub(super) fn bind_program<O, A>(
    behavior: &str,
    decision: &Decision,
    bindings: &Bindings<O, A>,
) -> Result<BoundBehavior<O, A>, BindingError> {
    Ok(BoundBehavior {
        behavior: behavior.to_string(),
        root: bind_decision(decision, bindings)?,
    })
}

fn bind_decision<O, A>(
    decision: &Decision,
    bindings: &Bindings<O, A>,
) -> Result<BoundDecision<O, A>, BindingError> {
    match decision {
        Decision::CallAction { name } => {
            let policy = bindings
                .actions
                .get(name)
                .ok_or_else(|| BindingError::MissingAction { name: name.clone() })?;
            Ok(BoundDecision::Call(Arc::clone(policy)))
        }
        Decision::CallBehavior { name } => {
            let policy = bindings
                .known_behaviors
                .get(name)
                .ok_or_else(|| BindingError::MissingBehavior { name: name.clone() })?;
            Ok(BoundDecision::Call(Arc::clone(policy)))
        }
        Decision::Branch { condition, arms } => {
            let selector = bindings.feature_conditions.get(condition).ok_or_else(|| {
                BindingError::MissingFeatureCondition {
                    name: condition.clone(),
                }
            })?;
            let mut bound = Vec::with_capacity(arms.len());
            for (index, arm) in arms {
                bound.push((*index, bind_decision(arm, bindings)?));
            }
            Ok(BoundDecision::Branch {
                condition: condition.clone(),
                selector: Arc::clone(selector),
                arms: bound,
            })
        }
    }
}
