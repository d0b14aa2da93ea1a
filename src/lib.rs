//! Hierarchical explainable behavior graphs.
//!
//! A *behavior* maps an observation to an action. `hebg` represents
//! behaviors as edge-labeled decision graphs whose inner nodes are feature
//! conditions and whose leaves are actions or further behaviors, so a
//! policy stays inspectable at every level of its hierarchy:
//!
//! - [`node`] / [`behavior`]: the closed node model — actions, feature
//!   conditions, sub-behaviors (explainable or opaque), and placeholders.
//! - [`graph`]: the [`HebGraph`](graph::HebGraph) container with its
//!   structural invariants and the recursive evaluator.
//! - [`unroll`]: cycle-safe flattening of a hierarchy into one graph.
//! - [`codegen`]: compilation into a deterministic, standalone decision
//!   program plus the manifest of callables it needs.
//! - [`telemetry`]: opt-in `tracing` subscriber setup.
//!
//! Observation (`O`) and action (`A`) payloads are generic and opaque to
//! the library; conditions and policies are plain closures.
//!
//! # Quick Start
//!
//! ```
//! use hebg::graph::HebGraph;
//! use hebg::node::{Action, FeatureCondition};
//! use hebg::unroll::unroll;
//!
//! let above_zero = FeatureCondition::new("Greater or equal to 0 ?", |obs: &f64| {
//!     usize::from(*obs >= 0.0)
//! });
//!
//! let mut graph: HebGraph<f64, i64> = HebGraph::new("Is above zero");
//! graph.add_edge(above_zero.clone(), Action::of(0), 0)?;
//! graph.add_edge(above_zero, Action::of(1), 1)?;
//!
//! assert_eq!(graph.evaluate(&1.5)?, 1);
//!
//! // Flattening a graph without sub-behaviors is the identity.
//! let flat = unroll(&graph)?;
//! assert_eq!(flat.len(), graph.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod behavior;
pub mod codegen;
pub mod graph;
pub mod node;
pub mod telemetry;
pub mod unroll;

pub use behavior::Behavior;
pub use graph::{EvaluateError, HebGraph, StructureError};
pub use node::{Action, EmptyNode, FeatureCondition, Node, NodeVariant};
