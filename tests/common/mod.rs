//! Shared fixtures for integration tests.
//!
//! Three small behavior families are used throughout:
//! - threshold behaviors over scalar observations,
//! - the pet-a-cat household scenario (opaque leaf behaviors),
//! - the mutually referencing gather-wood / get-new-axe pair.

#![allow(dead_code)]

use hebg::behavior::Behavior;
use hebg::graph::HebGraph;
use hebg::node::{Action, FeatureCondition};

/// Threshold condition: selector 1 when the observation reaches `threshold`.
pub fn greater_or_equal(threshold: i64) -> FeatureCondition<i64> {
    FeatureCondition::new(
        format!("Greater or equal to {threshold} ?"),
        move |obs: &i64| usize::from(*obs >= threshold),
    )
}

/// `F-A` graph: one threshold condition picking between two actions.
pub fn threshold_graph() -> HebGraph<i64, i64> {
    let mut graph = HebGraph::new("Is above zero");
    graph.add_edge(greater_or_equal(0), Action::of(0), 0).unwrap();
    graph.add_edge(greater_or_equal(0), Action::of(1), 1).unwrap();
    graph
}

/// Where the cat and the hand currently are.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PetObservation {
    pub cat: Option<&'static str>,
    pub hand: &'static str,
}

pub const PET: &str = "pet the cat";
pub const LOOK: &str = "look for a nearby cat";
pub const MOVE_HAND: &str = "move hand to cat";

pub fn cat_is_nearby() -> FeatureCondition<PetObservation> {
    FeatureCondition::new("Is a cat nearby ?", |obs: &PetObservation| {
        usize::from(obs.cat.is_some())
    })
}

pub fn hand_is_near_cat() -> FeatureCondition<PetObservation> {
    FeatureCondition::new("Is my hand near the cat ?", |obs: &PetObservation| {
        usize::from(obs.cat == Some(obs.hand))
    })
}

/// The pet-a-cat decision graph: look for a cat, bring the hand close,
/// then pet. The two movement leaves are opaque behaviors.
pub fn pet_a_cat_graph() -> HebGraph<PetObservation, &'static str> {
    let look = Behavior::opaque("Look for a nearby cat", |_obs: &PetObservation| LOOK);
    let move_hand = Behavior::opaque("Move hand to cat", |_obs: &PetObservation| MOVE_HAND);

    let mut graph = HebGraph::new("Pet a cat");
    graph.add_edge(cat_is_nearby(), look, 0).unwrap();
    graph.add_edge(cat_is_nearby(), hand_is_near_cat(), 1).unwrap();
    graph.add_edge(hand_is_near_cat(), move_hand, 0).unwrap();
    graph
        .add_edge(hand_is_near_cat(), Action::new("Pet the cat", PET), 1)
        .unwrap();
    graph
}

/// What the agent is carrying.
#[derive(Clone, Copy, Debug)]
pub struct Inventory {
    pub axes: u32,
    pub wood: u32,
}

/// Gathering wood needs an axe; crafting an axe needs wood. The two
/// behaviors reference each other, which makes them the canonical cycle
/// fixture for unrolling and generation.
pub fn gather_wood() -> Behavior<Inventory, &'static str> {
    Behavior::explainable("Gather wood", || {
        let has_axe =
            FeatureCondition::new("Has axe ?", |inv: &Inventory| usize::from(inv.axes > 0));
        let mut graph = HebGraph::new("Gather wood");
        graph.add_edge(has_axe.clone(), get_new_axe(), 0)?;
        graph.add_edge(has_axe, Action::new("cut tree", "cut tree"), 1)?;
        Ok(graph)
    })
}

pub fn get_new_axe() -> Behavior<Inventory, &'static str> {
    Behavior::explainable("Get new axe", || {
        let has_wood =
            FeatureCondition::new("Has wood ?", |inv: &Inventory| usize::from(inv.wood > 0));
        let mut graph = HebGraph::new("Get new axe");
        graph.add_edge(has_wood.clone(), gather_wood(), 0)?;
        graph.add_edge(has_wood, Action::new("craft axe", "craft axe"), 1)?;
        Ok(graph)
    })
}

/// Sorted node labels and edge triples, for structural comparisons.
pub fn structure<O, A>(graph: &HebGraph<O, A>) -> (Vec<String>, Vec<(String, String, usize)>) {
    let mut nodes: Vec<String> = graph.nodes().map(|node| node.name().to_string()).collect();
    nodes.sort();
    let mut edges: Vec<(String, String, usize)> = graph
        .edges()
        .map(|(source, destination, index)| {
            (
                source.name().to_string(),
                destination.name().to_string(),
                index,
            )
        })
        .collect();
    edges.sort();
    (nodes, edges)
}
