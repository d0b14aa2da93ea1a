//! Code generation: source snapshots, manifests, and bound-program
//! fidelity against graph evaluation.

mod common;

use common::*;
use hebg::codegen::{Bindings, generate};
use hebg::unroll::unroll;

const PET_A_CAT_SOURCE: &str = "\
fn pet_a_cat(observation: &Observation) -> Action {
    let edge_index = feature_conditions[\"Is a cat nearby ?\"](observation);
    if edge_index == 0 {
        known_behaviors[\"Look for a nearby cat\"](observation)
    } else if edge_index == 1 {
        let edge_index_1 = feature_conditions[\"Is my hand near the cat ?\"](observation);
        if edge_index_1 == 0 {
            known_behaviors[\"Move hand to cat\"](observation)
        } else if edge_index_1 == 1 {
            actions[\"Pet the cat\"](observation)
        } else {
            unreachable!()
        }
    } else {
        unreachable!()
    }
}
";

const GATHER_WOOD_SOURCE: &str = "\
fn gather_wood(observation: &Observation) -> Action {
    let edge_index = feature_conditions[\"Has axe ?\"](observation);
    if edge_index == 0 {
        let edge_index_1 = feature_conditions[\"Has wood ?\"](observation);
        if edge_index_1 == 0 {
            known_behaviors[\"Gather wood\"](observation)
        } else if edge_index_1 == 1 {
            actions[\"craft axe\"](observation)
        } else {
            unreachable!()
        }
    } else if edge_index == 1 {
        actions[\"cut tree\"](observation)
    } else {
        unreachable!()
    }
}
";

#[test]
fn pet_a_cat_source_snapshot() {
    let generated = generate(&pet_a_cat_graph()).unwrap();
    assert_eq!(generated.entry_point(), "pet_a_cat");
    assert_eq!(generated.source(), PET_A_CAT_SOURCE);
}

#[test]
fn pet_a_cat_manifest_lists_every_requirement_once() {
    let generated = generate(&pet_a_cat_graph()).unwrap();
    let manifest = generated.manifest();

    assert_eq!(
        manifest.actions.iter().map(String::as_str).collect::<Vec<_>>(),
        ["Pet the cat"]
    );
    assert_eq!(
        manifest
            .feature_conditions
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>(),
        ["Is a cat nearby ?", "Is my hand near the cat ?"]
    );
    assert_eq!(
        manifest
            .known_behaviors
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>(),
        ["Look for a nearby cat", "Move hand to cat"]
    );
}

#[test]
fn pet_a_cat_bound_program_matches_evaluation() {
    let graph = pet_a_cat_graph();
    let generated = generate(&graph).unwrap();

    let bindings: Bindings<PetObservation, &'static str> = Bindings::new()
        .feature_condition("Is a cat nearby ?", |obs: &PetObservation| {
            usize::from(obs.cat.is_some())
        })
        .feature_condition("Is my hand near the cat ?", |obs: &PetObservation| {
            usize::from(obs.cat == Some(obs.hand))
        })
        .action("Pet the cat", |_obs: &PetObservation| PET)
        .known_behavior("Look for a nearby cat", |_obs: &PetObservation| LOOK)
        .known_behavior("Move hand to cat", |_obs: &PetObservation| MOVE_HAND);
    let bound = generated.bind(&bindings).unwrap();

    for obs in [
        PetObservation {
            cat: None,
            hand: "computer",
        },
        PetObservation {
            cat: Some("sofa"),
            hand: "computer",
        },
        PetObservation {
            cat: Some("sofa"),
            hand: "sofa",
        },
    ] {
        assert_eq!(bound.call(&obs).unwrap(), graph.evaluate(&obs).unwrap());
    }
}

#[test]
fn cyclic_behavior_pair_compiles_to_a_known_behavior_call() {
    let gather = gather_wood();
    let graph = gather.graph().unwrap().unwrap();

    let generated = generate(&graph).unwrap();
    assert_eq!(generated.source(), GATHER_WOOD_SOURCE);
    assert_eq!(
        generated
            .manifest()
            .known_behaviors
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>(),
        ["Gather wood"]
    );
}

#[test]
fn generation_agrees_between_a_graph_and_its_unrolled_form() {
    let gather = gather_wood();
    let graph = gather.graph().unwrap().unwrap();
    let flat = unroll(&graph).unwrap();

    let from_graph = generate(&graph).unwrap();
    let from_flat = generate(&flat).unwrap();
    assert_eq!(from_graph.source(), from_flat.source());
    assert_eq!(from_graph.manifest(), from_flat.manifest());
}

#[test]
fn bound_cyclic_program_matches_evaluation_on_covered_inventories() {
    let gather = gather_wood();
    let graph = gather.graph().unwrap().unwrap();
    let generated = generate(&graph).unwrap();

    let bindings: Bindings<Inventory, &'static str> = Bindings::new()
        .feature_condition("Has axe ?", |inv: &Inventory| usize::from(inv.axes > 0))
        .feature_condition("Has wood ?", |inv: &Inventory| usize::from(inv.wood > 0))
        .action("cut tree", |_inv: &Inventory| "cut tree")
        .action("craft axe", |_inv: &Inventory| "craft axe")
        .known_behavior("Gather wood", |_inv: &Inventory| "cut tree");
    let bound = generated.bind(&bindings).unwrap();

    for inventory in [
        Inventory { axes: 1, wood: 0 },
        Inventory { axes: 2, wood: 5 },
        Inventory { axes: 0, wood: 1 },
    ] {
        assert_eq!(
            bound.call(&inventory).unwrap(),
            graph.evaluate(&inventory).unwrap()
        );
    }
}

#[test]
fn serialized_manifest_is_deterministic() {
    let first = generate(&pet_a_cat_graph()).unwrap();
    let second = generate(&pet_a_cat_graph()).unwrap();

    let first_json = serde_json::to_string(first.manifest()).unwrap();
    let second_json = serde_json::to_string(second.manifest()).unwrap();
    assert_eq!(first_json, second_json);
    assert!(first_json.contains("\"feature_conditions\""));
}
