use std::collections::BTreeSet;

use pellet_rush_core::{
    CellCoord, Command, ItemSighting, Owner, Scores, TurnObservation, TurnPlan, UnitId, UnitKind,
    UnitSighting,
};
use pellet_rush_system_assignment::Assignment;
use pellet_rush_world::{self as world, query, Grid, World};

fn sighting(id: u32, column: u32, row: u32, ability_cooldown: u32) -> UnitSighting {
    UnitSighting {
        id: UnitId::new(id),
        owner: Owner::Mine,
        cell: CellCoord::new(column, row),
        kind: UnitKind::Paper,
        speed_turns_left: 0,
        ability_cooldown,
    }
}

fn item(column: u32, row: u32, value: u32) -> ItemSighting {
    ItemSighting {
        cell: CellCoord::new(column, row),
        value,
    }
}

fn observed_world(rows: &[&str], observations: Vec<TurnObservation>) -> World {
    let width = u32::try_from(rows[0].len()).expect("width fits");
    let height = u32::try_from(rows.len()).expect("height fits");
    let mut world = World::new(Grid::from_drawing(width, height, rows).expect("valid drawing"));
    let mut events = Vec::new();
    for observation in observations {
        world::ingest(&mut world, observation, &mut events);
    }
    world
}

fn assign(world: &World, assignment: &mut Assignment, plan: &mut TurnPlan) {
    assignment.handle(
        &query::friendly_units(world),
        query::grid(world),
        query::items(world),
        plan,
    );
}

fn move_targets(plan: &TurnPlan) -> Vec<(UnitId, CellCoord)> {
    plan.commands()
        .iter()
        .filter_map(|command| match command {
            Command::Move { unit, destination } => Some((*unit, *destination)),
            _ => None,
        })
        .collect()
}

#[test]
fn units_never_share_a_normal_target() {
    let world = observed_world(
        &["#####", "#   #", "#####"],
        vec![TurnObservation {
            scores: Scores::default(),
            units: vec![sighting(0, 1, 1, 5), sighting(1, 1, 1, 5)],
            items: vec![item(2, 1, 1), item(3, 1, 1)],
        }],
    );
    let mut plan = TurnPlan::new();

    assign(&world, &mut Assignment::default(), &mut plan);

    assert_eq!(
        move_targets(&plan),
        vec![
            (UnitId::new(0), CellCoord::new(2, 1)),
            (UnitId::new(1), CellCoord::new(3, 1)),
        ]
    );
    assert_eq!(plan.assigned_target(UnitId::new(1)), Some(CellCoord::new(3, 1)));
}

#[test]
fn claims_hold_across_many_units() {
    let world = observed_world(
        &["         ", "         ", "         "],
        vec![TurnObservation {
            scores: Scores::default(),
            units: (0..4).map(|id| sighting(id, 4, 1, 9)).collect(),
            items: (0..9)
                .flat_map(|column| (0..3).map(move |row| item(column, row, 1)))
                .collect(),
        }],
    );
    let mut plan = TurnPlan::new();

    assign(&world, &mut Assignment::default(), &mut plan);

    let targets = move_targets(&plan);
    assert_eq!(targets.len(), 4);
    let distinct: BTreeSet<_> = targets.iter().map(|(_, cell)| *cell).collect();
    assert_eq!(distinct.len(), 4);
}

#[test]
fn ready_unit_boosts_instead_of_moving() {
    let world = observed_world(
        &["     "],
        vec![TurnObservation {
            scores: Scores::default(),
            units: vec![sighting(0, 0, 0, 0), sighting(1, 4, 0, 2)],
            items: vec![item(1, 0, 1)],
        }],
    );
    let mut plan = TurnPlan::new();

    assign(&world, &mut Assignment::default(), &mut plan);

    assert_eq!(plan.commands()[0], Command::Speed { unit: UnitId::new(0) });
    assert_eq!(
        plan.commands()[1],
        Command::Move {
            unit: UnitId::new(1),
            destination: CellCoord::new(1, 0),
        }
    );
}

#[test]
fn blocked_unit_moves_even_with_ready_ability() {
    let observation = TurnObservation {
        scores: Scores::default(),
        units: vec![sighting(0, 0, 0, 0)],
        items: vec![item(3, 0, 1)],
    };
    let world = observed_world(&["    "], vec![observation.clone(), observation]);
    let mut plan = TurnPlan::new();

    assign(&world, &mut Assignment::default(), &mut plan);

    assert_eq!(move_targets(&plan), vec![(UnitId::new(0), CellCoord::new(3, 0))]);
}

#[test]
fn super_item_overrides_closer_normal_item() {
    let world = observed_world(
        &["       "],
        vec![TurnObservation {
            scores: Scores::default(),
            units: vec![sighting(0, 0, 0, 3)],
            items: vec![item(1, 0, 1), item(6, 0, 10), item(5, 0, 10)],
        }],
    );
    let mut plan = TurnPlan::new();

    assign(&world, &mut Assignment::default(), &mut plan);

    assert_eq!(move_targets(&plan), vec![(UnitId::new(0), CellCoord::new(5, 0))]);
}

#[test]
fn every_unit_chases_the_single_super_item() {
    let world = observed_world(
        &["       "],
        vec![TurnObservation {
            scores: Scores::default(),
            units: vec![sighting(0, 0, 0, 3), sighting(1, 3, 0, 3)],
            items: vec![item(2, 0, 1), item(6, 0, 10)],
        }],
    );
    let mut plan = TurnPlan::new();

    assign(&world, &mut Assignment::default(), &mut plan);

    assert_eq!(
        move_targets(&plan),
        vec![
            (UnitId::new(0), CellCoord::new(6, 0)),
            (UnitId::new(1), CellCoord::new(6, 0)),
        ]
    );
    assert!(!plan.is_claimed(CellCoord::new(6, 0)));
}

#[test]
fn normal_claims_hold_once_supers_are_gone() {
    let world = observed_world(
        &["       "],
        vec![TurnObservation {
            scores: Scores::default(),
            units: vec![sighting(0, 0, 0, 3), sighting(1, 3, 0, 3)],
            items: vec![item(1, 0, 1), item(2, 0, 1)],
        }],
    );
    let mut plan = TurnPlan::new();

    assign(&world, &mut Assignment::default(), &mut plan);

    assert_eq!(
        move_targets(&plan),
        vec![
            (UnitId::new(0), CellCoord::new(1, 0)),
            (UnitId::new(1), CellCoord::new(2, 0)),
        ]
    );
}

#[test]
fn decided_units_are_skipped() {
    let world = observed_world(
        &["   "],
        vec![TurnObservation {
            scores: Scores::default(),
            units: vec![sighting(0, 0, 0, 0)],
            items: Vec::new(),
        }],
    );
    let mut plan = TurnPlan::new();
    plan.hold(UnitId::new(0));

    assign(&world, &mut Assignment::default(), &mut plan);

    assert!(plan.commands().is_empty());
}

#[test]
fn unit_without_items_stays_idle() {
    let world = observed_world(
        &["   "],
        vec![TurnObservation {
            scores: Scores::default(),
            units: vec![sighting(0, 1, 0, 4)],
            items: Vec::new(),
        }],
    );
    let mut plan = TurnPlan::new();

    assign(&world, &mut Assignment::new(false), &mut plan);

    assert!(plan.commands().is_empty());
    assert!(!plan.is_decided(UnitId::new(0)));
}
