use std::collections::BTreeSet;

use pellet_rush_core::{
    CellCoord, Command, Event, ItemSighting, Owner, Scores, TurnObservation, UnitId, UnitKind,
    UnitSighting,
};
use pellet_rush_engine::{EngineConfig, TurnEngine};
use pellet_rush_world::{query, Grid};

fn mine(id: u32, column: u32, row: u32, ability_cooldown: u32) -> UnitSighting {
    UnitSighting {
        id: UnitId::new(id),
        owner: Owner::Mine,
        cell: CellCoord::new(column, row),
        kind: UnitKind::Rock,
        speed_turns_left: 0,
        ability_cooldown,
    }
}

fn item(column: u32, row: u32) -> ItemSighting {
    ItemSighting {
        cell: CellCoord::new(column, row),
        value: 1,
    }
}

fn engine(rows: &[&str]) -> TurnEngine {
    let width = u32::try_from(rows[0].len()).expect("width fits");
    let height = u32::try_from(rows.len()).expect("height fits");
    let grid = Grid::from_drawing(width, height, rows).expect("valid drawing");
    TurnEngine::new(grid, EngineConfig::default())
}

#[test]
fn single_unit_heads_for_nearest_seen_item() {
    let mut engine = engine(&["   ", "   ", "   "]);

    let plan = engine.decide(TurnObservation {
        scores: Scores::default(),
        units: vec![mine(0, 1, 1, 4)],
        items: vec![item(1, 2)],
    });

    let items = query::items(engine.world());
    assert!(!items.has_normal(CellCoord::new(1, 0)));
    assert!(items.has_normal(CellCoord::new(1, 2)));
    assert_eq!(plan.render(), "MOVE 0 1 2");
}

#[test]
fn blocked_pair_yields_one_move() {
    let mut engine = engine(&["#######", "#     #", "#     #", "#######"]);
    let observation = TurnObservation {
        scores: Scores::default(),
        units: vec![mine(0, 2, 1, 6), mine(1, 4, 1, 6)],
        items: Vec::new(),
    };
    let _ = engine.decide(observation.clone());

    let plan = engine.decide(observation);

    let commands = plan.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].unit(), UnitId::new(1));
    assert!(matches!(commands[0], Command::Move { .. }));
    assert!(engine.last_events().contains(&Event::UnitBlocked {
        unit: UnitId::new(0),
        cell: CellCoord::new(2, 1),
    }));
}

#[test]
fn unresolved_pair_falls_through_to_default_assignment() {
    let mut engine = engine(&["#####", "#  ##", "#####", "#   #", "#####"]);
    let observation = TurnObservation {
        scores: Scores::default(),
        units: vec![mine(0, 1, 1, 2), mine(1, 2, 1, 2)],
        items: vec![item(1, 3)],
    };
    let _ = engine.decide(observation.clone());

    let plan = engine.decide(observation);

    assert_eq!(plan.render(), "MOVE 0 1 3 | MOVE 1 2 3");
}

#[test]
fn switch_comes_before_moves_and_speed() {
    let mut engine = engine(&["          ", "          "]);
    let first = TurnObservation {
        scores: Scores::default(),
        units: vec![mine(0, 0, 0, 0), mine(1, 9, 1, 4), mine(2, 5, 0, 0)],
        items: vec![item(8, 0), item(9, 0)],
    };
    let _ = engine.decide(first);

    let plan = engine.decide(TurnObservation {
        scores: Scores::default(),
        units: vec![mine(0, 0, 0, 0), mine(1, 9, 0, 4), mine(2, 5, 1, 0)],
        items: vec![item(8, 0)],
    });

    assert_eq!(plan.render(), "SWITCH 0 PAPER | MOVE 1 8 0 | SPEED 2");
}

#[test]
fn super_item_draws_every_free_unit() {
    let mut engine = engine(&["       "]);

    let plan = engine.decide(TurnObservation {
        scores: Scores::default(),
        units: vec![mine(0, 0, 0, 3), mine(1, 3, 0, 3)],
        items: vec![
            item(2, 0),
            ItemSighting {
                cell: CellCoord::new(6, 0),
                value: 10,
            },
        ],
    });

    assert_eq!(plan.render(), "MOVE 0 6 0 | MOVE 1 6 0");
}

#[test]
fn every_unit_gets_at_most_one_command_and_distinct_normal_targets() {
    let mut engine = engine(&["            ", "            ", "            "]);
    let mut observation = TurnObservation {
        scores: Scores::default(),
        units: (0..5).map(|id| mine(id, id * 2, 1, 7)).collect(),
        items: Vec::new(),
    };

    for turn in 0..3u32 {
        observation.scores.mine = turn;
        let plan = engine.decide(observation.clone());

        let units: Vec<_> = plan.commands().iter().map(Command::unit).collect();
        let distinct_units: BTreeSet<_> = units.iter().copied().collect();
        assert_eq!(units.len(), distinct_units.len());

        let targets: Vec<_> = plan
            .commands()
            .iter()
            .filter_map(|command| match command {
                Command::Move { destination, .. } => Some(*destination),
                _ => None,
            })
            .collect();
        let distinct_targets: BTreeSet<_> = targets.iter().copied().collect();
        assert_eq!(targets.len(), distinct_targets.len());
    }
}

#[test]
fn opponent_units_are_never_commanded() {
    let mut engine = engine(&["     "]);

    let plan = engine.decide(TurnObservation {
        scores: Scores::default(),
        units: vec![UnitSighting {
            owner: Owner::Opponent,
            ..mine(0, 2, 0, 0)
        }],
        items: vec![item(0, 0)],
    });

    assert!(plan.commands().is_empty());
    assert_eq!(query::opponent_units(engine.world()).len(), 1);
}

#[test]
fn config_reads_from_toml_with_defaults() {
    let config: EngineConfig = toml::from_str("speed_boost = false").expect("valid config");
    assert_eq!(
        config,
        EngineConfig {
            speed_boost: false,
            ..EngineConfig::default()
        }
    );
    assert_eq!(EngineConfig::default().pairing_reach, 3);
    assert!(toml::from_str::<EngineConfig>("speed = true").is_err());
}

#[test]
fn disabled_speed_boost_sends_ready_units_after_items() {
    let grid = Grid::from_drawing(4, 1, &["    "]).expect("valid drawing");
    let mut engine = TurnEngine::new(
        grid,
        EngineConfig {
            speed_boost: false,
            ..EngineConfig::default()
        },
    );

    let plan = engine.decide(TurnObservation {
        scores: Scores::default(),
        units: vec![mine(0, 0, 0, 0)],
        items: vec![item(3, 0)],
    });

    assert_eq!(plan.render(), "MOVE 0 3 0");
}
