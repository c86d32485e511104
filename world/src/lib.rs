#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Inferred world state for the Pellet Rush agent.
//!
//! The world owns the static [`Grid`], the [`ItemTracker`] and one unit roster
//! per side. It only changes through [`ingest`], which folds a turn's
//! observation in and reports what changed as [`Event`] values. Systems read it
//! through the [`query`] module.

mod distance;
mod grid;
mod items;
mod units;

use std::collections::BTreeSet;

use pellet_rush_core::{CellCoord, Event, Owner, Scores, TurnObservation};
use tracing::debug;

pub use distance::DistanceField;
pub use grid::{Grid, GridError, Tile};
pub use items::ItemTracker;

use units::Roster;

/// Authoritative inferred state carried from one turn to the next.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    items: ItemTracker,
    friendly: Roster,
    opponent: Roster,
    scores: Scores,
    turn_index: u64,
}

impl World {
    /// Creates a world for the provided map with every floor cell holding an item.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        let items = ItemTracker::seeded_from(&grid);
        Self {
            grid,
            items,
            friendly: Roster::default(),
            opponent: Roster::default(),
            scores: Scores::default(),
            turn_index: 0,
        }
    }
}

/// Folds a turn's observation into the world.
///
/// Unit records are swept in two phases: every record is marked unseen, the
/// sightings refresh or create records, then the records left unseen are
/// deleted. Item knowledge is updated afterwards from the surviving friendly
/// positions.
pub fn ingest(world: &mut World, observation: TurnObservation, out_events: &mut Vec<Event>) {
    world.turn_index = world.turn_index.saturating_add(1);
    world.scores = observation.scores;
    out_events.push(Event::ScoresUpdated {
        scores: observation.scores,
    });

    world.friendly.mark_all_unseen();
    world.opponent.mark_all_unseen();
    for sighting in &observation.units {
        match sighting.owner {
            Owner::Mine => world.friendly.observe(sighting),
            Owner::Opponent => world.opponent.observe(sighting),
        }
    }
    for (owner, roster) in [
        (Owner::Mine, &mut world.friendly),
        (Owner::Opponent, &mut world.opponent),
    ] {
        for unit in roster.sweep_unseen() {
            out_events.push(Event::UnitLost { unit, owner });
        }
    }

    for unit in world.friendly.view().iter().filter(|unit| unit.blocked) {
        out_events.push(Event::UnitBlocked {
            unit: unit.id,
            cell: unit.cell,
        });
    }

    let visible: BTreeSet<CellCoord> = observation.items.iter().map(|item| item.cell).collect();
    let supers: Vec<CellCoord> = observation
        .items
        .iter()
        .filter(|item| item.is_super())
        .map(|item| item.cell)
        .collect();
    let unit_cells = world.friendly.cells();
    let count = world
        .items
        .observe_turn(&world.grid, &unit_cells, &visible, supers);
    out_events.push(Event::ItemsCleared {
        count,
        remaining: world.items.normal_count(),
    });

    debug!(
        turn = world.turn_index,
        score = world.scores.mine,
        opponent_score = world.scores.opponent,
        friendly = unit_cells.len(),
        visible_items = visible.len(),
        cleared = count,
        remaining = world.items.normal_count(),
        "observation ingested"
    );
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Grid, ItemTracker, World};
    use pellet_rush_core::{Scores, UnitView};

    /// Provides read-only access to the static map.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Provides read-only access to the known item sets.
    #[must_use]
    pub fn items(world: &World) -> &ItemTracker {
        &world.items
    }

    /// Captures a read-only view of the units this agent controls.
    #[must_use]
    pub fn friendly_units(world: &World) -> UnitView {
        world.friendly.view()
    }

    /// Captures a read-only view of the opponent units currently visible.
    #[must_use]
    pub fn opponent_units(world: &World) -> UnitView {
        world.opponent.view()
    }

    /// Scores reported with the latest observation.
    #[must_use]
    pub fn scores(world: &World) -> Scores {
        world.scores
    }

    /// Number of observations ingested so far.
    #[must_use]
    pub fn turn_index(world: &World) -> u64 {
        world.turn_index
    }
}
