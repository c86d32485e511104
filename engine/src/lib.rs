#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-turn decision loop for the Pellet Rush agent.
//!
//! [`TurnEngine::decide`] runs the phases of a turn strictly in order: ingest
//! the observation, resolve collisions between blocked friendly units, give
//! every remaining unit its default action, and hand back the [`TurnPlan`]
//! whose rendered line is the turn's output.

use pellet_rush_core::{Event, TurnObservation, TurnPlan};
use pellet_rush_system_assignment::Assignment;
use pellet_rush_system_collision::{Collision, DEFAULT_PAIRING_REACH};
use pellet_rush_world::{self as world, query, Grid, World};
use serde::Deserialize;
use tracing::{debug, info};

/// Tunables for the decision phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Strict bound on same-row or same-column separation for collision pairing.
    pub pairing_reach: u32,
    /// Lets idle units with a ready ability boost their speed.
    pub speed_boost: bool,
    /// Lets blocked units without a partner switch kind.
    pub switch_when_stuck: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pairing_reach: DEFAULT_PAIRING_REACH,
            speed_boost: true,
            switch_when_stuck: true,
        }
    }
}

/// Owns the inferred world and the systems that decide each turn.
#[derive(Debug)]
pub struct TurnEngine {
    world: World,
    collision: Collision,
    assignment: Assignment,
    events: Vec<Event>,
}

impl TurnEngine {
    /// Creates an engine for the provided map.
    #[must_use]
    pub fn new(grid: Grid, config: EngineConfig) -> Self {
        Self {
            world: World::new(grid),
            collision: Collision::new(config.pairing_reach, config.switch_when_stuck),
            assignment: Assignment::new(config.speed_boost),
            events: Vec::new(),
        }
    }

    /// Read-only access to the inferred world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events produced while ingesting the most recent observation.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// Decides every friendly unit's action for one turn.
    pub fn decide(&mut self, observation: TurnObservation) -> TurnPlan {
        self.events.clear();
        world::ingest(&mut self.world, observation, &mut self.events);
        for event in &self.events {
            debug!(?event, "world event");
        }

        let units = query::friendly_units(&self.world);
        let grid = query::grid(&self.world);
        let items = query::items(&self.world);
        let mut plan = TurnPlan::new();

        let report = self.collision.handle(&units, grid, items, &mut plan);
        debug!(
            pairs = ?report.pairs,
            unpaired = ?report.unpaired,
            "collisions handled"
        );

        self.assignment.handle(&units, grid, items, &mut plan);

        info!(
            turn = query::turn_index(&self.world),
            commands = plan.commands().len(),
            units = units.len(),
            "turn decided"
        );
        plan
    }
}
