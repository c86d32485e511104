#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that gives every undecided friendly unit its default action.

use pellet_rush_core::{CellCoord, Command, TurnPlan, UnitSnapshot, UnitView};
use pellet_rush_world::{DistanceField, Grid, ItemTracker};
use tracing::debug;

/// Greedy target assignment system that reuses its distance field buffer.
#[derive(Debug)]
pub struct Assignment {
    speed_boost: bool,
    field: DistanceField,
}

impl Assignment {
    /// Creates an assignment system. `speed_boost` enables the SPEED action.
    #[must_use]
    pub fn new(speed_boost: bool) -> Self {
        Self {
            speed_boost,
            field: DistanceField::default(),
        }
    }

    /// Records a command for every unit of `units` not yet decided in `plan`.
    ///
    /// Units are visited in ascending id order. A unit with a ready ability
    /// that was not blocked boosts its speed. Any other unit heads for the
    /// nearest super item when one is known, regardless of other units
    /// chasing it. Otherwise it claims the nearest normal item no earlier unit
    /// claimed this turn. A unit with nothing to chase is left idle.
    pub fn handle(
        &mut self,
        units: &UnitView,
        grid: &Grid,
        items: &ItemTracker,
        plan: &mut TurnPlan,
    ) {
        for unit in units.iter() {
            if plan.is_decided(unit.id) {
                continue;
            }

            if self.speed_boost && unit.ability_ready() && !unit.blocked {
                let _ = plan.issue(Command::Speed { unit: unit.id });
                debug!(unit = unit.id.get(), "speed boost");
                continue;
            }

            let destination = match self.select_target(unit, grid, items, plan) {
                Some(Target::Super(cell)) => cell,
                Some(Target::Normal(cell)) if plan.claim(unit.id, cell) => cell,
                Some(Target::Normal(_)) => continue,
                None => {
                    debug!(unit = unit.id.get(), "no item left to chase");
                    continue;
                }
            };

            let _ = plan.issue(Command::Move {
                unit: unit.id,
                destination,
            });
        }
    }

    fn select_target(
        &mut self,
        unit: &UnitSnapshot,
        grid: &Grid,
        items: &ItemTracker,
        plan: &TurnPlan,
    ) -> Option<Target> {
        self.field
            .rebuild_manhattan(grid.width(), grid.height(), unit.cell);

        if let Some(target) = nearest(&self.field, items.super_items().iter().copied()) {
            debug!(
                unit = unit.id.get(),
                column = target.column(),
                row = target.row(),
                "heading for super item"
            );
            return Some(Target::Super(target));
        }

        let unclaimed = items.normal_items().filter(|cell| !plan.is_claimed(*cell));
        nearest(&self.field, unclaimed).map(Target::Normal)
    }
}

impl Default for Assignment {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Item chosen for a unit. Only normal items are claimed exclusively.
#[derive(Clone, Copy, Debug)]
enum Target {
    Super(CellCoord),
    Normal(CellCoord),
}

/// First candidate with the strictly smallest distance.
fn nearest<I>(field: &DistanceField, candidates: I) -> Option<CellCoord>
where
    I: IntoIterator<Item = CellCoord>,
{
    let mut best: Option<(u32, CellCoord)> = None;
    for cell in candidates {
        let Some(distance) = field.distance(cell) else {
            continue;
        };
        if best.map_or(true, |(closest, _)| distance < closest) {
            best = Some((distance, cell));
        }
    }
    best.map(|(_, cell)| cell)
}
