#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that groups blocked friendly units and resolves their collisions.
//!
//! A friendly unit that reports the same cell twice in a row is treated as
//! blocked. Blocked units close to each other are paired greedily; one unit of
//! each pair steps aside while the other waits. A blocked unit without a
//! partner tries to change kind instead.

use pellet_rush_core::{CellCoord, Command, TurnPlan, UnitId, UnitView};
use pellet_rush_world::{Grid, ItemTracker};
use tracing::{debug, warn};

/// Default strict bound on same-row or same-column separation for pairing.
pub const DEFAULT_PAIRING_REACH: u32 = 3;

/// Outcome of grouping the blocked units of a turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Pairs of blocked units to resolve, in discovery order.
    pub pairs: Vec<(UnitId, UnitId)>,
    /// Blocked units that found no partner, in discovery order.
    pub unpaired: Vec<UnitId>,
}

/// Collision grouping and resolution system.
#[derive(Debug)]
pub struct Collision {
    reach: u32,
    switch_when_stuck: bool,
    pending: Vec<UnitId>,
}

impl Collision {
    /// Creates a collision system with the provided pairing reach.
    ///
    /// When `switch_when_stuck` is false, unpaired blocked units are left to
    /// the default assignment instead of changing kind.
    #[must_use]
    pub fn new(reach: u32, switch_when_stuck: bool) -> Self {
        Self {
            reach,
            switch_when_stuck,
            pending: Vec::new(),
        }
    }

    /// Groups the blocked units of `units` into pairs and leftovers.
    ///
    /// The pending list is built in ascending id order. Units are taken from
    /// its back and matched with the first remaining unit, front to back, that
    /// is aligned with them. The result is deterministic but not an optimal
    /// matching.
    pub fn detect(&mut self, units: &UnitView) -> CollisionReport {
        self.pending.clear();
        self.pending
            .extend(units.iter().filter(|unit| unit.blocked).map(|unit| unit.id));

        let mut report = CollisionReport::default();
        while let Some(first) = self.pending.pop() {
            let Some(first_cell) = units.get(first).map(|unit| unit.cell) else {
                continue;
            };

            let partner = self.pending.iter().position(|candidate| {
                units
                    .get(*candidate)
                    .is_some_and(|unit| aligned(first_cell, unit.cell, self.reach))
            });

            match partner {
                Some(index) => {
                    let second = self.pending.remove(index);
                    debug!(
                        first = first.get(),
                        second = second.get(),
                        "collision pair found"
                    );
                    report.pairs.push((first, second));
                }
                None => report.unpaired.push(first),
            }
        }

        report
    }

    /// Detects collisions and records the resulting commands into `plan`.
    ///
    /// Unpaired units with a ready ability switch to the kind that beats their
    /// own. For each pair, the first unit tries to step to its best neighbour,
    /// then the second; whichever moves, both units are decided for the turn.
    /// When neither unit can move nothing is recorded for the pair.
    pub fn handle(
        &mut self,
        units: &UnitView,
        grid: &Grid,
        items: &ItemTracker,
        plan: &mut TurnPlan,
    ) -> CollisionReport {
        let report = self.detect(units);

        if self.switch_when_stuck {
            for unit in report.unpaired.iter().filter_map(|id| units.get(*id)) {
                if !unit.ability_ready() {
                    continue;
                }
                let kind = unit.kind.counter();
                if plan.issue(Command::Switch {
                    unit: unit.id,
                    kind,
                }) {
                    debug!(unit = unit.id.get(), %kind, "switching blocked unit");
                }
            }
        }

        let banned = units.cells();
        let has_item = |cell: CellCoord| items.has_normal(cell);
        for &(first, second) in &report.pairs {
            let (Some(first_unit), Some(second_unit)) = (units.get(first), units.get(second))
            else {
                continue;
            };

            let sidestep = [(first_unit, second), (second_unit, first)]
                .into_iter()
                .find_map(|(mover, waiter)| {
                    grid.best_neighbor(mover.cell, has_item, &banned)
                        .map(|direction| (mover, waiter, grid.wrapped_step(mover.cell, direction)))
                });

            match sidestep {
                Some((mover, waiter, destination)) => {
                    let _ = plan.issue(Command::Move {
                        unit: mover.id,
                        destination,
                    });
                    plan.hold(waiter);
                    debug!(
                        mover = mover.id.get(),
                        waiter = waiter.get(),
                        column = destination.column(),
                        row = destination.row(),
                        "collision resolved"
                    );
                }
                None => warn!(
                    first = first.get(),
                    second = second.get(),
                    "collision pair has no free neighbour"
                ),
            }
        }

        report
    }
}

impl Default for Collision {
    fn default() -> Self {
        Self::new(DEFAULT_PAIRING_REACH, true)
    }
}

/// Reports whether two cells are close enough to count as the same collision.
///
/// Cells sharing a column or row qualify when strictly closer than `reach`;
/// diagonal neighbours always qualify.
#[must_use]
pub fn aligned(first: CellCoord, second: CellCoord, reach: u32) -> bool {
    let dx = first.column().abs_diff(second.column());
    let dy = first.row().abs_diff(second.row());
    (dx == 0 && dy < reach) || (dy == 0 && dx < reach) || (dx == 1 && dy == 1)
}
