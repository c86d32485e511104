//! Known collectible items under partial observability.

use std::collections::BTreeSet;

use pellet_rush_core::{CellCoord, Direction};
use tracing::trace;

use crate::Grid;

/// Tracks which cells are believed to still hold an item.
///
/// Normal items start on every floor cell and are only ever removed. Super
/// items are never inferred: the set is replaced by each turn's report.
#[derive(Clone, Debug)]
pub struct ItemTracker {
    width: u32,
    height: u32,
    normal: Vec<bool>,
    remaining: usize,
    supers: Vec<CellCoord>,
}

impl ItemTracker {
    /// Seeds a normal item on every floor cell of the grid.
    #[must_use]
    pub fn seeded_from(grid: &Grid) -> Self {
        let normal: Vec<bool> = grid.cells().map(|cell| grid.is_walkable(cell)).collect();
        let remaining = normal.iter().filter(|present| **present).count();
        Self {
            width: grid.width(),
            height: grid.height(),
            normal,
            remaining,
            supers: Vec::new(),
        }
    }

    /// Reports whether a normal item is believed to remain at `cell`.
    #[must_use]
    pub fn has_normal(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.normal.get(index).copied())
            .unwrap_or(false)
    }

    /// Forgets the normal item at `cell`. Returns `true` when one was known.
    pub fn remove(&mut self, cell: CellCoord) -> bool {
        let Some(slot) = self.index(cell).and_then(|index| self.normal.get_mut(index)) else {
            return false;
        };
        if !*slot {
            return false;
        }
        *slot = false;
        self.remaining -= 1;
        true
    }

    /// Folds one turn of observations into the known item set.
    ///
    /// Each friendly unit collects the item under it, then looks along the four
    /// axes until a wall or the grid edge. Any floor cell on such a sightline
    /// that was not reported in `visible` has been eaten. Returns the number of
    /// normal items removed.
    pub fn observe_turn(
        &mut self,
        grid: &Grid,
        unit_cells: &[CellCoord],
        visible: &BTreeSet<CellCoord>,
        supers: Vec<CellCoord>,
    ) -> usize {
        let before = self.remaining;

        for &origin in unit_cells {
            if self.remove(origin) {
                trace!(column = origin.column(), row = origin.row(), "item collected");
            }

            for direction in Direction::PRIORITY {
                let mut next = grid.step(origin, direction);
                while let Some(cell) = next {
                    if !grid.is_walkable(cell) {
                        break;
                    }
                    if !visible.contains(&cell) && self.remove(cell) {
                        trace!(column = cell.column(), row = cell.row(), "item inferred eaten");
                    }
                    next = grid.step(cell, direction);
                }
            }
        }

        self.supers = supers;
        before - self.remaining
    }

    /// Known normal items in row-major order.
    pub fn normal_items(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.width.max(1);
        self.normal
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(CellCoord::new(index % width, index / width))
            })
    }

    /// Number of normal items believed to remain.
    #[must_use]
    pub fn normal_count(&self) -> usize {
        self.remaining
    }

    /// Super items reported this turn, in report order.
    #[must_use]
    pub fn super_items(&self) -> &[CellCoord] {
        &self.supers
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }
}
