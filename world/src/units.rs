//! Per-side unit records rebuilt from each turn's sightings.

use std::collections::BTreeMap;

use pellet_rush_core::{CellCoord, UnitId, UnitKind, UnitSighting, UnitSnapshot, UnitView};

#[derive(Clone, Debug)]
struct Unit {
    cell: CellCoord,
    kind: UnitKind,
    speed_turns_left: u32,
    ability_cooldown: u32,
    alive: bool,
    blocked: bool,
}

impl Unit {
    fn from_sighting(sighting: &UnitSighting) -> Self {
        Self {
            cell: sighting.cell,
            kind: sighting.kind,
            speed_turns_left: sighting.speed_turns_left,
            ability_cooldown: sighting.ability_cooldown,
            alive: true,
            blocked: false,
        }
    }

    fn refresh(&mut self, sighting: &UnitSighting) {
        self.blocked = self.cell == sighting.cell;
        self.cell = sighting.cell;
        self.kind = sighting.kind;
        self.speed_turns_left = sighting.speed_turns_left;
        self.ability_cooldown = sighting.ability_cooldown;
        self.alive = true;
    }
}

/// Unit records for one side, keyed by id.
#[derive(Clone, Debug, Default)]
pub(crate) struct Roster {
    units: BTreeMap<UnitId, Unit>,
}

impl Roster {
    /// Marks every record as not sighted ahead of a new batch of sightings.
    pub(crate) fn mark_all_unseen(&mut self) {
        for unit in self.units.values_mut() {
            unit.alive = false;
        }
    }

    /// Creates or refreshes the record for a sighted unit.
    pub(crate) fn observe(&mut self, sighting: &UnitSighting) {
        match self.units.get_mut(&sighting.id) {
            Some(unit) => unit.refresh(sighting),
            None => {
                let _ = self
                    .units
                    .insert(sighting.id, Unit::from_sighting(sighting));
            }
        }
    }

    /// Deletes every record that was not sighted, returning the removed ids.
    pub(crate) fn sweep_unseen(&mut self) -> Vec<UnitId> {
        let lost: Vec<UnitId> = self
            .units
            .iter()
            .filter(|(_, unit)| !unit.alive)
            .map(|(id, _)| *id)
            .collect();
        for id in &lost {
            let _ = self.units.remove(id);
        }
        lost
    }

    /// Captures a read-only view of the side's units.
    pub(crate) fn view(&self) -> UnitView {
        UnitView::from_snapshots(
            self.units
                .iter()
                .map(|(id, unit)| UnitSnapshot {
                    id: *id,
                    cell: unit.cell,
                    kind: unit.kind,
                    speed_turns_left: unit.speed_turns_left,
                    ability_cooldown: unit.ability_cooldown,
                    blocked: unit.blocked,
                })
                .collect(),
        )
    }

    /// Cells occupied by the side's units, in id order.
    pub(crate) fn cells(&self) -> Vec<CellCoord> {
        self.units.values().map(|unit| unit.cell).collect()
    }
}
