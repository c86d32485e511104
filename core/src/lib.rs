#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pellet Rush agent.
//!
//! This crate defines the message surface that connects the I/O adapter, the
//! inferred world state, and the pure decision systems. The adapter hands the
//! world a [`TurnObservation`] each tick, the world ingests it and broadcasts
//! [`Event`] values describing what changed, and the systems read immutable
//! views before recording [`Command`] values into a shared [`TurnPlan`].

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use serde::{Deserialize, Serialize};

/// Separator placed between unit commands on a turn's output line.
pub const COMMAND_SEPARATOR: &str = " | ";

/// Item value reported for super items.
pub const SUPER_ITEM_VALUE: u32 = 10;

/// Commands that express every action a controlled unit may take in a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Requests that a unit travel toward the provided cell.
    Move {
        /// Identifier of the unit being moved.
        unit: UnitId,
        /// Cell the unit should head for.
        destination: CellCoord,
    },
    /// Requests that a unit activate its speed boost instead of moving.
    Speed {
        /// Identifier of the boosted unit.
        unit: UnitId,
    },
    /// Requests that a unit change its kind.
    Switch {
        /// Identifier of the unit changing kind.
        unit: UnitId,
        /// Kind the unit should become.
        kind: UnitKind,
    },
}

impl Command {
    /// Identifier of the unit the command is addressed to.
    #[must_use]
    pub const fn unit(&self) -> UnitId {
        match self {
            Self::Move { unit, .. } | Self::Speed { unit } | Self::Switch { unit, .. } => *unit,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { unit, destination } => write!(
                f,
                "MOVE {} {} {}",
                unit.get(),
                destination.column(),
                destination.row()
            ),
            Self::Speed { unit } => write!(f, "SPEED {}", unit.get()),
            Self::Switch { unit, kind } => write!(f, "SWITCH {} {kind}", unit.get()),
        }
    }
}

/// Events broadcast by the world after ingesting an observation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Reports the scores carried by the latest observation.
    ScoresUpdated {
        /// Scores reported for the turn.
        scores: Scores,
    },
    /// Announces that a unit record was reclaimed because it was not sighted.
    UnitLost {
        /// Identifier of the reclaimed unit.
        unit: UnitId,
        /// Side the reclaimed unit belonged to.
        owner: Owner,
    },
    /// Announces that a friendly unit reported the same cell as last turn.
    UnitBlocked {
        /// Identifier of the blocked unit.
        unit: UnitId,
        /// Cell the unit is stuck on.
        cell: CellCoord,
    },
    /// Reports how many normal items were removed from the known set.
    ItemsCleared {
        /// Number of items removed during the turn.
        count: usize,
        /// Number of normal items still believed to be on the map.
        remaining: usize,
    },
}

/// Cardinal directions available to units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Fixed neighbour scan order: left, right, up, down.
    pub const PRIORITY: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];

    /// Column and row delta applied by a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Identifier assigned to a unit by the game.
///
/// Friendly and opponent units draw from separate id spaces, so an id is only
/// unique together with its [`Owner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Side a sighted unit belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// Unit controlled by this agent.
    Mine,
    /// Unit controlled by the opponent. Never commanded.
    Opponent,
}

/// The three unit kinds, each beaten by exactly one other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Beats scissors, loses to paper.
    Rock,
    /// Beats rock, loses to scissors.
    Paper,
    /// Beats paper, loses to rock.
    Scissors,
}

impl UnitKind {
    /// Kind that beats `self`.
    #[must_use]
    pub const fn counter(self) -> Self {
        match self {
            Self::Rock => Self::Paper,
            Self::Paper => Self::Scissors,
            Self::Scissors => Self::Rock,
        }
    }

    /// Token used for the kind on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "ROCK",
            Self::Paper => "PAPER",
            Self::Scissors => "SCISSORS",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Scores reported at the start of a turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scores {
    /// Score accumulated by this agent.
    pub mine: u32,
    /// Score accumulated by the opponent.
    pub opponent: u32,
}

/// A single visible unit as reported for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSighting {
    /// Identifier of the sighted unit.
    pub id: UnitId,
    /// Side the unit belongs to.
    pub owner: Owner,
    /// Cell the unit occupies.
    pub cell: CellCoord,
    /// Current kind of the unit.
    pub kind: UnitKind,
    /// Turns of speed boost remaining.
    pub speed_turns_left: u32,
    /// Turns until the unit may use an ability again.
    pub ability_cooldown: u32,
}

/// A single visible item as reported for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSighting {
    /// Cell holding the item.
    pub cell: CellCoord,
    /// Points awarded for collecting the item.
    pub value: u32,
}

impl ItemSighting {
    /// Reports whether the item is a super item.
    #[must_use]
    pub const fn is_super(&self) -> bool {
        self.value == SUPER_ITEM_VALUE
    }
}

/// Everything the agent learns at the start of a turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnObservation {
    /// Scores at the start of the turn.
    pub scores: Scores,
    /// Units visible this turn, friendly and opponent alike.
    pub units: Vec<UnitSighting>,
    /// Items visible this turn, normal and super alike.
    pub items: Vec<ItemSighting>,
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Identifier of the unit.
    pub id: UnitId,
    /// Cell currently occupied by the unit.
    pub cell: CellCoord,
    /// Current kind of the unit.
    pub kind: UnitKind,
    /// Turns of speed boost remaining.
    pub speed_turns_left: u32,
    /// Turns until the unit may use an ability again.
    pub ability_cooldown: u32,
    /// Indicates that the unit reported the same cell as on the previous turn.
    pub blocked: bool,
}

impl UnitSnapshot {
    /// Reports whether the unit may use an ability this turn.
    #[must_use]
    pub const fn ability_ready(&self) -> bool {
        self.ability_cooldown == 0
    }
}

/// Read-only snapshot describing one side's units.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for the provided unit.
    #[must_use]
    pub fn get(&self, unit: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&unit, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Cells occupied by the captured units.
    #[must_use]
    pub fn cells(&self) -> BTreeSet<CellCoord> {
        self.snapshots.iter().map(|snapshot| snapshot.cell).collect()
    }

    /// Number of captured units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Turn-local decision context threaded through every decision phase.
///
/// A unit is decided at most once per turn and an item cell is claimed as a
/// target by at most one unit per turn. Commands keep the order in which they
/// were issued.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnPlan {
    commands: Vec<Command>,
    decided: BTreeSet<UnitId>,
    targets: BTreeMap<UnitId, CellCoord>,
}

impl TurnPlan {
    /// Creates an empty plan for a fresh turn.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a command and marks its unit as decided.
    ///
    /// Returns `false` and drops the command when the unit was already decided.
    pub fn issue(&mut self, command: Command) -> bool {
        if !self.decided.insert(command.unit()) {
            return false;
        }
        self.commands.push(command);
        true
    }

    /// Marks a unit as decided without emitting a command for it.
    pub fn hold(&mut self, unit: UnitId) {
        let _ = self.decided.insert(unit);
    }

    /// Reports whether the unit already has its decision for the turn.
    #[must_use]
    pub fn is_decided(&self, unit: UnitId) -> bool {
        self.decided.contains(&unit)
    }

    /// Claims `cell` as the target of `unit`.
    ///
    /// Returns `false` when another unit already claimed the cell this turn.
    pub fn claim(&mut self, unit: UnitId, cell: CellCoord) -> bool {
        if self
            .targets
            .iter()
            .any(|(owner, target)| *target == cell && *owner != unit)
        {
            return false;
        }
        let _ = self.targets.insert(unit, cell);
        true
    }

    /// Reports whether any unit claimed `cell` this turn.
    #[must_use]
    pub fn is_claimed(&self, cell: CellCoord) -> bool {
        self.targets.values().any(|target| *target == cell)
    }

    /// Target claimed by the unit this turn, if any.
    #[must_use]
    pub fn assigned_target(&self, unit: UnitId) -> Option<CellCoord> {
        self.targets.get(&unit).copied()
    }

    /// Commands issued so far, in issue order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Joins the issued commands into the single output line for the turn.
    #[must_use]
    pub fn render(&self) -> String {
        self.commands
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(COMMAND_SEPARATOR)
    }
}
