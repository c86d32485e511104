//! Static walkable map parsed from the startup drawing.

use std::collections::BTreeSet;

use pellet_rush_core::{CellCoord, Direction};
use thiserror::Error;

use crate::DistanceField;

const WALL_GLYPH: char = '#';
const FLOOR_GLYPH: char = ' ';

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Impassable cell that also blocks sightlines.
    Wall,
    /// Walkable cell.
    Floor,
}

/// Reasons a map drawing cannot be turned into a [`Grid`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// Either dimension was zero.
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// The drawing did not contain one row per declared grid row.
    #[error("expected {expected} map rows, got {actual}")]
    RowCount {
        /// Declared height.
        expected: u32,
        /// Rows actually supplied.
        actual: usize,
    },
    /// A row was shorter or longer than the declared width.
    #[error("map row {row} is {actual} cells wide, expected {expected}")]
    RowWidth {
        /// Index of the offending row.
        row: usize,
        /// Declared width.
        expected: u32,
        /// Width of the supplied row.
        actual: usize,
    },
    /// The drawing contained a character other than a wall or floor glyph.
    #[error("unknown map glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Column of the offending character.
        column: usize,
        /// Row of the offending character.
        row: usize,
    },
}

/// Immutable wall/floor layout of the map.
///
/// Neighbour lookups wrap around the edges because the game's corridors
/// connect opposite borders. Sightline walks do not wrap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Parses a map drawing where `#` marks a wall and a space marks floor.
    pub fn from_drawing<S>(width: u32, height: u32, rows: &[S]) -> Result<Self, GridError>
    where
        S: AsRef<str>,
    {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        if rows.len() != height as usize {
            return Err(GridError::RowCount {
                expected: height,
                actual: rows.len(),
            });
        }

        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let actual = row.chars().count();
            if actual != width as usize {
                return Err(GridError::RowWidth {
                    row: row_index,
                    expected: width,
                    actual,
                });
            }

            for (column, glyph) in row.chars().enumerate() {
                let tile = match glyph {
                    WALL_GLYPH => Tile::Wall,
                    FLOOR_GLYPH => Tile::Floor,
                    _ => {
                        return Err(GridError::UnknownGlyph {
                            glyph,
                            column,
                            row: row_index,
                        })
                    }
                };
                tiles.push(tile);
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tile stored at the provided cell, if it lies on the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether the cell lies on the grid and is floor.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.tile(cell) == Some(Tile::Floor)
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let width = self.width;
        (0..self.height)
            .flat_map(move |row| (0..width).map(move |column| CellCoord::new(column, row)))
    }

    /// Cell one step away in `direction`, or `None` when the step leaves the grid.
    #[must_use]
    pub fn step(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.offset();
        let column = i64::from(cell.column()) + dx;
        let row = i64::from(cell.row()) + dy;
        let in_columns = (0..i64::from(self.width)).contains(&column);
        let in_rows = (0..i64::from(self.height)).contains(&row);
        if !in_columns || !in_rows {
            return None;
        }
        Some(CellCoord::new(
            u32::try_from(column).ok()?,
            u32::try_from(row).ok()?,
        ))
    }

    /// Cell one step away in `direction`, wrapping around the grid edges.
    #[must_use]
    pub fn wrapped_step(&self, cell: CellCoord, direction: Direction) -> CellCoord {
        let (dx, dy) = direction.offset();
        let column = (i64::from(cell.column()) + dx).rem_euclid(i64::from(self.width));
        let row = (i64::from(cell.row()) + dy).rem_euclid(i64::from(self.height));
        CellCoord::new(column as u32, row as u32)
    }

    /// Builds the Manhattan distance field centred on `origin`.
    #[must_use]
    pub fn distance_field(&self, origin: CellCoord) -> DistanceField {
        let mut field = DistanceField::default();
        field.rebuild_manhattan(self.width, self.height, origin);
        field
    }

    /// Picks the neighbour a unit at `cell` should step to.
    ///
    /// Neighbours are scanned left, right, up, down with wrap-around. The first
    /// neighbour holding an item wins immediately. Otherwise the *last* floor
    /// neighbour that is not banned is returned.
    #[must_use]
    pub fn best_neighbor<F>(
        &self,
        cell: CellCoord,
        has_item: F,
        banned: &BTreeSet<CellCoord>,
    ) -> Option<Direction>
    where
        F: Fn(CellCoord) -> bool,
    {
        let mut fallback = None;
        for direction in Direction::PRIORITY {
            let neighbor = self.wrapped_step(cell, direction);
            if has_item(neighbor) {
                return Some(direction);
            }
            if banned.contains(&neighbor) {
                continue;
            }
            if self.is_walkable(neighbor) {
                fallback = Some(direction);
            }
        }
        fallback
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.width && cell.row() < self.height {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
