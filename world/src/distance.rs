//! Dense distance field used to rank candidate targets.

use pellet_rush_core::CellCoord;

/// Dense Manhattan-distance grid centred on a single origin cell.
///
/// Distances ignore walls: the field ranks candidate items and never decides
/// whether a step is legal. Every on-grid cell holds a finite distance.
#[derive(Clone, Debug, Default)]
pub struct DistanceField {
    width: u32,
    height: u32,
    distances: Vec<u32>,
}

impl DistanceField {
    /// Rebuilds the distances for a `width` by `height` grid around `origin`.
    pub fn rebuild_manhattan(&mut self, width: u32, height: u32, origin: CellCoord) {
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        self.width = width;
        self.height = height;
        self.distances.clear();
        if cell_count == 0 {
            return;
        }

        self.distances.reserve(cell_count);
        for row in 0..height {
            for column in 0..width {
                self.distances
                    .push(origin.manhattan_distance(CellCoord::new(column, row)));
            }
        }
    }

    /// Width of the field in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the field in cells.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance captured for the provided cell, if it lies within the field.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        index(width, cell).and_then(|offset| self.distances.get(offset).copied())
    }
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
