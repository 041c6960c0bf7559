use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Neighbor offsets in expansion order: up, right, down, left.
/// BFS tie-breaking depends on this order.
const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// A cell on the board. `x` is the row index, `y` the column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Manhattan distance between two cells
    pub fn manhattan(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Board description: dimensions plus the fixed start and end cells.
///
/// Immutable once built; reconfiguration replaces the whole value.
/// Deserialization goes through `Grid::new`, so every `Grid` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridSpec")]
pub struct Grid {
    rows: i32,
    cols: i32,
    start: Position,
    end: Position,
}

#[derive(Deserialize)]
struct GridSpec {
    rows: i32,
    cols: i32,
    start: Position,
    end: Position,
}

impl TryFrom<GridSpec> for Grid {
    type Error = SimError;

    fn try_from(spec: GridSpec) -> SimResult<Self> {
        Grid::new(spec.rows, spec.cols, spec.start, spec.end)
    }
}

impl Grid {
    /// Create a validated grid.
    ///
    /// Fails with `InvalidConfiguration` for non-positive dimensions or when
    /// start/end fall outside the board. `start == end` is accepted.
    pub fn new(rows: i32, cols: i32, start: Position, end: Position) -> SimResult<Self> {
        if rows <= 0 || cols <= 0 {
            return Err(SimError::invalid(format!(
                "grid dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        if rows.checked_mul(cols).is_none() {
            return Err(SimError::invalid(format!(
                "grid {}x{} has too many cells",
                rows, cols
            )));
        }

        let grid = Grid {
            rows,
            cols,
            start,
            end,
        };
        if !grid.is_in_bounds(start) {
            return Err(SimError::invalid(format!(
                "start {} outside {}x{} grid",
                start, rows, cols
            )));
        }
        if !grid.is_in_bounds(end) {
            return Err(SimError::invalid(format!(
                "end {} outside {}x{} grid",
                end, rows, cols
            )));
        }
        Ok(grid)
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// True iff `0 <= pos.x < rows` and `0 <= pos.y < cols`
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.rows && pos.y >= 0 && pos.y < self.cols
    }

    /// In-bounds axis-aligned neighbors, always in up/right/down/left order
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |(dx, dy)| Position::new(pos.x + dx, pos.y + dy))
            .filter(move |p| self.is_in_bounds(*p))
    }

    pub fn cell_count(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }

    /// Cell at row-major index `id`
    pub fn get_position(&self, id: usize) -> Position {
        let cols = self.cols as usize;
        Position::new((id / cols) as i32, (id % cols) as i32)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cell_count()).map(move |id| self.get_position(id))
    }
}
