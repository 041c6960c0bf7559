use crate::error::{SimError, SimResult};
use crate::grid::{Grid, Position};
use crate::trail::Trail;
use indexmap::IndexSet;
use rand::Rng;
use serde::Serialize;
use tracing::trace;

/// Default cap on rejected draws, per grid cell
pub const DEFAULT_ATTEMPTS_PER_CELL: u32 = 32;

/// Obstacles for a single tick, in the order they were placed.
///
/// Rebuilt wholesale every tick; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObstacleSet {
    cells: IndexSet<Position>,
}

impl ObstacleSet {
    pub fn empty() -> Self {
        ObstacleSet::default()
    }

    pub fn contains(&self, pos: &Position) -> bool {
        self.cells.contains(pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.cells.iter()
    }

    pub fn to_vec(&self) -> Vec<Position> {
        self.cells.iter().copied().collect()
    }
}

impl FromIterator<Position> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        ObstacleSet {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Cells that may hold an obstacle: everything except start, end and the trail
pub fn free_cell_count(trail: &Trail, grid: &Grid) -> usize {
    let mut excluded = trail.len();
    if !trail.contains(&grid.start()) {
        excluded += 1;
    }
    if grid.end() != grid.start() && !trail.contains(&grid.end()) {
        excluded += 1;
    }
    grid.cell_count().saturating_sub(excluded)
}

fn is_excluded(pos: &Position, trail: &Trail, grid: &Grid) -> bool {
    *pos == grid.start() || *pos == grid.end() || trail.contains(pos)
}

/// Rejection sampler for obstacle placement with a bounded number of draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleGenerator {
    attempts_per_cell: u32,
}

impl Default for ObstacleGenerator {
    fn default() -> Self {
        ObstacleGenerator::new(DEFAULT_ATTEMPTS_PER_CELL)
    }
}

impl ObstacleGenerator {
    pub fn new(attempts_per_cell: u32) -> Self {
        ObstacleGenerator {
            attempts_per_cell: attempts_per_cell.max(1),
        }
    }

    /// Maximum number of draws allowed for one call on `grid`
    pub fn max_attempts(&self, grid: &Grid) -> u64 {
        grid.cell_count() as u64 * u64::from(self.attempts_per_cell)
    }

    /// Place exactly `budget` distinct obstacles, none on start, end or trail.
    ///
    /// Draws cells uniformly and rejects excluded or duplicate ones. Fails
    /// with `Unsatisfiable` up front when there are fewer free cells than
    /// `budget`, or when the draw cap runs out. A zero budget consumes no
    /// randomness.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        trail: &Trail,
        budget: u32,
        grid: &Grid,
        rng: &mut R,
    ) -> SimResult<ObstacleSet> {
        if budget == 0 {
            return Ok(ObstacleSet::empty());
        }

        let available = free_cell_count(trail, grid);
        if available < budget as usize {
            return Err(SimError::Unsatisfiable {
                requested: budget,
                available,
            });
        }

        let max_attempts = self.max_attempts(grid);
        let mut cells = IndexSet::with_capacity(budget as usize);
        let mut attempts = 0u64;

        while cells.len() < budget as usize {
            if attempts >= max_attempts {
                trace!(
                    "obstacle sampling gave up after {} draws with {}/{} placed",
                    attempts,
                    cells.len(),
                    budget
                );
                return Err(SimError::Unsatisfiable {
                    requested: budget,
                    available,
                });
            }
            attempts += 1;

            let candidate = Position::new(
                rng.gen_range(0..grid.rows()),
                rng.gen_range(0..grid.cols()),
            );
            if is_excluded(&candidate, trail, grid) {
                continue;
            }
            cells.insert(candidate);
        }

        trace!("placed {} obstacles in {} draws", budget, attempts);
        Ok(ObstacleSet { cells })
    }
}
