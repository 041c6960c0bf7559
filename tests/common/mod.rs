#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shiftgrid::{Grid, ObstacleSet, Position, Snapshot, Trail};
use std::collections::HashSet;

pub fn pos(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

pub fn grid(rows: i32, cols: i32, start: (i32, i32), end: (i32, i32)) -> Grid {
    Grid::new(rows, cols, pos(start.0, start.1), pos(end.0, end.1)).expect("valid test grid")
}

/// 5x5 board from (0,0) to (4,4)
pub fn reference_grid() -> Grid {
    grid(5, 5, (0, 0), (4, 4))
}

pub fn trail_of(cells: &[(i32, i32)]) -> Trail {
    let mut trail = Trail::new(pos(cells[0].0, cells[0].1));
    for &(x, y) in &cells[1..] {
        trail.push(pos(x, y));
    }
    trail
}

pub fn obstacles_of(cells: &[(i32, i32)]) -> ObstacleSet {
    cells.iter().map(|&(x, y)| pos(x, y)).collect()
}

pub fn positions(cells: &[(i32, i32)]) -> Vec<Position> {
    cells.iter().map(|&(x, y)| pos(x, y)).collect()
}

pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Check the obstacle exclusion rules against a snapshot
pub fn assert_obstacles_valid(grid: &Grid, snapshot: &Snapshot) {
    let mut seen = HashSet::new();
    for o in &snapshot.obstacles {
        assert!(grid.is_in_bounds(*o), "obstacle {} out of bounds", o);
        assert_ne!(*o, grid.start(), "obstacle on start");
        assert_ne!(*o, grid.end(), "obstacle on end");
        assert!(!snapshot.trail.contains(o), "obstacle {} on trail", o);
        assert!(seen.insert(*o), "duplicate obstacle {}", o);
    }
}

/// Trail steps are grid-adjacent and never repeat
pub fn assert_trail_valid(grid: &Grid, snapshot: &Snapshot) {
    assert_eq!(snapshot.trail[0], grid.start());
    for pair in snapshot.trail.windows(2) {
        assert_eq!(pair[0].manhattan(&pair[1]), 1, "jump {} -> {}", pair[0], pair[1]);
    }
    let unique: HashSet<_> = snapshot.trail.iter().collect();
    assert_eq!(unique.len(), snapshot.trail.len(), "trail revisits a cell");
}
