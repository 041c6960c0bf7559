use crate::grid::{Grid, Position};
use crate::obstacles::ObstacleSet;
use crate::trail::Trail;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::trace;

/// What `find_path` returns when the end cell cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Return a single-cell path to the first free cell (row-major) that the
    /// search did not reach. `None` only if no such cell exists.
    #[default]
    Relocate,
    /// Unreachable end means `None`.
    #[serde(alias = "none")]
    Disabled,
}

/// Breadth-first search from the agent's current cell to the grid's end cell.
///
/// Cells in `obstacles` or in `trail` are blocked; the search still starts
/// from `trail.last()`. Neighbors are expanded in `Grid::neighbors` order and
/// marked visited when enqueued, which fixes the choice among equal-length
/// paths. The returned path starts at the current cell and ends at `end`.
pub fn find_path(
    trail: &Trail,
    obstacles: &ObstacleSet,
    grid: &Grid,
    fallback: FallbackPolicy,
) -> Option<Vec<Position>> {
    let start = trail.last();
    let is_blocked = |pos: &Position| obstacles.contains(pos) || trail.contains(pos);

    let mut queue: VecDeque<Position> = VecDeque::new();
    let mut visited: HashSet<Position> = HashSet::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();

    queue.push_back(start);
    visited.insert(start);

    while let Some(current) = queue.pop_front() {
        if current == grid.end() {
            let path = reconstruct_path(&came_from, current);
            trace!(
                "[find_path] {} -> {}: {} cells, {} visited",
                start,
                grid.end(),
                path.len(),
                visited.len()
            );
            return Some(path);
        }

        for neighbor in grid.neighbors(current) {
            if is_blocked(&neighbor) || visited.contains(&neighbor) {
                continue;
            }
            visited.insert(neighbor);
            came_from.insert(neighbor, current);
            queue.push_back(neighbor);
        }
    }

    trace!(
        "[find_path] {} -> {}: unreachable after {} visited",
        start,
        grid.end(),
        visited.len()
    );

    match fallback {
        FallbackPolicy::Relocate => {
            let spare = grid
                .cells()
                .find(|pos| !is_blocked(pos) && !visited.contains(pos))?;
            trace!("[find_path] falling back to free cell {}", spare);
            Some(vec![spare])
        }
        FallbackPolicy::Disabled => None,
    }
}

/// Walk predecessors back from `end` and reverse
fn reconstruct_path(came_from: &HashMap<Position, Position>, end: Position) -> Vec<Position> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Format path for display
pub fn format_path(path: &[Position]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(|pos| pos.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
