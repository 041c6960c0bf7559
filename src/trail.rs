use crate::grid::Position;
use indexmap::IndexSet;
use serde::Serialize;

/// Every cell the agent has occupied, in visitation order.
///
/// Append-only. The agent never re-enters its own trail, so entries are
/// unique and the set keeps both order and O(1) membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trail {
    cells: IndexSet<Position>,
}

impl Trail {
    /// A fresh trail holding only the start cell
    pub fn new(start: Position) -> Self {
        let mut cells = IndexSet::new();
        cells.insert(start);
        Trail { cells }
    }

    /// Append a cell. Returns false (and leaves the trail alone) if the cell
    /// was already visited.
    pub fn push(&mut self, pos: Position) -> bool {
        self.cells.insert(pos)
    }

    /// The agent's current cell
    pub fn last(&self) -> Position {
        // Never empty: constructed with the start cell and never truncated.
        self.cells[self.cells.len() - 1]
    }

    pub fn contains(&self, pos: &Position) -> bool {
        self.cells.contains(pos)
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn to_vec(&self) -> Vec<Position> {
        self.cells.iter().copied().collect()
    }
}
