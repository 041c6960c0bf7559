use crate::grid::{Grid, Position};
use crate::step::Snapshot;
use std::collections::HashSet;

/// Draw a snapshot as text, one line per row.
///
/// `@` agent, `S` start, `E` end, `*` trail, `#` obstacle, `.` free.
pub fn render_snapshot(grid: &Grid, snapshot: &Snapshot) -> String {
    let trail: HashSet<Position> = snapshot.trail.iter().copied().collect();
    let obstacles: HashSet<Position> = snapshot.obstacles.iter().copied().collect();
    let agent = snapshot.trail.last().copied();

    let mut out = String::with_capacity(grid.cell_count() + grid.rows() as usize);
    for x in 0..grid.rows() {
        for y in 0..grid.cols() {
            let pos = Position::new(x, y);
            let symbol = if Some(pos) == agent {
                '@'
            } else if pos == grid.start() {
                'S'
            } else if pos == grid.end() {
                'E'
            } else if trail.contains(&pos) {
                '*'
            } else if obstacles.contains(&pos) {
                '#'
            } else {
                '.'
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}
