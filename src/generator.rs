//! Randomized depth-first maze generation (recursive backtracker with an
//! explicit stack). The result is a perfect maze: every cell reachable from
//! every other, exactly `columns * rows - 1` open wall-pairs, no cycles.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::grid::{Direction, Grid};

/// Carve a maze over a `columns x rows` field.
///
/// The walk starts at a uniformly random cell. While the stack is non-empty,
/// the top cell picks uniformly among its unvisited in-bounds neighbors,
/// opens the wall pair toward the chosen one and descends into it; a cell
/// with no unvisited neighbor is popped. The walk visits every cell because
/// the field is finite and connected, so the drained stack doubles as the
/// completion check.
pub fn generate(columns: u32, rows: u32, rng: &mut impl Rng) -> Grid {
    let mut grid = Grid::new(columns, rows);

    let start = (rng.gen_range(0..columns), rng.gen_range(0..rows));
    grid.cell_mut(start.0, start.1).visited = true;
    let mut stack = vec![start];

    while let Some(&(column, row)) = stack.last() {
        let candidates: Vec<(Direction, (u32, u32))> = Direction::ALL
            .into_iter()
            .filter_map(|dir| {
                let (nc, nr) = grid.neighbor(column, row, dir)?;
                (!grid.cell(nc, nr).visited).then_some((dir, (nc, nr)))
            })
            .collect();

        match candidates.choose(rng) {
            Some(&(dir, (nc, nr))) => {
                grid.open_between(column, row, dir);
                grid.cell_mut(nc, nr).visited = true;
                stack.push((nc, nr));
            }
            None => {
                stack.pop();
            }
        }
    }

    grid
}
