use crate::grid::{Direction, Grid};
use crate::heuristic::evaluate;

use super::pick_root;

/// Adversarial search where the spawner always places a 2 in the worst cell.
///
/// Unlike expectimax, 4-spawns are never modeled.
pub(super) fn best_move(grid: &Grid, depth: u32) -> Option<Direction> {
    pick_root(grid, |result| minimax(&result.grid, depth - 1, false))
}

fn minimax(grid: &Grid, depth: u32, maximizing: bool) -> f64 {
    if depth == 0 || grid.is_game_over() {
        return evaluate(grid);
    }
    if maximizing {
        let mut best = f64::NEG_INFINITY;
        for dir in Direction::SEARCH_ORDER {
            let result = grid.apply(dir);
            if result.moved {
                best = best.max(minimax(&result.grid, depth - 1, false));
            }
        }
        if best == f64::NEG_INFINITY { evaluate(grid) } else { best }
    } else {
        let empty = grid.empty_cells();
        if empty.is_empty() {
            return evaluate(grid);
        }
        empty
            .iter()
            .map(|&(r, c)| minimax(&grid.with_tile(r, c, 2), depth - 1, true))
            .fold(f64::INFINITY, f64::min)
    }
}
