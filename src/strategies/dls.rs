use crate::grid::{Direction, Grid};
use crate::heuristic::evaluate;

use super::pick_root;

/// Depth-limited search over player moves only.
pub(super) fn best_move(grid: &Grid, depth: u32) -> Option<Direction> {
    pick_root(grid, |result| dls(&result.grid, depth - 1))
}

/// Run [`best_move`] at every depth from 1 up to `depth`, keeping the deepest answer.
///
/// No cutoff applies between runs, so the outcome equals a single run at `depth`.
pub(super) fn iterative_best_move(grid: &Grid, depth: u32) -> Option<Direction> {
    let mut choice = None;
    for limit in 1..=depth {
        if let Some(dir) = best_move(grid, limit) {
            choice = Some(dir);
        }
    }
    choice
}

fn dls(grid: &Grid, depth: u32) -> f64 {
    if depth == 0 || grid.is_game_over() {
        return evaluate(grid);
    }
    let mut best = f64::NEG_INFINITY;
    for dir in Direction::SEARCH_ORDER {
        let result = grid.apply(dir);
        if result.moved {
            best = best.max(dls(&result.grid, depth - 1));
        }
    }
    if best == f64::NEG_INFINITY { evaluate(grid) } else { best }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dls_without_moves_is_static_value() {
        // The empty grid has free cells but nothing can slide.
        assert_eq!(dls(&Grid::EMPTY, 3), evaluate(&Grid::EMPTY));
    }

    #[test]
    fn dls_one_ply_is_best_child() {
        let g = Grid([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let expected = [Direction::Down, Direction::Right]
            .iter()
            .map(|&d| evaluate(&g.apply(d).grid))
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(dls(&g, 1), expected);
    }
}
