use crate::grid::{Direction, Grid};
use crate::heuristic::evaluate;

use super::pick_root;

/// One ply: static value of the result plus the points the move scores.
pub(super) fn best_move(grid: &Grid) -> Option<Direction> {
    pick_root(grid, |result| evaluate(&result.grid) + result.score as f64)
}
