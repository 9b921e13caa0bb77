use crate::grid::{Direction, Grid};
use crate::heuristic::evaluate;

use super::pick_root;

const PROB_TWO: f64 = 0.9;
const PROB_FOUR: f64 = 0.1;

pub(super) fn best_move(grid: &Grid, depth: u32) -> Option<Direction> {
    pick_root(grid, |result| chance(&result.grid, depth - 1))
}

fn max_node(grid: &Grid, depth: u32) -> f64 {
    if depth == 0 || grid.is_game_over() {
        return evaluate(grid);
    }
    Direction::SEARCH_ORDER
        .iter()
        .map(|&dir| grid.apply(dir))
        .filter(|r| r.moved)
        .map(|r| chance(&r.grid, depth - 1))
        .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
        .unwrap_or_else(|| evaluate(grid))
}

/// Average over every empty cell, spawning a 2 or a 4 with their game odds.
fn chance(grid: &Grid, depth: u32) -> f64 {
    if depth == 0 || grid.is_game_over() {
        return evaluate(grid);
    }
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return evaluate(grid);
    }
    let mut sum = 0.0;
    for &(r, c) in &empty {
        sum += PROB_TWO * max_node(&grid.with_tile(r, c, 2), depth - 1);
        sum += PROB_FOUR * max_node(&grid.with_tile(r, c, 4), depth - 1);
    }
    sum / empty.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chance_of_full_grid_is_static_value() {
        let full = Grid([[2, 4, 8, 16], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 2]]);
        assert_eq!(chance(&full, 3), evaluate(&full));
    }

    #[test]
    fn chance_weights_spawns() {
        // One empty cell: the value is the weighted mix of the two spawn outcomes at depth 0.
        let g = Grid([[0, 4, 8, 16], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 128]]);
        let expected = 0.9 * evaluate(&g.with_tile(0, 0, 2)) + 0.1 * evaluate(&g.with_tile(0, 0, 4));
        assert!((chance(&g, 1) - expected).abs() < 1e-6 * expected.abs().max(1.0));
    }
}
