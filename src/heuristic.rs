//! Static evaluation of a plain [`Grid`].
//!
//! The score is a fixed positive blend of five features, from most to least
//! influential: snake placement, monotonicity, smoothness/merge potential and
//! empty cells.

use crate::grid::{Grid, SIZE};

const SNAKE_WEIGHT: f64 = 10_000.0;
const MONOTONICITY_WEIGHT: f64 = 1_000.0;
const SMOOTHNESS_WEIGHT: f64 = 100.0;
const EMPTY_WEIGHT: f64 = 270.0;
const MERGE_WEIGHT: f64 = 300.0;

/// Serpentine positional weights anchored at the top-left corner.
pub const SNAKE_PATH: [[u32; SIZE]; SIZE] = [
    [15, 14, 13, 12],
    [8, 9, 10, 11],
    [7, 6, 5, 4],
    [0, 1, 2, 3],
];

/// Heuristic value of `grid`; higher is better.
pub fn evaluate(grid: &Grid) -> f64 {
    SNAKE_WEIGHT * snake(grid)
        + MONOTONICITY_WEIGHT * monotonicity(grid)
        + SMOOTHNESS_WEIGHT * smoothness(grid)
        + EMPTY_WEIGHT * grid.count_empty() as f64
        + MERGE_WEIGHT * merge_potential(grid)
}

#[inline]
fn log2(value: u32) -> f64 {
    if value == 0 { 0.0 } else { value.trailing_zeros() as f64 }
}

pub(crate) fn snake(grid: &Grid) -> f64 {
    let mut score = 0.0;
    let mut max_tile = 0;
    for (r, row) in grid.rows().iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            if v > 0 {
                score += (v as f64).powf(1.5) * 2f64.powi(SNAKE_PATH[r][c] as i32);
                max_tile = max_tile.max(v);
            }
        }
    }
    if grid.get(0, 0) == max_tile {
        score *= 2.0;
    }
    score
}

/// Walk the non-zero cells of one line, returning (decreasing, increasing) costs.
///
/// Both costs are non-positive; the starting cell is used even when empty.
fn line_monotonicity(line: [u32; SIZE]) -> (f64, f64) {
    let mut decreasing = 0.0;
    let mut increasing = 0.0;
    let mut current = 0;
    let mut next = 1;
    while next < SIZE {
        while next < SIZE && line[next] == 0 {
            next += 1;
        }
        if next >= SIZE {
            break;
        }
        let current_value = log2(line[current]);
        let next_value = log2(line[next]);
        if current_value > next_value {
            decreasing += next_value - current_value;
        } else if next_value > current_value {
            increasing += current_value - next_value;
        }
        current = next;
        next += 1;
    }
    (decreasing, increasing)
}

pub(crate) fn monotonicity(grid: &Grid) -> f64 {
    let cells = grid.rows();
    let mut totals = [0.0f64; 4];
    for r in 0..SIZE {
        let (dec, inc) = line_monotonicity(cells[r]);
        totals[0] += dec;
        totals[1] += inc;
    }
    for c in 0..SIZE {
        let column = [cells[0][c], cells[1][c], cells[2][c], cells[3][c]];
        let (dec, inc) = line_monotonicity(column);
        totals[2] += dec;
        totals[3] += inc;
    }
    totals[0].max(totals[1]) + totals[2].max(totals[3])
}

pub(crate) fn smoothness(grid: &Grid) -> f64 {
    let cells = grid.rows();
    let mut smooth = 0.0;
    for r in 0..SIZE {
        for c in 0..SIZE {
            if cells[r][c] == 0 {
                continue;
            }
            let value = log2(cells[r][c]);
            if c + 1 < SIZE && cells[r][c + 1] != 0 {
                smooth -= (value - log2(cells[r][c + 1])).abs();
            }
            if r + 1 < SIZE && cells[r + 1][c] != 0 {
                smooth -= (value - log2(cells[r + 1][c])).abs();
            }
        }
    }
    smooth
}

pub(crate) fn merge_potential(grid: &Grid) -> f64 {
    let cells = grid.rows();
    let mut score = 0.0;
    for r in 0..SIZE {
        for c in 0..SIZE - 1 {
            if cells[r][c] != 0 && cells[r][c] == cells[r][c + 1] {
                score += log2(cells[r][c]);
            }
        }
    }
    for c in 0..SIZE {
        for r in 0..SIZE - 1 {
            if cells[r][c] != 0 && cells[r][c] == cells[r + 1][c] {
                score += log2(cells[r][c]);
            }
        }
    }
    score
}
