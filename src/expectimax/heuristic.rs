use std::sync::OnceLock;

use crate::bitboard::{line_to_ranks, Board, Line, LINE_TABLE_SIZE};
use crate::heuristic::SNAKE_PATH;

static HEURISTIC_SCORES: OnceLock<Box<[f32]>> = OnceLock::new();

pub(crate) fn warm() {
    let _ = heuristic_scores();
}

fn heuristic_scores() -> &'static [f32] {
    HEURISTIC_SCORES
        .get_or_init(|| {
            let mut v = vec![0.0f32; LINE_TABLE_SIZE];
            for (i, slot) in v.iter_mut().enumerate() {
                *slot = calc_heuristic_score(i as Line);
            }
            v.into_boxed_slice()
        })
        .as_ref()
}

/// Static value of a packed board: every row and every column through the
/// row table, plus an optional weighted snake term.
///
/// ```
/// use search_2048::bitboard::Board;
/// use search_2048::expectimax::heuristic;
/// let b = Board::from_raw(0x4321_0000_0000_0000);
/// assert!(heuristic::evaluate(b, 0.0) > 0.0);
/// ```
pub fn evaluate(board: Board, snake_weight: f32) -> f32 {
    let base = line_sum(board) + line_sum(board.transpose());
    if snake_weight == 0.0 {
        base
    } else {
        base + snake_weight * max_snake(board)
    }
}

#[inline]
fn line_sum(board: Board) -> f32 {
    let scores = heuristic_scores();
    board.lines().iter().map(|&line| scores[line as usize]).sum()
}

/// Best snake placement score over the eight rotations and reflections of the board.
pub fn max_snake(board: Board) -> f32 {
    let mut best = 0.0f32;
    let mut current = board;
    for _ in 0..4 {
        best = best.max(snake_score(current)).max(snake_score(current.transpose()));
        current = current.rotate();
    }
    best
}

/// Sum of exponent times positional weight, with the path anchored top-left.
pub fn snake_score(board: Board) -> f32 {
    SNAKE_PATH
        .iter()
        .flatten()
        .enumerate()
        .map(|(idx, &weight)| board.rank(idx) as f32 * weight as f32)
        .sum()
}

// Row-level terms after nneonneo's 2048 AI.
fn calc_heuristic_score(line: Line) -> f32 {
    const LOST_PENALTY: f64 = 200_000.0;
    let ranks = line_to_ranks(line);
    (LOST_PENALTY + calc_empty(&ranks) + calc_merges(&ranks) - calc_monotonicity(&ranks) - calc_sum(&ranks)) as f32
}

fn calc_sum(line: &[u8; 4]) -> f64 {
    const SUM_POWER: f64 = 3.5;
    const SUM_WEIGHT: f64 = 11.0;
    line.iter().map(|&rank| (rank as f64).powf(SUM_POWER)).sum::<f64>() * SUM_WEIGHT
}

fn calc_empty(line: &[u8; 4]) -> f64 {
    const EMPTY_WEIGHT: f64 = 270.0;
    line.iter().filter(|&&rank| rank == 0).count() as f64 * EMPTY_WEIGHT
}

/// Every run of equal tiles (gaps ignored) adds one plus its number of adjacent pairs.
fn calc_merges(line: &[u8; 4]) -> f64 {
    const MERGES_WEIGHT: f64 = 700.0;
    let mut prev = 0;
    let mut counter = 0;
    let mut merges = 0;
    for &rank in line.iter().filter(|&&rank| rank != 0) {
        if prev == rank {
            counter += 1;
        } else {
            if counter > 0 {
                merges += 1 + counter;
            }
            counter = 0;
        }
        prev = rank;
    }
    if counter > 0 {
        merges += 1 + counter;
    }
    merges as f64 * MERGES_WEIGHT
}

fn calc_monotonicity(line: &[u8; 4]) -> f64 {
    const MONOTONICITY_POWER: f64 = 4.0;
    const MONOTONICITY_WEIGHT: f64 = 47.0;
    let mut monotonicity_left = 0.;
    let mut monotonicity_right = 0.;
    for i in 1..4 {
        let tile1 = line[i - 1] as f64;
        let tile2 = line[i] as f64;
        if tile1 > tile2 {
            monotonicity_left += tile1.powf(MONOTONICITY_POWER) - tile2.powf(MONOTONICITY_POWER);
        } else {
            monotonicity_right += tile2.powf(MONOTONICITY_POWER) - tile1.powf(MONOTONICITY_POWER);
        }
    }
    monotonicity_left.min(monotonicity_right) * MONOTONICITY_WEIGHT
}
