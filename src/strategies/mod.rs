//! Depth-bounded search strategies over a plain [`Grid`].
//!
//! Every strategy shares the transition engine in [`crate::grid`] and the
//! static evaluation in [`crate::heuristic`]. Depth counts plies: a player
//! move and a tile spawn each consume one unit, and the root move is the
//! first of them. BFS is the exception: its depth counts the moves made
//! after the root move.
//!
//! ```
//! use search_2048::grid::{Direction, Grid};
//! use search_2048::strategies::{GridSearch, Strategy};
//! let g = Grid([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
//! let search = GridSearch::new(2);
//! assert!(search.best_move(&g, Strategy::Expectimax).is_some());
//! assert_eq!(search.best_move(&g, Strategy::Greedy), Some(Direction::Left));
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grid::{Direction, Grid, MoveResult};

mod bfs;
mod dls;
mod expectimax;
mod greedy;
mod minimax;

pub const MIN_DEPTH: u32 = 1;
pub const MAX_DEPTH: u32 = 6;
pub const DEFAULT_DEPTH: u32 = 3;

/// Grid search strategies, matched exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Strategy {
    Expectimax,
    Greedy,
    Bfs,
    Dls,
    Ids,
    Minimax,
}

impl Strategy {
    pub const ALL: [Strategy; 6] =
        [Strategy::Expectimax, Strategy::Greedy, Strategy::Bfs, Strategy::Dls, Strategy::Ids, Strategy::Minimax];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Expectimax => "EXPECTIMAX",
            Strategy::Greedy => "GREEDY",
            Strategy::Bfs => "BFS",
            Strategy::Dls => "DLS",
            Strategy::Ids => "IDS",
            Strategy::Minimax => "MINIMAX",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Grid-form search engine. Stateless apart from its depth bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSearch {
    depth: u32,
}

impl GridSearch {
    /// Create an engine; `depth` is clamped to `[1, 6]`.
    pub fn new(depth: u32) -> Self { Self { depth: clamp_depth(depth) } }

    #[inline]
    pub fn depth(&self) -> u32 { self.depth }

    pub fn set_depth(&mut self, depth: u32) { self.depth = clamp_depth(depth); }

    /// Pick a direction for `grid`, or `None` when every direction is a no-op.
    pub fn best_move(&self, grid: &Grid, strategy: Strategy) -> Option<Direction> {
        let choice = match strategy {
            Strategy::Expectimax => expectimax::best_move(grid, self.depth),
            Strategy::Greedy => greedy::best_move(grid),
            Strategy::Bfs => bfs::best_move(grid, self.depth),
            Strategy::Dls => dls::best_move(grid, self.depth),
            Strategy::Ids => dls::iterative_best_move(grid, self.depth),
            Strategy::Minimax => minimax::best_move(grid, self.depth),
        };
        debug!("{strategy} depth={} -> {:?}", self.depth, choice);
        choice
    }
}

impl Default for GridSearch {
    fn default() -> Self { Self::new(DEFAULT_DEPTH) }
}

#[inline]
pub fn clamp_depth(depth: u32) -> u32 { depth.clamp(MIN_DEPTH, MAX_DEPTH) }

/// Score every legal root move and return the best; ties keep the earlier direction in
/// [`Direction::SEARCH_ORDER`].
pub(crate) fn pick_root<F>(grid: &Grid, mut score: F) -> Option<Direction>
where
    F: FnMut(&MoveResult) -> f64,
{
    let mut best: Option<(Direction, f64)> = None;
    for dir in Direction::SEARCH_ORDER {
        let result = grid.apply(dir);
        if !result.moved {
            continue;
        }
        let value = score(&result);
        if best.map_or(true, |(_, best_value)| value > best_value) {
            best = Some((dir, value));
        }
    }
    best.map(|(dir, _)| dir)
}
