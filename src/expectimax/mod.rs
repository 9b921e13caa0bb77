//! Bitboard expectimax policy for 2048.
//!
//! [`Expectimax`] searches packed [`Board`](crate::bitboard::Board)s using the
//! row tables in [`crate::bitboard`] and a per-row heuristic table. Depth is
//! not fixed: each root move is searched by iterative deepening that keeps
//! going while the node count stays under a budget, and chance branches whose
//! reach probability gets too small are cut off.
//!
//! Notes
//! - Tables are initialized lazily; constructors warm them for you.
//! - The transposition table lives inside one `Expectimax` and is kept
//!   between calls, so earlier decisions feed later ones. Give every
//!   independent game its own instance.
//!
//! Quick start
//! ```
//! use search_2048::bitboard::Board;
//! use search_2048::expectimax::{Expectimax, ExpectimaxConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let b0 = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let cfg = ExpectimaxConfig { tt_bits: 16, min_depth: 2, max_depth: 3, ..Default::default() };
//! let mut ex = Expectimax::with_config(cfg);
//! assert!(ex.best_move(b0).is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::bitboard;
use crate::grid::Direction;

pub mod heuristic;
mod search;
mod tt;

pub use search::{Deepening, Expectimax};

/// Probability of a spawned 2; a 4 takes the rest.
pub(crate) const PROB_TWO: f32 = 0.9;
pub(crate) const PROB_FOUR: f32 = 0.1;

/// Configurable knobs for the bitboard search.
///
/// - `min_depth` / `max_depth`: bounds for iterative deepening (spawn layers).
/// - `node_ceiling`: stop deepening once an iteration evaluates more nodes than this.
/// - `tt_bits`: the transposition table has `2^tt_bits` slots.
/// - `snake_weight`: weight of the symmetric snake term; 0 disables it.
/// - `zobrist_seed`: seed for the transposition table hash keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectimaxConfig {
    pub min_depth: u32,
    pub max_depth: u32,
    pub node_ceiling: u64,
    pub tt_bits: u32,
    pub snake_weight: f32,
    pub zobrist_seed: u64,
}

impl Default for ExpectimaxConfig {
    fn default() -> Self {
        Self {
            min_depth: 3,
            max_depth: 12,
            node_ceiling: 500_000,
            tt_bits: 22,
            snake_weight: 0.0,
            zobrist_seed: 0x2048,
        }
    }
}

impl ExpectimaxConfig {
    /// Clamp values into ranges the search can run with.
    pub fn normalized(mut self) -> Self {
        self.min_depth = self.min_depth.clamp(1, 15);
        self.max_depth = self.max_depth.clamp(self.min_depth, 15);
        self.tt_bits = self.tt_bits.clamp(4, 28);
        if !self.snake_weight.is_finite() {
            self.snake_weight = 0.0;
        }
        self
    }
}

/// Per-branch value at the root.
///
/// - `ev` is the search value for taking `dir` from the current board.
/// - `legal` is false when the move is a no-op for the current board.
#[derive(Debug, Clone, Copy)]
pub struct BranchEval {
    pub dir: Direction,
    pub ev: f32,
    pub legal: bool,
}

/// Search statistics for the last decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    /// Nodes evaluated over every root branch and deepening iteration.
    pub nodes: u64,
    /// Largest node count of a single deepening iteration.
    pub peak_nodes: u64,
    /// Deepest completed iteration over all root branches.
    pub depth: u32,
}

/// Ensure move and heuristic tables are initialized. Safe to call multiple times.
pub fn warm() {
    bitboard::init();
    heuristic::warm();
}
