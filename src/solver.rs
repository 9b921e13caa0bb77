//! Single entry point over both engines.
//!
//! ```
//! use search_2048::grid::Grid;
//! use search_2048::solver::{Algorithm, Solver};
//! let mut solver = Solver::new(2);
//! let g = Grid([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
//! let dir = solver.best_move(&g, Algorithm::parse("greedy")).unwrap();
//! assert!(solver.apply_move(&g, dir).moved);
//! ```

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bitboard::Board;
use crate::expectimax::{Expectimax, ExpectimaxConfig};
use crate::grid::{Direction, Grid, MoveResult};
use crate::strategies::{GridSearch, Strategy, DEFAULT_DEPTH};

/// Which engine answers a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Algorithm {
    Grid(Strategy),
    Bitboard,
}

impl Algorithm {
    /// Case-insensitive name lookup. Unknown names select grid expectimax.
    pub fn parse(name: &str) -> Algorithm {
        let name = name.trim();
        if name.eq_ignore_ascii_case("BITBOARD") || name.eq_ignore_ascii_case("AI") {
            return Algorithm::Bitboard;
        }
        Strategy::ALL
            .into_iter()
            .find(|s| name.eq_ignore_ascii_case(s.as_str()))
            .map_or(Algorithm::Grid(Strategy::Expectimax), Algorithm::Grid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Grid(strategy) => strategy.as_str(),
            Algorithm::Bitboard => "BITBOARD",
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self { Algorithm::Grid(Strategy::Expectimax) }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Algorithm {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Algorithm::parse(s)) }
}

impl From<String> for Algorithm {
    fn from(s: String) -> Self { Algorithm::parse(&s) }
}

impl From<Algorithm> for String {
    fn from(a: Algorithm) -> Self { a.as_str().to_owned() }
}

impl From<Strategy> for Algorithm {
    fn from(s: Strategy) -> Self { Algorithm::Grid(s) }
}

/// Grid search plus a bitboard engine with its own transposition table.
///
/// One solver serves one game at a time; the bitboard cache carries over
/// between its calls. The bitboard engine is built on its first request.
pub struct Solver {
    grid: GridSearch,
    bitboard_cfg: ExpectimaxConfig,
    bitboard: Option<Expectimax>,
}

impl Solver {
    /// Grid depth is clamped to `[1, 6]`; the bitboard engine uses its defaults.
    pub fn new(depth: u32) -> Self { Self::with_config(depth, ExpectimaxConfig::default()) }

    pub fn with_config(depth: u32, bitboard: ExpectimaxConfig) -> Self {
        Self { grid: GridSearch::new(depth), bitboard_cfg: bitboard, bitboard: None }
    }

    #[inline]
    pub fn grid_search(&self) -> &GridSearch { &self.grid }

    pub fn set_depth(&mut self, depth: u32) { self.grid.set_depth(depth); }

    pub fn bitboard(&mut self) -> &mut Expectimax {
        self.bitboard.get_or_insert_with(|| Expectimax::with_config(self.bitboard_cfg.clone()))
    }

    /// Best direction for `grid`, or `None` when no direction changes it.
    ///
    /// Grids holding a tile the bitboard cannot pack are searched with grid
    /// expectimax instead.
    pub fn best_move(&mut self, grid: &Grid, algorithm: Algorithm) -> Option<Direction> {
        match algorithm {
            Algorithm::Grid(strategy) => self.grid.best_move(grid, strategy),
            Algorithm::Bitboard => match Board::encode(grid) {
                Ok(board) => self.bitboard().best_move(board),
                Err(err) => {
                    warn!("{err}; falling back to grid expectimax");
                    self.grid.best_move(grid, Strategy::Expectimax)
                }
            },
        }
    }

    #[inline]
    pub fn apply_move(&self, grid: &Grid, dir: Direction) -> MoveResult { grid.apply(dir) }

    #[inline]
    pub fn is_game_over(&self, grid: &Grid) -> bool { grid.is_game_over() }
}

impl Default for Solver {
    fn default() -> Self { Self::new(DEFAULT_DEPTH) }
}
