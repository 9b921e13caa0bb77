//! search-2048: move search for the 2048 sliding-tile game
//!
//! This crate provides:
//! - A plain `Grid` with the slide/merge transition (`grid` module)
//! - Depth-bounded grid strategies: expectimax, minimax, greedy, BFS, DLS, IDS (`strategies`)
//! - A packed `Board` with table-driven moves (`bitboard`) and an iterative-deepening
//!   expectimax over it (`expectimax`)
//! - A `Solver` facade that dispatches on an `Algorithm` name (`solver`)
//! - Seeded self-play and parallel batches (`play`), configured from TOML (`config`)
//!
//! Quick start:
//! ```
//! use search_2048::{Algorithm, Grid, Solver};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let g0 = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let mut solver = Solver::new(2);
//! let dir = solver.best_move(&g0, Algorithm::parse("expectimax")).unwrap();
//! let g1 = solver.apply_move(&g0, dir);
//! assert!(g1.moved);
//! ```
pub mod bitboard;
pub mod config;
pub mod error;
pub mod expectimax;
pub mod grid;
pub mod heuristic;
pub mod play;
pub mod solver;
pub mod strategies;

pub use config::Config;
pub use error::EngineError;
pub use grid::{Direction, Grid, MoveResult};
pub use solver::{Algorithm, Solver};
