//! Self-play: single seeded games and parallel batches.

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::Config;
use crate::grid::{Direction, Grid};
use crate::solver::{Algorithm, Solver};

/// Outcome of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub seed: u64,
    pub score: u64,
    pub moves: u32,
    pub max_tile: u32,
    pub grid: Grid,
}

/// Aggregate over a batch of games.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub algorithm: Algorithm,
    pub games: usize,
    /// Final max tile -> number of games that ended with it.
    pub histogram: BTreeMap<u32, usize>,
    pub best_score: u64,
    pub mean_score: f64,
    pub elapsed_ms: u64,
    pub results: Vec<GameSummary>,
}

/// Play one game from two random tiles until no move is left or `max_moves` is reached.
pub fn play_game(solver: &mut Solver, algorithm: Algorithm, seed: u64, max_moves: u32) -> GameSummary {
    play_game_with(solver, algorithm, seed, max_moves, |_, _| {})
}

/// Like [`play_game`], calling `on_move` with the grid after every move and its spawn.
pub fn play_game_with<F>(
    solver: &mut Solver,
    algorithm: Algorithm,
    seed: u64,
    max_moves: u32,
    mut on_move: F,
) -> GameSummary
where
    F: FnMut(&Grid, Direction),
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    let mut score = 0;
    let mut moves = 0;
    while moves < max_moves && !solver.is_game_over(&grid) {
        let Some(dir) = solver.best_move(&grid, algorithm) else {
            break;
        };
        let result = solver.apply_move(&grid, dir);
        if !result.moved {
            break;
        }
        score += result.score;
        moves += 1;
        grid = result.grid.with_random_tile(&mut rng);
        on_move(&grid, dir);
    }
    debug!("game seed={seed} finished: score={score} moves={moves} max_tile={}", grid.max_tile());
    GameSummary { seed, score, moves, max_tile: grid.max_tile(), grid }
}

/// Play `cfg.batch.games` games in parallel, one solver per game.
///
/// `on_game` runs on the worker thread as each game finishes.
pub fn run_batch<F>(cfg: &Config, on_game: F) -> BatchSummary
where
    F: Fn(&GameSummary) + Sync,
{
    let algorithm = cfg.search.algorithm;
    let batch = &cfg.batch;
    info!("playing {} games with {algorithm} (seed {}, depth {})", batch.games, batch.seed, cfg.search.depth);
    let start = Instant::now();

    let results: Vec<GameSummary> = (0..batch.games as u64)
        .into_par_iter()
        .map(|i| {
            let mut solver = Solver::with_config(cfg.search.depth, cfg.bitboard.clone());
            let summary = play_game(&mut solver, algorithm, batch.seed.wrapping_add(i), batch.max_moves);
            on_game(&summary);
            summary
        })
        .collect();

    let summary = summarize(algorithm, results, start.elapsed().as_millis() as u64);
    info!(
        "batch done in {} ms: best score {}, mean score {:.1}",
        summary.elapsed_ms, summary.best_score, summary.mean_score
    );
    summary
}

fn summarize(algorithm: Algorithm, results: Vec<GameSummary>, elapsed_ms: u64) -> BatchSummary {
    let mut histogram = BTreeMap::new();
    for r in &results {
        *histogram.entry(r.max_tile).or_insert(0) += 1;
    }
    let games = results.len();
    let best_score = results.iter().map(|r| r.score).max().unwrap_or(0);
    let mean_score =
        if games == 0 { 0.0 } else { results.iter().map(|r| r.score as f64).sum::<f64>() / games as f64 };
    BatchSummary { algorithm, games, histogram, best_score, mean_score, elapsed_ms, results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::Strategy;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const GREEDY: Algorithm = Algorithm::Grid(Strategy::Greedy);

    #[test]
    fn games_are_reproducible() {
        let a = play_game(&mut Solver::new(1), GREEDY, 5, 10_000);
        let b = play_game(&mut Solver::new(1), GREEDY, 5, 10_000);
        assert_eq!(a, b);
        assert!(a.moves > 0);
        assert!(a.score > 0);
        assert!(a.grid.is_game_over());
        assert_eq!(a.max_tile, a.grid.max_tile());
    }

    #[test]
    fn move_hook_sees_every_move() {
        let mut seen = Vec::new();
        let g = play_game_with(&mut Solver::new(1), GREEDY, 3, 20, |grid, dir| seen.push((*grid, dir)));
        assert_eq!(seen.len(), g.moves as usize);
        assert_eq!(seen.last().map(|(grid, _)| *grid), Some(g.grid));
    }

    #[test]
    fn move_limit_is_respected() {
        let g = play_game(&mut Solver::new(1), GREEDY, 9, 7);
        assert_eq!(g.moves, 7);
        let g = play_game(&mut Solver::new(1), GREEDY, 9, 0);
        assert_eq!(g.moves, 0);
        assert_eq!(g.score, 0);
        assert_eq!(g.grid.count_empty(), 14);
    }

    #[test]
    fn batch_aggregates_every_game() {
        let mut cfg = Config::default();
        cfg.search.algorithm = GREEDY;
        cfg.batch.games = 4;
        cfg.batch.seed = 100;
        let seen = AtomicUsize::new(0);
        let summary = run_batch(&cfg, |_| {
            seen.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(seen.load(Ordering::Relaxed), 4);
        assert_eq!(summary.games, 4);
        assert_eq!(summary.histogram.values().sum::<usize>(), 4);
        assert_eq!(summary.best_score, summary.results.iter().map(|r| r.score).max().unwrap());
        assert!(summary.mean_score <= summary.best_score as f64);
        let mut seeds: Vec<u64> = summary.results.iter().map(|r| r.seed).collect();
        seeds.sort_unstable();
        assert_eq!(seeds, vec![100, 101, 102, 103]);
    }

    #[test]
    fn empty_batch() {
        let summary = summarize(GREEDY, Vec::new(), 0);
        assert_eq!(summary.games, 0);
        assert_eq!(summary.mean_score, 0.0);
        assert!(summary.histogram.is_empty());
    }
}
