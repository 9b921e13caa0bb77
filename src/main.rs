use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use search_2048::play::{self, BatchSummary};
use search_2048::{Algorithm, Config, Grid, Solver};

#[derive(Debug, Parser)]
#[command(author, version, about = "Move search for the 2048 sliding-tile game")]
struct Cli {
    /// TOML file with [search], [bitboard] and [batch] sections
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// EXPECTIMAX, MINIMAX, GREEDY, BFS, DLS, IDS or BITBOARD (unknown names use EXPECTIMAX)
    #[arg(short, long, global = true)]
    algorithm: Option<String>,

    /// Grid search depth, clamped to 1..=6
    #[arg(short, long, global = true)]
    depth: Option<u32>,

    /// Suppress boards and progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Play one game, printing the board after every move
    Play {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_name = "N")]
        max_moves: Option<u32>,
    },
    /// Play many seeded games in parallel and print a summary
    Batch {
        #[arg(short = 'n', long, value_name = "N")]
        games: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_name = "N")]
        max_moves: Option<u32>,
    },
    /// Suggest a move for 16 comma-separated tile values, row-major
    Hint { tiles: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut cfg = match &cli.config {
        Some(path) => Config::from_toml(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(name) = &cli.algorithm {
        cfg.search.algorithm = Algorithm::parse(name);
    }
    if let Some(depth) = cli.depth {
        cfg.search.depth = depth;
    }

    match cli.cmd {
        Cmd::Play { seed, max_moves } => {
            let seed = seed.unwrap_or(cfg.batch.seed);
            let max_moves = max_moves.unwrap_or(cfg.batch.max_moves);
            let mut solver = Solver::with_config(cfg.search.depth, cfg.bitboard.clone());
            let quiet = cli.quiet;
            let game = play::play_game_with(&mut solver, cfg.search.algorithm, seed, max_moves, |grid, dir| {
                if !quiet {
                    println!("{dir}\n{grid}");
                }
            });
            println!("Moves made: {}, score: {}, max tile: {}", game.moves, game.score, game.max_tile);
        }
        Cmd::Batch { games, seed, max_moves } => {
            if let Some(games) = games {
                cfg.batch.games = games;
            }
            if let Some(seed) = seed {
                cfg.batch.seed = seed;
            }
            if let Some(max_moves) = max_moves {
                cfg.batch.max_moves = max_moves;
            }
            let pb = if cli.quiet { ProgressBar::hidden() } else { ProgressBar::new(cfg.batch.games as u64) };
            pb.set_style(
                ProgressStyle::with_template("[{elapsed_precise}] {wide_bar} {pos}/{len} games")?
                    .progress_chars("=> "),
            );
            let summary = play::run_batch(&cfg, |_| pb.inc(1));
            pb.finish_and_clear();
            print_summary(&summary);
        }
        Cmd::Hint { tiles } => {
            let grid = parse_tiles(&tiles)?;
            let mut solver = Solver::with_config(cfg.search.depth, cfg.bitboard.clone());
            match solver.best_move(&grid, cfg.search.algorithm) {
                Some(dir) => println!("{dir}"),
                None => println!("no move: game over"),
            }
        }
    }
    Ok(())
}

fn parse_tiles(s: &str) -> Result<Grid> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<u32>().with_context(|| format!("bad tile value {v:?}")))
        .collect::<Result<Vec<_>>>()?;
    let rows: Vec<&[u32]> = values.chunks(4).collect();
    Ok(Grid::from_rows(&rows)?)
}

fn print_summary(summary: &BatchSummary) {
    info!("{} games with {} in {} ms", summary.games, summary.algorithm, summary.elapsed_ms);
    println!("games: {}", summary.games);
    println!("best score: {}", summary.best_score);
    println!("mean score: {:.1}", summary.mean_score);
    println!("max tile histogram:");
    for (tile, count) in &summary.histogram {
        let pct = 100.0 * *count as f64 / summary.games.max(1) as f64;
        println!("{tile:>6}: {count:>5} ({pct:.1}%)");
    }
}
