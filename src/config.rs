use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::EngineError;
use crate::expectimax::ExpectimaxConfig;
use crate::solver::Algorithm;
use crate::strategies::DEFAULT_DEPTH;

/// Run settings read from TOML. Every section and key is optional.
///
/// ```
/// use search_2048::config::Config;
/// let cfg: Config = "[search]\nalgorithm = \"ai\"\n[batch]\ngames = 4".parse().unwrap();
/// assert_eq!(cfg.batch.games, 4);
/// assert_eq!(cfg.bitboard.max_depth, 12);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: Search,
    pub bitboard: ExpectimaxConfig,
    pub batch: Batch,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Search {
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Grid strategy depth, clamped to `[1, 6]` when used.
    #[serde(default = "defaults::depth")]
    pub depth: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(default = "defaults::games")]
    pub games: usize,
    /// Game `i` is seeded with `seed + i`.
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "defaults::max_moves")]
    pub max_moves: u32,
}

impl Default for Search {
    fn default() -> Self { Self { algorithm: Algorithm::default(), depth: defaults::depth() } }
}

impl Default for Batch {
    fn default() -> Self { Self { games: defaults::games(), seed: 0, max_moves: defaults::max_moves() } }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path)?;
        contents.parse()
    }
}

impl FromStr for Config {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(toml::from_str(s)?) }
}

mod defaults {
    pub fn depth() -> u32 { super::DEFAULT_DEPTH }
    pub fn games() -> usize { 10 }
    pub fn max_moves() -> u32 { 10_000 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::Strategy;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: Config = "".parse().unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.search.algorithm, Algorithm::Grid(Strategy::Expectimax));
        assert_eq!(cfg.search.depth, 3);
        assert_eq!(cfg.batch.max_moves, 10_000);
        assert_eq!(cfg.bitboard, ExpectimaxConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg: Config = r#"
            [search]
            algorithm = "minimax"
            depth = 5

            [bitboard]
            max_depth = 6
            snake_weight = 1.5
        "#
        .parse()
        .unwrap();
        assert_eq!(cfg.search.algorithm, Algorithm::Grid(Strategy::Minimax));
        assert_eq!(cfg.search.depth, 5);
        assert_eq!(cfg.bitboard.max_depth, 6);
        assert_eq!(cfg.bitboard.min_depth, 3);
        assert_eq!(cfg.bitboard.snake_weight, 1.5);
        assert_eq!(cfg.batch, Batch::default());
    }

    #[test]
    fn unknown_algorithm_is_not_an_error() {
        let cfg: Config = "[search]\nalgorithm = \"whatever\"".parse().unwrap();
        assert_eq!(cfg.search.algorithm, Algorithm::default());
    }

    #[test]
    fn bad_types_are_config_errors() {
        let err = "[batch]\ngames = \"many\"".parse::<Config>().unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::from_toml("/nonexistent/search-2048.toml").unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
