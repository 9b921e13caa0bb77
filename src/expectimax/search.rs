use log::{debug, trace};

use crate::bitboard::Board;
use crate::grid::Direction;

use super::heuristic;
use super::tt::TranspositionTable;
use super::{warm, BranchEval, ExpectimaxConfig, SearchStats, PROB_FOUR, PROB_TWO};

/// Iterative deepening schedule for one root branch.
///
/// Deepening continues while all of these hold after an iteration:
/// the depth is below `max_depth`, the iteration evaluated fewer nodes than
/// the current threshold, it evaluated strictly more nodes than the previous
/// iteration, and it did not exceed `node_ceiling`. The threshold starts at
/// `2^(3 * min_depth + 5)` and doubles with every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deepening {
    pub depth: u32,
    pub threshold: u64,
    pub last_nodes: u64,
}

impl Deepening {
    pub fn new(cfg: &ExpectimaxConfig) -> Self {
        Self { depth: cfg.min_depth, threshold: 1u64 << (3 * cfg.min_depth + 5), last_nodes: 0 }
    }

    /// Chance branches reached with a lower probability are not expanded.
    #[inline]
    pub fn min_prob(&self) -> f32 { 1.0 / (1u64 << (2 * self.depth + 5)) as f32 }

    /// Record an iteration that evaluated `nodes` nodes; true if another, deeper one should run.
    pub fn advance(&mut self, nodes: u64, cfg: &ExpectimaxConfig) -> bool {
        if self.depth >= cfg.max_depth
            || nodes >= self.threshold
            || nodes <= self.last_nodes
            || nodes > cfg.node_ceiling
        {
            return false;
        }
        self.last_nodes = nodes;
        self.depth += 1;
        self.threshold = self.threshold.saturating_mul(2);
        true
    }
}

/// Single-threaded bitboard expectimax with a persistent transposition table.
pub struct Expectimax {
    cfg: ExpectimaxConfig,
    stats: SearchStats,
    tt: TranspositionTable,
    nodes: u64,
    min_prob: f32,
}

impl Expectimax {
    pub fn new() -> Self { Self::with_config(ExpectimaxConfig::default()) }

    pub fn with_config(cfg: ExpectimaxConfig) -> Self {
        warm();
        let cfg = cfg.normalized();
        let tt = TranspositionTable::new(cfg.tt_bits, cfg.zobrist_seed);
        Self { cfg, stats: SearchStats::default(), tt, nodes: 0, min_prob: 0.0 }
    }

    #[inline]
    pub fn config(&self) -> &ExpectimaxConfig { &self.cfg }

    /// Direction with the highest search value, or `None` when every direction is a no-op.
    ///
    /// Ties keep the lower direction index (`Up, Right, Down, Left`).
    pub fn best_move(&mut self, board: Board) -> Option<Direction> {
        let mut best: Option<(Direction, f32)> = None;
        for branch in self.branch_evals(board) {
            if branch.legal && best.map_or(true, |(_, ev)| branch.ev > ev) {
                best = Some((branch.dir, branch.ev));
            }
        }
        debug!(
            "bitboard {:?} -> {:?} (nodes={}, depth={})",
            board,
            best.map(|(dir, _)| dir),
            self.stats.nodes,
            self.stats.depth
        );
        best.map(|(dir, _)| dir)
    }

    /// Like [`Self::best_move`], but always answers: the first legal direction if the search
    /// yields nothing, and `Up` on a board with no legal move.
    pub fn best_move_or_up(&mut self, board: Board) -> Direction {
        self.best_move(board)
            .or_else(|| Direction::ALL.into_iter().find(|&dir| board.shift(dir) != board))
            .unwrap_or(Direction::Up)
    }

    /// Search value of every direction in index order; illegal moves are marked `legal = false`.
    pub fn branch_evals(&mut self, board: Board) -> [BranchEval; 4] {
        self.stats = SearchStats::default();
        Direction::ALL.map(|dir| {
            let after = board.shift(dir);
            if after == board {
                BranchEval { dir, ev: 0.0, legal: false }
            } else {
                BranchEval { dir, ev: self.search_branch(after), legal: true }
            }
        })
    }

    /// Statistics collected from the last call to [`Self::best_move`] or [`Self::branch_evals`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Drop every cached chance-node value.
    pub fn clear_cache(&mut self) { self.tt.clear(); }

    /// Static value of a board under this engine's heuristic settings.
    #[inline]
    pub fn evaluate(&self, board: Board) -> f32 { heuristic::evaluate(board, self.cfg.snake_weight) }

    fn search_branch(&mut self, after: Board) -> f32 {
        let mut schedule = Deepening::new(&self.cfg);
        let mut result = self.run_iteration(after, &schedule);
        while schedule.advance(self.nodes, &self.cfg) {
            result = self.run_iteration(after, &schedule);
        }
        self.stats.depth = self.stats.depth.max(schedule.depth);
        result
    }

    fn run_iteration(&mut self, after: Board, schedule: &Deepening) -> f32 {
        self.nodes = 0;
        self.min_prob = schedule.min_prob();
        let value = self.spawn_node(after, schedule.depth, 1.0);
        trace!("depth {} evaluated {} nodes, value {}", schedule.depth, self.nodes, value);
        self.stats.nodes += self.nodes;
        self.stats.peak_nodes = self.stats.peak_nodes.max(self.nodes);
        value
    }

    fn spawn_node(&mut self, board: Board, depth: u32, prob: f32) -> f32 {
        if depth == 0 || prob < self.min_prob {
            return self.evaluate(board);
        }
        if let Some(hit) = self.tt.probe(board, depth) {
            self.nodes += (hit.nodes as f64).powf(depth as f64 / hit.depth as f64) as u64;
            return hit.score;
        }
        let num_empty = board.count_empty();
        if num_empty == 0 {
            return self.evaluate(board);
        }

        let prob2 = prob * PROB_TWO / num_empty as f32;
        let prob4 = prob * PROB_FOUR / num_empty as f32;
        let start = self.nodes;
        let raw = board.raw();
        let mut tmp = raw;
        let mut insert_tile: u64 = 1;
        let mut expect = 0.0;
        for _ in 0..16 {
            if (tmp & 0xf) == 0 {
                expect += self.move_node(Board::from_raw(raw | insert_tile), depth - 1, prob2) * PROB_TWO;
                expect += self.move_node(Board::from_raw(raw | (insert_tile << 1)), depth - 1, prob4) * PROB_FOUR;
            }
            tmp >>= 4;
            insert_tile <<= 4;
        }
        let score = expect / num_empty as f32;
        self.tt.store(board, depth, score, self.nodes - start);
        score
    }

    fn move_node(&mut self, board: Board, depth: u32, prob: f32) -> f32 {
        self.nodes += 1;
        let mut best = 0.0;
        for dir in Direction::ALL {
            let next = board.shift(dir);
            if next != board {
                let score = self.spawn_node(next, depth, prob);
                if score > best {
                    best = score;
                }
            }
        }
        best
    }
}

impl Default for Expectimax {
    fn default() -> Self { Self::new() }
}
