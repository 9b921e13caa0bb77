use std::collections::VecDeque;

use crate::grid::{Direction, Grid};
use crate::heuristic::evaluate;

struct Frontier {
    grid: Grid,
    root: Direction,
    depth: u32,
}

/// Breadth-first enumeration of move sequences: the root move followed by up
/// to `depth` further moves.
///
/// Each root direction keeps the best leaf reached through it. Sequences that
/// run out of legal moves early are scored where they stop.
pub(super) fn best_move(grid: &Grid, depth: u32) -> Option<Direction> {
    let mut queue = VecDeque::new();
    for dir in Direction::SEARCH_ORDER {
        let result = grid.apply(dir);
        if result.moved {
            queue.push_back(Frontier { grid: result.grid, root: dir, depth: 0 });
        }
    }

    let mut best_leaf: [Option<f64>; 4] = [None; 4];
    while let Some(node) = queue.pop_front() {
        let mut expanded = false;
        if node.depth < depth {
            for dir in Direction::SEARCH_ORDER {
                let result = node.grid.apply(dir);
                if result.moved {
                    expanded = true;
                    queue.push_back(Frontier { grid: result.grid, root: node.root, depth: node.depth + 1 });
                }
            }
        }
        if !expanded {
            let slot = &mut best_leaf[node.root.index()];
            let value = evaluate(&node.grid);
            *slot = Some(slot.map_or(value, |v| v.max(value)));
        }
    }

    let mut best: Option<(Direction, f64)> = None;
    for dir in Direction::SEARCH_ORDER {
        if let Some(value) = best_leaf[dir.index()] {
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((dir, value));
            }
        }
    }
    best.map(|(dir, _)| dir)
}
