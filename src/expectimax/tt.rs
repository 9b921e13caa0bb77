use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::bitboard::Board;

/// One direct-mapped slot. `depth == 0` marks a vacant slot.
#[derive(Clone, Copy, Default)]
struct Slot {
    board: u64,
    score: f32,
    nodes: u32,
    depth: u8,
}

/// A reusable result for a chance node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Hit {
    pub score: f32,
    pub depth: u32,
    pub nodes: u32,
}

/// Fixed-size cache of chance-node values keyed by the exact packed board.
///
/// Slots are addressed by a Zobrist hash and overwritten on collision, so a
/// lookup can miss but never returns another board's value.
pub(crate) struct TranspositionTable {
    slots: Box<[Slot]>,
    mask: usize,
    zobrist: Box<[u32; 256]>,
}

impl TranspositionTable {
    pub(crate) fn new(bits: u32, seed: u64) -> Self {
        let len = 1usize << bits;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut zobrist = Box::new([0u32; 256]);
        for key in zobrist.iter_mut() {
            *key = rng.gen();
        }
        Self { slots: vec![Slot::default(); len].into_boxed_slice(), mask: len - 1, zobrist }
    }

    #[inline]
    fn index(&self, board: Board) -> usize {
        let mut x = board.raw();
        let mut h = 0u32;
        for cell in 0..16 {
            h ^= self.zobrist[(cell << 4) | (x & 0xf) as usize];
            x >>= 4;
        }
        h as usize & self.mask
    }

    /// Value stored for `board`, only if it was searched at least `depth` deep.
    #[inline]
    pub(crate) fn probe(&self, board: Board, depth: u32) -> Option<Hit> {
        let slot = &self.slots[self.index(board)];
        if slot.depth == 0 || slot.board != board.raw() || (slot.depth as u32) < depth {
            return None;
        }
        Some(Hit { score: slot.score, depth: slot.depth as u32, nodes: slot.nodes })
    }

    #[inline]
    pub(crate) fn store(&mut self, board: Board, depth: u32, score: f32, nodes: u64) {
        debug_assert!(depth > 0);
        let idx = self.index(board);
        self.slots[idx] = Slot {
            board: board.raw(),
            score,
            nodes: nodes.min(u32::MAX as u64) as u32,
            depth: depth.min(u8::MAX as u32) as u8,
        };
    }

    pub(crate) fn clear(&mut self) { self.slots.fill(Slot::default()); }

    pub(crate) fn capacity(&self) -> usize { self.slots.len() }
}
