//! Packed 4x4 board: 16 exponent nibbles in a `u64`, row-major, cell 0 in
//! the most significant nibble.

use rand::Rng;
use std::fmt;

use crate::error::EngineError;
use crate::grid::{Direction, Grid, SIZE};

mod tables;

pub use tables::init;
pub(crate) use tables::{line_to_ranks, LINE_TABLE_SIZE};

type BoardRaw = u64;
pub(crate) type Line = u16;

/// Packed 4x4 board as 16 4-bit exponents in a `u64`.
///
/// A nibble holds 0 for an empty cell or `k` for the tile `2^k`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(BoardRaw);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board(0);

    /// Construct a `Board` from its raw packed representation.
    #[inline]
    pub fn from_raw(raw: BoardRaw) -> Self { Board(raw) }

    /// Borrow the raw packed `u64` for this `Board`.
    #[inline]
    pub fn raw(&self) -> BoardRaw { self.0 }

    /// Pack a grid. Fails for tiles that need more than four bits of exponent.
    ///
    /// ```
    /// use search_2048::bitboard::Board;
    /// use search_2048::grid::Grid;
    /// let g = Grid([[2, 4, 0, 0], [0; 4], [0; 4], [0, 0, 0, 32768]]);
    /// let b = Board::encode(&g).unwrap();
    /// assert_eq!(b.raw(), 0x1200_0000_0000_000f);
    /// assert_eq!(b.decode(), g);
    /// ```
    pub fn encode(grid: &Grid) -> Result<Board, EngineError> {
        let mut raw = 0;
        for (r, row) in grid.rows().iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                let rank = if value == 0 { 0 } else { value.trailing_zeros() };
                if rank > 0xf {
                    return Err(EngineError::TileOutOfRange { value });
                }
                raw |= (rank as BoardRaw) << cell_shift(r * SIZE + c);
            }
        }
        Ok(Board(raw))
    }

    /// Unpack into tile values.
    pub fn decode(self) -> Grid {
        let mut cells = [[0u32; SIZE]; SIZE];
        for (idx, cell) in cells.iter_mut().flatten().enumerate() {
            let rank = self.rank(idx);
            *cell = if rank == 0 { 0 } else { 1 << rank };
        }
        Grid(cells)
    }

    /// Exponent stored at cell `idx` (0..16, row-major).
    #[inline]
    pub fn rank(self, idx: usize) -> u8 { ((self.0 >> cell_shift(idx)) & 0xf) as u8 }

    /// Slide/merge tiles in `dir` (no random insert).
    ///
    /// ```
    /// use search_2048::bitboard::Board;
    /// use search_2048::grid::Direction;
    /// let b = Board::from_raw(0x1332_0000_0000_0000);
    /// assert_eq!(b.shift(Direction::Left).raw(), 0x1420_0000_0000_0000);
    /// ```
    #[inline]
    pub fn shift(self, dir: Direction) -> Self {
        let t = tables::tables();
        match dir {
            Direction::Left => Board(shift_rows(self.0, &t.left)),
            Direction::Right => Board(shift_rows(self.0, &t.right)),
            Direction::Up => Board(transpose(shift_rows(transpose(self.0), &t.left))),
            Direction::Down => Board(transpose(shift_rows(transpose(self.0), &t.right))),
        }
    }

    /// Insert a 2 (90%) or 4 (10%) into a random empty cell. Full boards are returned unchanged.
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let empty = self.count_empty();
        if empty == 0 {
            return self;
        }
        let mut index = rng.gen_range(0..empty);
        let mut tmp = self.0;
        let mut tile: BoardRaw = if rng.gen_range(0..10) < 9 { 1 } else { 2 };
        loop {
            while (tmp & 0xf) != 0 {
                tmp >>= 4;
                tile <<= 4;
            }
            if index == 0 {
                break;
            }
            index -= 1;
            tmp >>= 4;
            tile <<= 4;
        }
        Board(self.0 | tile)
    }

    /// Count the number of empty cells.
    #[inline]
    pub fn count_empty(self) -> u32 {
        let mut x = self.0;
        x |= x >> 1;
        x |= x >> 2;
        x &= 0x1111_1111_1111_1111;
        16 - x.count_ones()
    }

    /// True if no direction changes the board.
    pub fn is_game_over(self) -> bool { Direction::ALL.iter().all(|&dir| self.shift(dir) == self) }

    /// The board flipped along its main diagonal.
    #[inline]
    pub fn transpose(self) -> Self { Board(transpose(self.0)) }

    /// The board with every row reversed.
    #[inline]
    pub fn mirror(self) -> Self { Board(mirror_rows(self.0)) }

    /// Quarter turn clockwise.
    #[inline]
    pub fn rotate(self) -> Self { self.transpose().mirror() }

    /// The four packed rows, top first.
    #[inline]
    pub(crate) fn lines(self) -> [Line; 4] {
        [extract_line(self.0, 0), extract_line(self.0, 1), extract_line(self.0, 2), extract_line(self.0, 3)]
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Board({:#018x})", self.0) }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(&self.decode(), f) }
}

impl From<BoardRaw> for Board {
    fn from(v: BoardRaw) -> Self { Board::from_raw(v) }
}

impl TryFrom<&Grid> for Board {
    type Error = EngineError;

    fn try_from(grid: &Grid) -> Result<Self, Self::Error> { Board::encode(grid) }
}

#[inline(always)]
fn cell_shift(idx: usize) -> u32 { (60 - 4 * idx) as u32 }

#[inline(always)]
pub(crate) fn extract_line(board: BoardRaw, line_idx: usize) -> Line {
    ((board >> ((3 - line_idx) * 16)) & 0xffff) as Line
}

#[inline(always)]
fn shift_rows(board: BoardRaw, table: &[Line]) -> BoardRaw {
    (0..4).fold(0, |acc, row_idx| {
        let row = tables::lookup(table, extract_line(board, row_idx));
        acc | (row as BoardRaw) << ((3 - row_idx) * 16)
    })
}

/// Swap the two off-diagonal 2x2 nibble blocks of every quadrant, then the off-diagonal quadrants.
#[inline]
pub(crate) fn transpose(x: BoardRaw) -> BoardRaw {
    let a1 = x & 0xF0F0_0F0F_F0F0_0F0F;
    let a2 = x & 0x0000_F0F0_0000_F0F0;
    let a3 = x & 0x0F0F_0000_0F0F_0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00_FF00_00FF_00FF;
    let b2 = a & 0x00FF_00FF_0000_0000;
    let b3 = a & 0x0000_0000_FF00_FF00;
    b1 | (b2 >> 24) | (b3 << 24)
}

#[inline]
fn mirror_rows(x: BoardRaw) -> BoardRaw {
    ((x & 0xF000_F000_F000_F000) >> 12)
        | ((x & 0x0F00_0F00_0F00_0F00) >> 4)
        | ((x & 0x00F0_00F0_00F0_00F0) << 4)
        | ((x & 0x000F_000F_000F_000F) << 12)
}
