use std::sync::OnceLock;

use super::Line;

/// Precomputed row transitions for all 65,536 packed rows.
///
/// `left[i]` is row `i` compressed towards column 0 (the high nibble);
/// `right[i]` is its mirror image. Up/down reuse these through a transpose.
pub(crate) struct RowTables {
    pub(crate) left: Box<[Line]>,
    pub(crate) right: Box<[Line]>,
}

pub(crate) const LINE_TABLE_SIZE: usize = 0x1_0000; // 65,536 possible 16-bit rows

/// Largest storable exponent; two of these never merge.
const MAX_RANK: u8 = 0xf;

static ROW_TABLES: OnceLock<RowTables> = OnceLock::new();

/// Build the tables if they are not built yet. Safe to call multiple times.
pub fn init() {
    let _ = ROW_TABLES.get_or_init(create_tables);
}

#[inline(always)]
pub(crate) fn tables() -> &'static RowTables {
    ROW_TABLES.get_or_init(create_tables)
}

fn create_tables() -> RowTables {
    // Heap allocation keeps init off the stack.
    let mut left = vec![0 as Line; LINE_TABLE_SIZE];
    let mut right = vec![0 as Line; LINE_TABLE_SIZE];

    for row in 0..LINE_TABLE_SIZE {
        let line = row as Line;
        let moved = ranks_to_line(compress_left(line_to_ranks(line)));
        left[row] = moved;
        right[reverse_line(line) as usize] = reverse_line(moved);
    }

    RowTables { left: left.into_boxed_slice(), right: right.into_boxed_slice() }
}

#[inline(always)]
pub(crate) fn lookup(table: &[Line], idx: Line) -> Line {
    debug_assert!((idx as usize) < LINE_TABLE_SIZE);
    table[idx as usize]
}

/// Unpack a row into exponents, column 0 first.
#[inline]
pub(crate) fn line_to_ranks(line: Line) -> [u8; 4] {
    [(line >> 12) as u8 & 0xf, (line >> 8) as u8 & 0xf, (line >> 4) as u8 & 0xf, line as u8 & 0xf]
}

#[inline]
pub(crate) fn ranks_to_line(ranks: [u8; 4]) -> Line {
    (ranks[0] as Line) << 12 | (ranks[1] as Line) << 8 | (ranks[2] as Line) << 4 | ranks[3] as Line
}

#[inline]
pub(crate) fn reverse_line(line: Line) -> Line {
    (line >> 12) | ((line >> 4) & 0x00f0) | ((line << 4) & 0x0f00) | (line << 12)
}

fn compress_left(ranks: [u8; 4]) -> [u8; 4] {
    let mut out = [0u8; 4];
    let mut idx = 0;
    let mut tiles = ranks.iter().copied().filter(|&r| r != 0).peekable();
    while let Some(rank) = tiles.next() {
        if rank < MAX_RANK && tiles.peek() == Some(&rank) {
            tiles.next();
            out[idx] = rank + 1;
        } else {
            out[idx] = rank;
        }
        idx += 1;
    }
    out
}
