use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineError;

pub const SIZE: usize = 4;

/// Largest tile a 4x4 game can produce (2^17); `Grid::from_rows` rejects anything above it.
pub const MAX_TILE: u32 = 1 << 17;

type Row = [u32; SIZE];
type Score = u64;

/// A direction to move/merge tiles.
///
/// Discriminants double as table indices for the bitboard engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Enumeration order used by the grid strategies; ties resolve to the earliest entry.
    pub const SEARCH_ORDER: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    #[inline]
    pub fn index(self) -> usize { self as usize }

    pub fn from_index(idx: usize) -> Option<Direction> { Self::ALL.get(idx).copied() }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Right => "RIGHT",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Outcome of sliding a grid in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub grid: Grid,
    /// Sum of the values produced by merges.
    pub score: Score,
    /// False iff `grid` equals the input cell for cell.
    pub moved: bool,
}

/// Plain 4x4 board of tile values (0 = empty).
///
/// The field is public for literals and tests. Grids built that way must hold
/// only 0 or powers of two up to [`MAX_TILE`]; use [`Grid::from_rows`] for
/// untrusted input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid(pub [[u32; SIZE]; SIZE]);

impl Grid {
    pub const EMPTY: Grid = Grid([[0; SIZE]; SIZE]);

    /// Build a grid from untrusted rows, checking shape and tile values (0 or a power of two
    /// no larger than [`MAX_TILE`]).
    ///
    /// ```
    /// use search_2048::grid::Grid;
    /// let rows = vec![vec![2, 0, 0, 0], vec![0; 4], vec![0; 4], vec![0, 0, 0, 4]];
    /// let g = Grid::from_rows(&rows).unwrap();
    /// assert_eq!(g.max_tile(), 4);
    /// assert!(Grid::from_rows(&rows[..3]).is_err());
    /// ```
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Grid, EngineError> {
        if rows.len() != SIZE {
            let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
            return Err(EngineError::InvalidBoardShape { rows: rows.len(), cols });
        }
        let mut cells = [[0u32; SIZE]; SIZE];
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != SIZE {
                return Err(EngineError::InvalidBoardShape { rows: rows.len(), cols: row.len() });
            }
            for (c, &value) in row.iter().enumerate() {
                if value != 0 && (!value.is_power_of_two() || value > MAX_TILE) {
                    return Err(EngineError::InvalidTileValue { row: r, col: c, value });
                }
                cells[r][c] = value;
            }
        }
        Ok(Grid(cells))
    }

    #[inline]
    pub fn rows(&self) -> &[[u32; SIZE]; SIZE] { &self.0 }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 { self.0[row][col] }

    /// Slide/merge in `dir`. Always defined, including for no-op directions.
    pub fn apply(&self, dir: Direction) -> MoveResult {
        match dir {
            Direction::Up => move_up(self),
            Direction::Right => move_right(self),
            Direction::Down => move_down(self),
            Direction::Left => move_left(self),
        }
    }

    /// Coordinates `(row, col)` of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::with_capacity(SIZE * SIZE);
        for r in 0..SIZE {
            for c in 0..SIZE {
                if self.0[r][c] == 0 {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    pub fn count_empty(&self) -> usize { self.0.iter().flatten().filter(|&&v| v == 0).count() }

    pub fn max_tile(&self) -> u32 { self.0.iter().flatten().copied().max().unwrap_or(0) }

    /// True when no cell is empty and every direction is a no-op.
    pub fn is_game_over(&self) -> bool {
        self.count_empty() == 0 && Direction::ALL.iter().all(|&dir| !self.apply(dir).moved)
    }

    /// Copy of this grid with `value` placed at `(row, col)`.
    #[inline]
    pub fn with_tile(&self, row: usize, col: usize, value: u32) -> Grid {
        let mut next = *self;
        next.0[row][col] = value;
        next
    }

    /// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell. Full grids are returned as-is.
    ///
    /// ```
    /// use search_2048::grid::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    pub fn with_random_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Grid {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return *self;
        }
        let (r, c) = empty[rng.gen_range(0..empty.len())];
        let value = if rng.gen_range(0..10) < 9 { 2 } else { 4 };
        self.with_tile(r, c, value)
    }

    fn transpose(&self) -> Grid {
        let mut out = [[0u32; SIZE]; SIZE];
        for (r, row) in self.0.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                out[c][r] = v;
            }
        }
        Grid(out)
    }

    fn mirror(&self) -> Grid {
        let mut out = self.0;
        for row in out.iter_mut() {
            row.reverse();
        }
        Grid(out)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Grid({:?})", self.0) }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f, "-----------------------------")?;
            }
            let cells: Vec<String> = row
                .iter()
                .map(|&v| if v == 0 { format!("{:^6}", "") } else { format!("{:^6}", v) })
                .collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl From<[[u32; SIZE]; SIZE]> for Grid {
    fn from(cells: [[u32; SIZE]; SIZE]) -> Self { Grid(cells) }
}

/// Compress one row towards index 0. Each tile takes part in at most one merge.
pub fn compress_row(row: Row) -> (Row, Score) {
    let mut tiles = row.iter().copied().filter(|&v| v != 0).peekable();
    let mut out = [0u32; SIZE];
    let mut score = 0;
    let mut idx = 0;
    while let Some(tile) = tiles.next() {
        if tiles.peek() == Some(&tile) {
            tiles.next();
            let merged = tile * 2;
            score += merged as Score;
            out[idx] = merged;
        } else {
            out[idx] = tile;
        }
        idx += 1;
    }
    (out, score)
}

pub fn move_left(grid: &Grid) -> MoveResult {
    let mut cells = grid.0;
    let mut score = 0;
    for row in cells.iter_mut() {
        let (next, gained) = compress_row(*row);
        *row = next;
        score += gained;
    }
    let next = Grid(cells);
    MoveResult { grid: next, score, moved: next != *grid }
}

pub fn move_right(grid: &Grid) -> MoveResult {
    let res = move_left(&grid.mirror());
    finish(grid, res.grid.mirror(), res.score)
}

pub fn move_up(grid: &Grid) -> MoveResult {
    let res = move_left(&grid.transpose());
    finish(grid, res.grid.transpose(), res.score)
}

pub fn move_down(grid: &Grid) -> MoveResult {
    let res = move_right(&grid.transpose());
    finish(grid, res.grid.transpose(), res.score)
}

#[inline]
fn finish(input: &Grid, next: Grid, score: Score) -> MoveResult {
    MoveResult { grid: next, score, moved: next != *input }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn single_row(row: Row) -> Grid { Grid([row, [0; 4], [0; 4], [0; 4]]) }

    #[test]
    fn it_compress_row() {
        assert_eq!(compress_row([0, 0, 0, 0]), ([0, 0, 0, 0], 0));
        assert_eq!(compress_row([2, 2, 0, 0]), ([4, 0, 0, 0], 4));
        assert_eq!(compress_row([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(compress_row([2, 0, 0, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(compress_row([4, 4, 8, 0]), ([8, 8, 0, 0], 8));
        assert_eq!(compress_row([2, 4, 2, 4]), ([2, 4, 2, 4], 0));
    }

    #[test]
    fn test_move_left_row_cases() {
        let res = move_left(&single_row([2, 2, 0, 0]));
        assert_eq!(res.grid.0[0], [4, 0, 0, 0]);
        assert_eq!(res.score, 4);
        assert!(res.moved);

        let res = move_left(&single_row([2, 2, 2, 2]));
        assert_eq!(res.grid.0[0], [4, 4, 0, 0]);
        assert_eq!(res.score, 8);

        let res = move_left(&single_row([2, 4, 8, 16]));
        assert_eq!(res.grid.0[0], [2, 4, 8, 16]);
        assert_eq!(res.score, 0);
        assert!(!res.moved);
    }

    #[test]
    fn test_move_right() {
        let res = move_right(&single_row([2, 2, 4, 0]));
        assert_eq!(res.grid.0[0], [0, 0, 4, 4]);
        assert_eq!(res.score, 4);
        let res = move_right(&single_row([0, 2, 2, 2]));
        assert_eq!(res.grid.0[0], [0, 0, 2, 4]);
    }

    #[test]
    fn test_move_up_and_down() {
        let g = Grid([[2, 0, 0, 0], [2, 4, 0, 0], [0, 4, 0, 0], [4, 8, 0, 2]]);
        let up = move_up(&g);
        assert_eq!(up.grid, Grid([[4, 8, 0, 2], [4, 8, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]));
        assert_eq!(up.score, 12);
        let down = move_down(&g);
        assert_eq!(down.grid, Grid([[0, 0, 0, 0], [0, 0, 0, 0], [4, 8, 0, 0], [4, 8, 0, 2]]));
        assert_eq!(down.score, 12);
    }

    #[test]
    fn test_slide_without_merge() {
        let res = move_left(&single_row([0, 0, 0, 2]));
        assert!(res.moved);
        assert_eq!(res.score, 0);
    }

    #[test]
    fn test_second_application_is_noop() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let mut g = Grid::EMPTY;
            for _ in 0..rng.gen_range(1..16) {
                g = g.with_random_tile(&mut rng);
            }
            for dir in Direction::ALL {
                let once = g.apply(dir);
                let twice = once.grid.apply(dir);
                assert!(!twice.moved, "{dir} not idempotent on {g:?}");
                assert_eq!(twice.grid, once.grid);
            }
        }
    }

    #[test]
    fn test_is_game_over() {
        let stuck = Grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(stuck.is_game_over());
        let mergeable = Grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 4]]);
        assert!(!mergeable.is_game_over());
        assert!(!Grid::EMPTY.is_game_over());
    }

    #[test]
    fn test_empty_cells() {
        let g = Grid([[2, 0, 2, 2], [2, 2, 2, 2], [2, 2, 2, 2], [2, 2, 2, 0]]);
        assert_eq!(g.empty_cells(), vec![(0, 1), (3, 3)]);
        assert_eq!(g.count_empty(), 2);
    }

    #[test]
    fn test_random_tile_fills_grid() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut g = Grid::EMPTY;
        for _ in 0..20 {
            g = g.with_random_tile(&mut rng);
        }
        assert_eq!(g.count_empty(), 0);
        assert!(g.0.iter().flatten().all(|&v| v == 2 || v == 4));
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        let bad_shape = vec![vec![0u32; 4], vec![0; 4], vec![0; 3], vec![0; 4]];
        assert!(matches!(Grid::from_rows(&bad_shape), Err(EngineError::InvalidBoardShape { cols: 3, .. })));
        let bad_value = vec![vec![0u32; 4], vec![0, 3, 0, 0], vec![0; 4], vec![0; 4]];
        assert!(matches!(
            Grid::from_rows(&bad_value),
            Err(EngineError::InvalidTileValue { row: 1, col: 1, value: 3 })
        ));
    }

    #[test]
    fn test_from_rows_bounds_tile_size() {
        let rows = |v: u32| vec![vec![v, v, 0, 0], vec![0; 4], vec![0; 4], vec![0; 4]];
        let g = Grid::from_rows(&rows(MAX_TILE)).unwrap();
        assert_eq!(g.apply(Direction::Left).grid.get(0, 0), MAX_TILE * 2);
        for value in [MAX_TILE << 1, 1 << 31] {
            assert!(matches!(
                Grid::from_rows(&rows(value)),
                Err(EngineError::InvalidTileValue { row: 0, col: 0, .. })
            ));
        }
    }

    #[test]
    fn test_direction_index_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_index(dir.index()), Some(dir));
        }
        assert_eq!(Direction::from_index(4), None);
    }
}
