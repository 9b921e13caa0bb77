use std::io;

/// Errors raised at the crate boundary. Search itself never fails.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("board must be 4x4, got {rows} rows (first bad row has {cols} cells)")]
    InvalidBoardShape { rows: usize, cols: usize },
    #[error("tile at ({row}, {col}) is {value}, expected 0 or a power of two up to 131072")]
    InvalidTileValue { row: usize, col: usize, value: u32 },
    #[error("tile {value} does not fit in a 4-bit exponent")]
    TileOutOfRange { value: u32 },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}
