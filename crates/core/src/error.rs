//! Error types for the resolution engine.
//!
//! Invalid player moves are not errors (see [`crate::turn::TurnOutcome`]); these
//! types cover structural faults that abort a resolution.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },
    #[error("expected a tile at ({row}, {col}) but the cell is empty")]
    MissingTile { row: usize, col: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has {0} rows, expected 9")]
    RowCount(usize),
    #[error("layout row {row} has {found} cells, expected 9")]
    ColumnCount { row: usize, found: usize },
    #[error("unrecognized token {token:?} at ({row}, {col})")]
    BadToken { row: usize, col: usize, token: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("color weights must not all be zero")]
    EmptyWeights,
}

/// Anything that can abort a turn's resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, EngineError>;
