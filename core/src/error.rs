use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board size must be at least 1")]
    InvalidSize,
    #[error("Too many mines: {mines} requested but only {capacity} fit outside the safe zone")]
    TooManyMines { mines: CellCount, capacity: CellCount },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Expected {expected} distinct mines, got {actual}")]
    MineCountMismatch {
        expected: CellCount,
        actual: CellCount,
    },
}

pub type Result<T> = core::result::Result<T, GameError>;
