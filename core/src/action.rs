use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player input, as produced by an input layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Reveal(Coord2),
    ToggleFlag(Coord2),
    Restart,
}

/// Why an action left the game untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ignored {
    OutOfBounds,
    GameOver,
    /// Flags block reveals
    Flagged,
    /// Open cells cannot be flagged
    AlreadyOpen,
    /// Chord on a cell whose flagged neighbors do not match its count
    ChordMismatch,
    /// Chord on a cell with no closed, unflagged neighbors left
    NothingToOpen,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Applied,
    Ignored(Ignored),
}

impl Outcome {
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Game status after an action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Playing,
    /// Won, with the time from the first reveal to the last safe cell
    Won(Duration),
    Lost,
}

impl Status {
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won(_) | Self::Lost)
    }

    /// Whole seconds of play for a won game.
    pub const fn elapsed_secs(self) -> Option<u64> {
        match self {
            Self::Won(elapsed) => Some(elapsed.as_secs()),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub pos: Coord2,
    pub tile: Tile,
}

impl CellChange {
    pub const fn new(pos: Coord2, tile: Tile) -> Self {
        Self { pos, tile }
    }
}

/// Everything a renderer needs to catch up after one action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub outcome: Outcome,
    /// Cells whose visible state changed, in the order they changed
    pub changes: Vec<CellChange>,
    pub status: Status,
}

impl Update {
    /// Whether this update could require a redraw
    pub fn has_update(&self) -> bool {
        !self.changes.is_empty()
    }
}
