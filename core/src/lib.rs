#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use action::*;
pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod action;
mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod tile;
mod types;

/// Board side length used when nothing else is configured.
pub const DEFAULT_SIZE: Coord = 20;

/// Largest number of cells any safe zone can cover.
const MAX_SAFE_ZONE: CellCount = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
    pub safe_zone: SafeZone,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self {
            size,
            mines,
            safe_zone: SafeZone::Neighborhood,
        }
    }

    /// Square board of side `size` with the default density of one mine per five cells.
    pub fn new(size: Coord) -> Result<Self> {
        Self::with_mines(size, Self::default_mines(size))
    }

    pub fn with_mines(size: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn with_safe_zone(self, safe_zone: SafeZone) -> Self {
        Self { safe_zone, ..self }
    }

    pub const fn default_mines(size: Coord) -> CellCount {
        mult(size, size) / 5
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Mines that always fit, whatever the first move and safe zone turn out to be.
    pub fn capacity(&self) -> CellCount {
        let total = self.total_cells();
        total - total.min(MAX_SAFE_ZONE)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(GameError::InvalidSize);
        }

        let capacity = self.capacity();
        if self.mines > capacity {
            return Err(GameError::TooManyMines {
                mines: self.mines,
                capacity,
            });
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_SIZE, Self::default_mines(DEFAULT_SIZE))
    }
}
