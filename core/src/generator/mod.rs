use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;
pub use random::*;

mod random;

pub trait MineGenerator {
    /// Picks `config.mines` distinct mine positions, keeping the safe zone around `anchor` clear.
    fn generate(&mut self, config: &GameConfig, anchor: Coord2) -> Vec<Coord2>;
}

/// Cells kept free of mines around the first reveal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafeZone {
    /// The anchor and its in-bounds neighbors.
    #[default]
    Neighborhood,
    /// Linear indices `a + {-1, 0, 1} + {-N, 0, N}` clipped to the board. Covers every true
    /// neighbor, and also wraps onto the opposite edge when the anchor sits on the first or last
    /// column.
    LinearIndex,
}

impl SafeZone {
    pub fn cells(self, anchor: Coord2, size: Coord) -> SmallVec<[Coord2; 9]> {
        let mut cells = SmallVec::new();
        match self {
            Self::Neighborhood => {
                cells.push(anchor);
                cells.extend(NeighborIter::new(anchor, size));
            }
            Self::LinearIndex => {
                let total = isize::from(size) * isize::from(size);
                let anchor_index = linear_index(anchor, size) as isize;
                let stride = isize::from(size);
                for row_offset in [-stride, 0, stride] {
                    for col_offset in [-1, 0, 1] {
                        let index = anchor_index + row_offset + col_offset;
                        if !(0..total).contains(&index) {
                            continue;
                        }
                        let coords = from_linear_index(index as usize, size);
                        if !cells.contains(&coords) {
                            cells.push(coords);
                        }
                    }
                }
            }
        }
        cells
    }
}
