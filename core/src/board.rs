use alloc::vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Square grid of cells with lazily placed mines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    cells: Array2<Cell>,
    generated: bool,
}

impl Board {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let size = usize::from(config.size);
        let cells = Array2::from_shape_fn((size, size), |(row, col)| {
            Cell::new((row as Coord, col as Coord))
        });
        Ok(Self {
            config,
            cells,
            generated: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn size(&self) -> Coord {
        self.config.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn total_cells(&self) -> CellCount {
        self.config.total_cells()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn cell(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn tile(&self, coords: Coord2) -> Option<Tile> {
        self.cell(coords).map(Cell::tile)
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> Option<&mut Cell> {
        self.cells.get_mut(coords.to_nd_index())
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Every `(coords, tile)` pair in row-major order, for a full redraw.
    pub fn tiles(&self) -> impl Iterator<Item = (Coord2, Tile)> + '_ {
        self.cells.iter().map(|cell| (cell.pos(), cell.tile()))
    }

    pub fn mine_positions(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.is_mine())
            .map(Cell::pos)
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn flagged_neighbor_count(&self, coords: Coord2) -> u8 {
        self.count_neighbors(coords, Cell::is_flagged)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.count_neighbors(coords, Cell::is_mine)
    }

    fn count_neighbors(&self, coords: Coord2, predicate: impl Fn(&Cell) -> bool) -> u8 {
        // at most 8 neighbors, the cast cannot truncate
        self.neighbors(coords)
            .filter(|&pos| predicate(&self[pos]))
            .count() as u8
    }

    /// Places mines with `generator`, keeping the configured safe zone around `anchor` clear,
    /// then fills in the adjacent counts. A board that already has its mines is left alone.
    pub fn generate<G: MineGenerator + ?Sized>(&mut self, anchor: Coord2, generator: &mut G) {
        if self.generated {
            log::warn!("Mines already placed, not generating again");
            return;
        }
        let mines = generator.generate(&self.config, anchor);
        self.lay_mines(&mines);
    }

    /// Places mines at exactly the given coordinates instead of generating them.
    pub fn place_mines(&mut self, mines: &[Coord2]) -> Result<()> {
        let size = self.size();
        let mut mask = vec![false; usize::from(self.total_cells())];
        for &coords in mines {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            mask[linear_index(coords, size)] = true;
        }

        let actual = mask.iter().filter(|&&mine| mine).count() as CellCount;
        if actual != self.mine_count() {
            return Err(GameError::MineCountMismatch {
                expected: self.mine_count(),
                actual,
            });
        }

        self.lay_mines(mines);
        Ok(())
    }

    fn lay_mines(&mut self, mines: &[Coord2]) {
        for cell in self.cells.iter_mut() {
            cell.set_content(Content::Clear(0));
        }
        for &coords in mines {
            self.cells[coords.to_nd_index()].set_content(Content::Mine);
        }

        let size = self.size();
        for row in 0..size {
            for col in 0..size {
                let coords = (row, col);
                if self[coords].is_mine() {
                    continue;
                }
                let count = self.adjacent_mine_count(coords);
                self.cells[coords.to_nd_index()].set_content(Content::Clear(count));
            }
        }

        let placed = self.mine_positions().count();
        if placed != usize::from(self.mine_count()) {
            log::warn!(
                "Mine count mismatch, actual: {}, requested: {}",
                placed,
                self.mine_count()
            );
        }
        self.generated = true;
    }

    /// Closes and unflags every cell and forgets the mines, keeping the grid itself.
    pub(crate) fn reset(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.reset();
        }
        self.generated = false;
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
