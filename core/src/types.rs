/// Single coordinate axis used for the board side length and for positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`, zero based, row-major.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Row-major linear index of `coords` on a square board of side `size`.
pub const fn linear_index((row, col): Coord2, size: Coord) -> usize {
    row as usize * size as usize + col as usize
}

/// Inverse of [`linear_index`].
pub const fn from_linear_index(index: usize, size: Coord) -> Coord2 {
    let size = size as usize;
    ((index / size) as Coord, (index % size) as Coord)
}

/// Whether `coords` lies on a square board of side `size`.
pub const fn in_bounds((row, col): Coord2, size: Coord) -> bool {
    row < size && col < size
}

/// Snaps a continuous pointer position to the cell under it.
///
/// The position is bounds checked before truncation, so anything outside
/// `[0, size)` on either axis (including small negatives like `-0.5`) yields
/// `None`.
pub fn snap_point(row: f64, col: f64, size: Coord) -> Option<Coord2> {
    let limit = f64::from(size);
    if !(0.0..limit).contains(&row) || !(0.0..limit).contains(&col) {
        return None;
    }
    Some((row as Coord, col as Coord))
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), size: Coord) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;

    let next_row = row.checked_add_signed(d_row.try_into().ok()?)?;
    if next_row >= size {
        return None;
    }

    let next_col = col.checked_add_signed(d_col.try_into().ok()?)?;
    if next_col >= size {
        return None;
    }

    Some((next_row, next_col))
}

/// In-bounds neighbors of a cell over the 8 compass directions.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    size: Coord,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, size: Coord) -> Self {
        Self {
            center,
            size,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.size);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
