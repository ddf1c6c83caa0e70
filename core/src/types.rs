/// Single coordinate axis used for rows, columns and grid dimensions.
pub type Coord = u8;

/// Tile position as `(row, column)`.
pub type Position = (Coord, Coord);

/// Symbol hidden under a tile, `1..=SYMBOL_COUNT`.
pub type Symbol = u8;

/// Count type used for tiles, pairs and mistakes.
pub type TileCount = u8;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Position {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> TileCount {
    a.saturating_mul(b)
}

/// Iterates every position of a `rows × cols` grid in row-major order.
#[derive(Clone, Debug)]
pub struct PositionIter {
    bounds: Position,
    next: Position,
}

impl PositionIter {
    pub fn new(bounds: Position) -> Self {
        Self {
            bounds,
            next: (0, 0),
        }
    }
}

impl Iterator for PositionIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        let (rows, cols) = self.bounds;
        let (row, col) = self.next;
        if row >= rows || cols == 0 {
            return None;
        }

        self.next = if col + 1 < cols {
            (row, col + 1)
        } else {
            (row + 1, 0)
        };
        Some((row, col))
    }
}
