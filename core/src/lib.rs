use core::ops::Index;
use core::time::Duration;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use clock::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod clock;
mod engine;
mod error;
mod generator;
mod tile;
mod timer;
mod types;

/// Number of rows on the board.
pub const GRID_ROWS: Coord = 4;
/// Number of columns on the board.
pub const GRID_COLS: Coord = 4;
/// Number of distinct symbols, each placed exactly twice.
pub const SYMBOL_COUNT: TileCount = 8;
/// Mismatches allowed before the game is lost.
pub const MISTAKE_LIMIT: TileCount = 3;
/// How long every tile is shown when the game starts.
pub const PREVIEW_DURATION: Duration = Duration::from_millis(3000);
/// How long a mismatched pair stays face up before it is turned back.
pub const MISMATCH_DELAY: Duration = Duration::from_millis(1000);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub mistake_limit: TileCount,
    pub preview: Duration,
    pub mismatch_delay: Duration,
}

impl GameConfig {
    pub const fn new_unchecked(
        mistake_limit: TileCount,
        preview: Duration,
        mismatch_delay: Duration,
    ) -> Self {
        Self {
            mistake_limit,
            preview,
            mismatch_delay,
        }
    }

    pub fn new(mistake_limit: TileCount, preview: Duration, mismatch_delay: Duration) -> Result<Self> {
        let config = Self::new_unchecked(mistake_limit, preview, mismatch_delay);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mistake_limit == 0 {
            Err(GameError::InvalidConfig)
        } else {
            Ok(())
        }
    }

    pub const fn size(&self) -> Position {
        (GRID_ROWS, GRID_COLS)
    }

    pub const fn total_tiles(&self) -> TileCount {
        mult(GRID_ROWS, GRID_COLS)
    }

    pub const fn total_pairs(&self) -> TileCount {
        SYMBOL_COUNT
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(MISTAKE_LIMIT, PREVIEW_DURATION, MISMATCH_DELAY)
    }
}

/// Symbol layout of the board, fixed for the lifetime of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    symbols: Array2<Symbol>,
}

impl Board {
    /// Wraps a layout without checking the pair invariant.
    pub(crate) fn new_unchecked(symbols: Array2<Symbol>) -> Self {
        Self { symbols }
    }

    pub fn from_symbols(symbols: Array2<Symbol>) -> Result<Self> {
        let board = Self::new_unchecked(symbols);
        board.validate()?;
        Ok(board)
    }

    pub fn from_rows(rows: [[Symbol; GRID_COLS as usize]; GRID_ROWS as usize]) -> Result<Self> {
        let size = (GRID_ROWS, GRID_COLS);
        let symbols = Array2::from_shape_fn(size.to_nd_index(), |(row, col)| rows[row][col]);
        Self::from_symbols(symbols)
    }

    /// Checks the shape and that every symbol appears exactly twice.
    pub fn validate(&self) -> Result<()> {
        if self.symbols.dim() != (GRID_ROWS.into(), GRID_COLS.into()) {
            return Err(GameError::InvalidLayout);
        }

        let mut counts = [0u8; SYMBOL_COUNT as usize + 1];
        for &symbol in &self.symbols {
            if symbol == 0 || symbol > SYMBOL_COUNT {
                return Err(GameError::InvalidLayout);
            }
            counts[usize::from(symbol)] += 1;
        }

        if counts[1..].iter().all(|&count| count == 2) {
            Ok(())
        } else {
            Err(GameError::InvalidLayout)
        }
    }

    pub fn validate_coords(&self, coords: Position) -> Result<Position> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Position {
        let dim = self.symbols.dim();
        (
            dim.0.try_into().unwrap_or(Coord::MAX),
            dim.1.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn total_tiles(&self) -> TileCount {
        self.symbols.len().try_into().unwrap_or(TileCount::MAX)
    }

    pub fn symbol_at(&self, coords: Position) -> Symbol {
        self[coords]
    }

    pub fn positions(&self) -> PositionIter {
        PositionIter::new(self.size())
    }

    /// Symbols in row-major order.
    pub fn iter_symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }
}

impl Index<Position> for Board {
    type Output = Symbol;

    fn index(&self, coords: Position) -> &Self::Output {
        &self.symbols[coords.to_nd_index()]
    }
}

/// Outcome of selecting a tile
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Selection was rejected, nothing changed
    NoEffect,
    /// First tile of a pair attempt is now face up
    FirstRevealed,
    /// Second tile matched the first, both are cleared
    Matched,
    /// Second tile did not match, both are turned back after `delay`
    MismatchPending {
        first: Position,
        second: Position,
        delay: Duration,
    },
    /// Last pair found
    Won { elapsed_secs: u64 },
    /// Mistake limit reached
    Lost,
}

impl SelectOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoEffect)
    }

    /// Whether this outcome ended the game
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won { .. } | Self::Lost)
    }
}
