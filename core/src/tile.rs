use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Player-visible state of a single tile.
///
/// Valid transitions:
/// - Hidden -> Revealed
/// - Revealed -> Hidden
/// - Revealed -> Matched
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    #[default]
    Hidden,
    Revealed,
    /// Terminal, the tile was part of a found pair
    Matched,
}

impl TileState {
    /// Whether the symbol is shown to the player
    pub const fn is_face_up(self) -> bool {
        matches!(self, Self::Revealed | Self::Matched)
    }

    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }
}

/// Read-only projection used for rendering, the symbol is only exposed while face up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub state: TileState,
    pub symbol: Option<Symbol>,
}

impl TileView {
    pub const fn new(state: TileState, symbol: Symbol) -> Self {
        Self {
            state,
            symbol: if state.is_face_up() { Some(symbol) } else { None },
        }
    }
}
