use serde::{Deserialize, Serialize};

use crate::*;

/// A single board cell with a fixed position and a hidden pairing key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: Position,
    pub value: PairKey,
}

/// Player-visible state of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    Hidden,
    Revealed(PairKey),
    Solved(PairKey),
}

impl TileView {
    pub const fn is_face_up(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    pub const fn value(self) -> Option<PairKey> {
        match self {
            Self::Hidden => None,
            Self::Revealed(value) | Self::Solved(value) => Some(value),
        }
    }
}

impl Default for TileView {
    fn default() -> Self {
        Self::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_tiles_hide_their_value() {
        assert_eq!(TileView::default().value(), None);
        assert!(!TileView::Hidden.is_face_up());

        for view in [TileView::Revealed(3), TileView::Solved(3)] {
            assert!(view.is_face_up());
            assert_eq!(view.value(), Some(3));
        }
    }
}
