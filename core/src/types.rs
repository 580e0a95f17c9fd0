use core::fmt;
use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Identity of a tile on the board, `0..size²` in row-major order.
pub type Position = u8;

/// Pairing key shared by the two tiles of a pair, `1..=pair_count`.
pub type PairKey = u8;

/// Count type used for cell and pair counts.
pub type CellCount = u8;

/// Two-dimensional coordinates `(column, row)`.
pub type Coord2 = (u8, u8);

/// Side length of the square board, always within [`BoardSize::MIN`, `BoardSize::MAX`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BoardSize(u8);

impl BoardSize {
    pub const MIN: Self = Self(2);
    pub const MAX: Self = Self(10);
    pub const DEFAULT: Self = Self(4);

    pub const fn new(side: u8) -> Result<Self> {
        if side >= Self::MIN.0 && side <= Self::MAX.0 {
            Ok(Self(side))
        } else {
            Err(GameError::InvalidBoardSize(side))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn total_cells(self) -> CellCount {
        self.0 * self.0
    }

    pub const fn pair_count(self) -> CellCount {
        self.total_cells() / 2
    }

    pub const fn has_orphan(self) -> bool {
        self.total_cells() % 2 == 1
    }

    /// Steps the side length by `delta`, saturating at the domain bounds.
    pub const fn saturating_step(self, delta: i8) -> Self {
        let side = self.0.saturating_add_signed(delta);
        if side < Self::MIN.0 {
            Self::MIN
        } else if side > Self::MAX.0 {
            Self::MAX
        } else {
            Self(side)
        }
    }

    pub fn contains(self, position: Position) -> bool {
        position < self.total_cells()
    }

    pub fn coords_of(self, position: Position) -> Coord2 {
        (position % self.0, position / self.0)
    }

    pub fn position_at(self, (x, y): Coord2) -> Option<Position> {
        if x < self.0 && y < self.0 {
            Some(y * self.0 + x)
        } else {
            None
        }
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = GameError;

    fn try_from(side: u8) -> Result<Self> {
        Self::new(side)
    }
}

impl From<BoardSize> for u8 {
    fn from(size: BoardSize) -> Self {
        size.0
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.0)
    }
}

/// Identity of one initialized session, bumped on every re-initialization.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_size_rejects_out_of_range() {
        assert_eq!(BoardSize::new(1), Err(GameError::InvalidBoardSize(1)));
        assert_eq!(BoardSize::new(11), Err(GameError::InvalidBoardSize(11)));
        assert_eq!(BoardSize::new(2).map(BoardSize::get), Ok(2));
        assert_eq!(BoardSize::new(10).map(BoardSize::get), Ok(10));
    }

    #[test]
    fn saturating_step_stays_in_domain() {
        assert_eq!(BoardSize::MIN.saturating_step(-1), BoardSize::MIN);
        assert_eq!(BoardSize::MAX.saturating_step(1), BoardSize::MAX);
        assert_eq!(BoardSize::DEFAULT.saturating_step(2).get(), 6);
        assert_eq!(BoardSize::MAX.saturating_step(-2).get(), 8);
    }

    #[test]
    fn coords_follow_row_major_order() {
        let size = BoardSize::new(3).unwrap();

        assert_eq!(size.coords_of(0), (0, 0));
        assert_eq!(size.coords_of(5), (2, 1));
        assert_eq!(size.position_at((2, 1)), Some(5));
        assert_eq!(size.position_at((3, 0)), None);
        assert!(size.contains(8));
        assert!(!size.contains(9));
    }

    #[test]
    fn deserialize_validates_range() {
        assert_eq!(serde_json::from_str::<BoardSize>("6").unwrap().get(), 6);
        assert!(serde_json::from_str::<BoardSize>("12").is_err());
    }
}
