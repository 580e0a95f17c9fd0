extern crate alloc;

use alloc::collections::BTreeMap;
use core::ops::Index;
use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use evaluator::*;
pub use generator::*;
pub use observation::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod evaluator;
mod generator;
mod observation;
mod session;
mod tile;
mod types;

/// What to do with boards whose cell count is odd and therefore leave one tile without a twin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OddBoardPolicy {
    /// Keep the orphan tile on the board but leave it out of the win check.
    #[default]
    ExcludeOrphan,
    /// Refuse odd board sizes altogether.
    Reject,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: BoardSize,
    pub mismatch_delay_ms: u32,
    pub odd_boards: OddBoardPolicy,
    /// Fixed seed for reproducible decks, fresh entropy when unset.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub const DEFAULT_MISMATCH_DELAY_MS: u32 = 1000;

    pub const fn new(size: BoardSize) -> Self {
        Self {
            size,
            mismatch_delay_ms: Self::DEFAULT_MISMATCH_DELAY_MS,
            odd_boards: OddBoardPolicy::ExcludeOrphan,
            seed: None,
        }
    }

    pub const fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms.into())
    }

    /// Checks a raw side length against the size domain and the odd board policy.
    pub fn validate_size(&self, side: u8) -> Result<BoardSize> {
        let size = BoardSize::new(side)?;
        match self.odd_boards {
            OddBoardPolicy::Reject if size.has_orphan() => Err(GameError::OddBoardSize(side)),
            _ => Ok(size),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(BoardSize::DEFAULT)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    size: BoardSize,
    tiles: Vec<Tile>,
    orphan: Option<Position>,
}

impl Deck {
    /// Builds a deck from values already in board order.
    pub(crate) fn from_shuffled(size: BoardSize, values: Vec<PairKey>) -> Self {
        let tiles: Vec<Tile> = values
            .into_iter()
            .zip(0..)
            .map(|(value, position)| Tile { position, value })
            .collect();
        let orphan = Self::find_orphan(&tiles);
        Self {
            size,
            tiles,
            orphan,
        }
    }

    /// Builds a deck from an explicit layout, rejecting anything that is not a full set of pairs
    /// (plus a single orphan on odd boards).
    pub fn from_values(size: BoardSize, values: &[PairKey]) -> Result<Self> {
        if values.len() != usize::from(size.total_cells()) {
            return Err(GameError::InvalidDeck);
        }

        let counts = Self::count_values(values.iter().copied());
        let singles = counts.values().filter(|&&count| count == 1).count();
        let expected_singles = usize::from(size.has_orphan());
        if counts.values().any(|&count| count > 2) || singles != expected_singles {
            return Err(GameError::InvalidDeck);
        }

        Ok(Self::from_shuffled(size, values.to_vec()))
    }

    fn count_values(values: impl Iterator<Item = PairKey>) -> BTreeMap<PairKey, u8> {
        let mut counts = BTreeMap::new();
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }
        counts
    }

    fn find_orphan(tiles: &[Tile]) -> Option<Position> {
        let counts = Self::count_values(tiles.iter().map(|tile| tile.value));
        tiles
            .iter()
            .find(|tile| counts[&tile.value] == 1)
            .map(|tile| tile.position)
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, position: Position) -> Option<&Tile> {
        self.tiles.get(usize::from(position))
    }

    /// The tile without a twin, only present on odd boards.
    pub fn orphan(&self) -> Option<Position> {
        self.orphan
    }

    /// Number of tiles that can be solved, which is what the win check counts against.
    pub fn pairable_cells(&self) -> usize {
        self.len() - usize::from(self.orphan.is_some())
    }

    pub fn is_pair(&self, first: Position, second: Position) -> bool {
        first != second && self[first].value == self[second].value
    }
}

impl Index<Position> for Deck {
    type Output = Tile;

    fn index(&self, position: Position) -> &Self::Output {
        &self.tiles[usize::from(position)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Deselected,
    Matched,
    Mismatched(ResetTicket),
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the board.
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Deselected => true,
            Matched => true,
            Mismatched(_) => true,
            Won => true,
        }
    }

    pub const fn ticket(self) -> Option<ResetTicket> {
        match self {
            Self::Mismatched(ticket) => Some(ticket),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(side: u8) -> BoardSize {
        BoardSize::new(side).unwrap()
    }

    #[test]
    fn from_values_accepts_pairs() {
        let deck = Deck::from_values(size(2), &[2, 1, 1, 2]).unwrap();

        assert_eq!(deck.len(), 4);
        assert_eq!(deck[2], Tile { position: 2, value: 1 });
        assert_eq!(deck.orphan(), None);
        assert_eq!(deck.pairable_cells(), 4);
        assert!(deck.is_pair(1, 2));
        assert!(!deck.is_pair(0, 1));
    }

    #[test]
    fn from_values_finds_orphan() {
        let deck = Deck::from_values(size(3), &[1, 2, 3, 4, 5, 4, 3, 2, 1]).unwrap();

        assert_eq!(deck.orphan(), Some(4));
        assert_eq!(deck.pairable_cells(), 8);
    }

    #[test]
    fn from_values_rejects_bad_layouts() {
        assert_eq!(Deck::from_values(size(2), &[1, 1, 2]), Err(GameError::InvalidDeck));
        assert_eq!(Deck::from_values(size(2), &[1, 1, 1, 2]), Err(GameError::InvalidDeck));
        assert_eq!(Deck::from_values(size(2), &[1, 1, 2, 3]), Err(GameError::InvalidDeck));
        assert_eq!(
            Deck::from_values(size(3), &[1, 1, 2, 2, 3, 3, 4, 4, 4]),
            Err(GameError::InvalidDeck)
        );
    }

    #[test]
    fn validate_size_applies_odd_policy() {
        let config = GameConfig::default();
        assert_eq!(config.validate_size(5), Ok(size(5)));
        assert_eq!(config.validate_size(11), Err(GameError::InvalidBoardSize(11)));

        let strict = GameConfig {
            odd_boards: OddBoardPolicy::Reject,
            ..config
        };
        assert_eq!(strict.validate_size(5), Err(GameError::OddBoardSize(5)));
        assert_eq!(strict.validate_size(6), Ok(size(6)));
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: GameConfig = serde_json::from_str(r#"{"size": 6}"#).unwrap();

        assert_eq!(config.size, size(6));
        assert_eq!(config.mismatch_delay(), Duration::from_millis(1000));
        assert_eq!(config.odd_boards, OddBoardPolicy::ExcludeOrphan);
        assert_eq!(config.seed, None);
    }
}
