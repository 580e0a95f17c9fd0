use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use alloc::collections::BTreeSet;

use crate::*;

/// Everything that makes up one game: the deck plus the face-up, solved, locked and won state.
///
/// Only [`GameEngine`] and [`MatchEvaluator`] mutate it, readers get it through [`GameEngine::session`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    id: SessionId,
    deck: Deck,
    revealed: SmallVec<[Position; 2]>,
    solved: BTreeSet<Position>,
    locked: bool,
    won: bool,
}

impl SessionState {
    pub(crate) fn new(id: SessionId, deck: Deck) -> Self {
        Self {
            id,
            deck,
            revealed: SmallVec::new(),
            solved: BTreeSet::new(),
            locked: false,
            won: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn size(&self) -> BoardSize {
        self.deck.size()
    }

    /// Face-up tiles that are not solved yet, in reveal order.
    pub fn revealed(&self) -> &[Position] {
        &self.revealed
    }

    pub fn solved(&self) -> impl Iterator<Item = Position> + '_ {
        self.solved.iter().copied()
    }

    pub fn solved_count(&self) -> usize {
        self.solved.len()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_face_up(&self, position: Position) -> bool {
        self.revealed.contains(&position) || self.is_solved(position)
    }

    pub fn is_solved(&self, position: Position) -> bool {
        self.solved.contains(&position)
    }

    pub fn tile_view(&self, position: Position) -> TileView {
        match self.deck.get(position) {
            Some(tile) if self.is_solved(position) => TileView::Solved(tile.value),
            Some(tile) if self.revealed.contains(&position) => TileView::Revealed(tile.value),
            _ => TileView::Hidden,
        }
    }

    pub(crate) fn first_revealed(&self) -> Option<Position> {
        self.revealed.first().copied()
    }

    pub(crate) fn reveal_first(&mut self, position: Position) {
        debug_assert!(self.revealed.is_empty());
        self.revealed.push(position);
    }

    pub(crate) fn deselect(&mut self) {
        self.revealed.clear();
    }

    /// Turns the second tile face up and blocks input until it is evaluated.
    pub(crate) fn lock_with(&mut self, position: Position) {
        debug_assert_eq!(self.revealed.len(), 1);
        self.locked = true;
        self.revealed.push(position);
    }

    /// Moves the face-up pair to the solved set and runs the win check.
    pub(crate) fn solve_revealed(&mut self) -> bool {
        self.solved.extend(self.revealed.drain(..));
        self.locked = false;
        self.check_won()
    }

    pub(crate) fn release(&mut self) {
        self.revealed.clear();
        self.locked = false;
    }

    fn check_won(&mut self) -> bool {
        let pairable = self.deck.pairable_cells();
        if pairable > 0 && self.solved.len() == pairable {
            self.won = true;
        }
        self.won
    }
}
