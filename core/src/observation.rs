use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only picture of a session, everything a presentation layer needs to draw the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub size: BoardSize,
    pub session: SessionId,
    pub tiles: Vec<TileView>,
    pub locked: bool,
    pub won: bool,
    pub solved: usize,
    pub pairable: usize,
}

impl Observation {
    pub fn from_engine(engine: &GameEngine) -> Self {
        Self::from_session(engine.session())
    }

    pub fn from_session(session: &SessionState) -> Self {
        let deck = session.deck();
        Self {
            size: session.size(),
            session: session.id(),
            tiles: deck
                .tiles()
                .iter()
                .map(|tile| session.tile_view(tile.position))
                .collect(),
            locked: session.is_locked(),
            won: session.is_won(),
            solved: session.solved_count(),
            pairable: deck.pairable_cells(),
        }
    }

    pub fn view_at(&self, coords: Coord2) -> Option<TileView> {
        let position = self.size.position_at(coords)?;
        self.tiles.get(usize::from(position)).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileView]> {
        self.tiles.chunks(usize::from(self.size.get()))
    }
}
