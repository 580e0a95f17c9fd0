use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board size {0} is outside the supported range of 2 to 10")]
    InvalidBoardSize(u8),
    #[error("Board size {0} has an odd number of cells, which is disabled")]
    OddBoardSize(u8),
    #[error("Deck layout does not match the board size or is not made of pairs")]
    InvalidDeck,
}

pub type Result<T> = core::result::Result<T, GameError>;
