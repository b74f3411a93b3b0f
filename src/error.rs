use crate::square::Square;
use failure::Fail;

/// Sometimes, bad stuff happens.
///
/// Most of these never reach a player.  The click entry point swallows `OutOfBounds`,
/// `IllegalSelection` and `InvalidDestination`, they only surface through the lower-level
/// `Game` API.
#[derive(Debug, Fail, Clone, PartialEq, Eq)]
pub enum Error {
    /// A coordinate pair fell outside of the 8x8 board
    #[fail(display = "The square ({}, {}) is not on the board", x, y)]
    OutOfBounds { x: i32, y: i32 },

    /// The square does not hold a piece of the side to move
    #[fail(display = "There is no piece to select on {}", square)]
    IllegalSelection { square: Square },

    /// The square is not one of the current candidate destinations
    #[fail(display = "{} is not a legal destination", square)]
    InvalidDestination { square: Square },

    /// The piece-code layout is invalid
    #[fail(display = "Invalid board layout: {}", layout)]
    InvalidLayout { layout: String },

    /// The board created from BoardBuilder was found to be invalid
    #[fail(
        display = "The board specified did not pass sanity checks.  Are you sure each side has exactly one king and the side not to move is not in check?"
    )]
    InvalidBoard,

    /// The game already has a result
    #[fail(display = "The game is over")]
    GameOver,
}
