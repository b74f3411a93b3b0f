//! A chess rules engine for click-driven boards.
//!
//! Select a square and get the legal destinations back as a highlight set; click one of them to
//! play the move.  The `Game` turn controller talks to whatever draws the board through the
//! `BoardView` trait.
//!
//! ```
//! use chess_rules::{Board, Color, MoveGen};
//!
//! let board = Board::default();
//! assert_eq!(board.side_to_move(), Color::White);
//! assert_eq!(MoveGen::new_legal(&board).len(), 20);
//! ```

mod color;
pub use crate::color::*;

mod piece;
pub use crate::piece::*;

mod square;
pub use crate::square::*;

mod bitboard;
pub use crate::bitboard::{BitBoard, EMPTY};

mod chess_move;
pub use crate::chess_move::*;

mod board;
pub use crate::board::*;

mod board_builder;
pub use crate::board_builder::*;

mod movegen;
pub use crate::movegen::*;

mod check;
pub use crate::check::*;

mod legality;
pub use crate::legality::*;

mod castling;
pub use crate::castling::*;

mod game;
pub use crate::game::*;

mod error;
pub use crate::error::*;
