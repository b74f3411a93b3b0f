use crate::color::Color;
use crate::square::Square;
use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Represent a chess piece as a very simple enum
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Eq, Ord, PartialOrd, Copy, Clone, Debug, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// How many piece types are there?
pub const NUM_PIECES: usize = 6;

/// An array representing each piece type, in order of ascending value.
pub const ALL_PIECES: [Piece; NUM_PIECES] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

impl Piece {
    /// Convert the `Piece` to a `usize` for table lookups.
    #[inline]
    pub fn to_index(&self) -> usize {
        *self as usize
    }

    /// Convert a piece with a color to its piece code.  Uppercase is white.
    ///
    /// ```
    /// use chess_rules::{Piece, Color};
    ///
    /// assert_eq!(Piece::Knight.to_string(Color::White), "N");
    /// assert_eq!(Piece::Knight.to_string(Color::Black), "n");
    /// ```
    pub fn to_string(&self, color: Color) -> String {
        let piece = format!("{}", self);
        if color == Color::White {
            piece.to_uppercase()
        } else {
            piece
        }
    }

    /// Parse a single piece code.  Uppercase is white, lowercase is black.
    ///
    /// ```
    /// use chess_rules::{Piece, Color};
    ///
    /// assert_eq!(Piece::from_code('Q'), Some((Piece::Queen, Color::White)));
    /// assert_eq!(Piece::from_code('p'), Some((Piece::Pawn, Color::Black)));
    /// assert_eq!(Piece::from_code('x'), None);
    /// ```
    pub fn from_code(code: char) -> Option<(Piece, Color)> {
        let piece = match code.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        let color = if code.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some((piece, color))
    }

    /// Does this kind of piece remember whether it has moved?  Only kings and rooks do, since
    /// only they take part in castling.
    #[inline]
    pub fn tracks_moves(&self) -> bool {
        *self == Piece::King || *self == Piece::Rook
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match *self {
                Piece::Pawn => "p",
                Piece::Knight => "n",
                Piece::Bishop => "b",
                Piece::Rook => "r",
                Piece::Queen => "q",
                Piece::King => "k",
            }
        )
    }
}

/// A piece standing on the board.
///
/// The board owns every `BoardPiece`.  The stored square always equals the square the piece is
/// indexed under, and `has_moved` is only ever set for kings and rooks.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct BoardPiece {
    piece: Piece,
    color: Color,
    square: Square,
    has_moved: bool,
}

impl BoardPiece {
    /// Create an unmoved piece on a square.
    #[inline]
    pub fn new(piece: Piece, color: Color, square: Square) -> BoardPiece {
        BoardPiece {
            piece,
            color,
            square,
            has_moved: false,
        }
    }

    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn square(&self) -> Square {
        self.square
    }

    /// Has this king or rook moved yet?  Always `false` for every other piece.
    #[inline]
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub(crate) fn set_square(&mut self, square: Square) {
        self.square = square;
    }

    pub(crate) fn set_moved(&mut self, moved: bool) {
        self.has_moved = moved && self.piece.tracks_moves();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_codes_round_trip() {
        for piece in ALL_PIECES.iter() {
            for color in [Color::White, Color::Black].iter() {
                let code = piece.to_string(*color).chars().next().unwrap();
                assert_eq!(Piece::from_code(code), Some((*piece, *color)));
            }
        }
    }

    #[test]
    fn only_kings_and_rooks_remember_moving() {
        let mut pawn = BoardPiece::new(Piece::Pawn, Color::White, Square::make_square(0, 6));
        pawn.set_moved(true);
        assert!(!pawn.has_moved());

        let mut rook = BoardPiece::new(Piece::Rook, Color::White, Square::make_square(0, 7));
        rook.set_moved(true);
        assert!(rook.has_moved());
    }
}
