use crate::bitboard::{BitBoard, EMPTY};
use crate::board::Board;
use crate::check::is_attacked;
use crate::color::{Color, ALL_COLORS};
use crate::error::Error;
use crate::piece::{BoardPiece, Piece};
use crate::square::{Square, ALL_SQUARES, NUM_SQUARES};

use std::convert::TryFrom;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// The initial layout as piece codes, indexed `[y][x]`.  Uppercase is white, lowercase is black
/// and a blank is an empty square.
pub const STANDARD_LAYOUT: [[char; 8]; 8] = [
    ['r', 'n', 'b', 'q', 'k', 'b', 'n', 'r'],
    ['p', 'p', 'p', 'p', 'p', 'p', 'p', 'p'],
    [' ', ' ', ' ', ' ', ' ', ' ', ' ', ' '],
    [' ', ' ', ' ', ' ', ' ', ' ', ' ', ' '],
    [' ', ' ', ' ', ' ', ' ', ' ', ' ', ' '],
    [' ', ' ', ' ', ' ', ' ', ' ', ' ', ' '],
    ['P', 'P', 'P', 'P', 'P', 'P', 'P', 'P'],
    ['R', 'N', 'B', 'Q', 'K', 'B', 'N', 'R'],
];

/// No side ever has more pieces than this.
pub const MAX_PIECES_PER_COLOR: usize = 16;

/// Represents a chess position that has *not* been validated for legality.
///
/// This structure is useful in the following cases:
/// * You are trying to build a chess board manually in code.
/// * The `Board` structure will try to keep the position fully legal, which will prevent you from
///   placing pieces arbitrarily.  This structure will not.
/// * You want to read the initial position from a piece-code layout.
///
/// ```
/// use chess_rules::{BoardBuilder, Board, Square, Color, Piece};
/// use std::convert::TryFrom;
/// let mut position = BoardBuilder::new();
/// position.piece(Square::make_square(0, 7), Piece::King, Color::White);
/// position.piece(Square::make_square(0, 0), Piece::Rook, Color::Black);
/// position.piece(Square::make_square(3, 7), Piece::King, Color::Black);
///
/// // You can index the position by the square:
/// assert_eq!(position[Square::make_square(0, 7)], Some((Piece::King, Color::White)));
///
/// // White is in check, but that's ok, it's white's turn to move.
/// assert!(Board::try_from(&position).is_ok());
///
/// // Now White is in check, but Black is ready to move.  This position is invalid.
/// position.side_to_move(Color::Black);
/// assert!(Board::try_from(position).is_err());
/// ```
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct BoardBuilder {
    pieces: [Option<(Piece, Color)>; NUM_SQUARES],
    moved: BitBoard,
    side_to_move: Color,
}

impl BoardBuilder {
    /// Construct a new, empty, BoardBuilder.
    ///
    /// * No pieces are on the board
    /// * Nothing has moved
    /// * `side_to_move` is Color::White
    pub fn new() -> BoardBuilder {
        BoardBuilder {
            pieces: [None; NUM_SQUARES],
            moved: EMPTY,
            side_to_move: Color::White,
        }
    }

    /// Set up a board with everything pre-loaded.
    ///
    /// ```
    /// use chess_rules::{BoardBuilder, Board, Square, Color, Piece};
    /// use std::convert::TryInto;
    ///
    /// # use chess_rules::Error;
    /// # fn main() -> Result<(), Error> {
    /// let board: Board = BoardBuilder::setup(
    ///         &[
    ///             (Square::make_square(0, 7), Piece::King, Color::White),
    ///             (Square::make_square(7, 0), Piece::King, Color::Black)
    ///         ],
    ///         Color::Black)
    ///     .try_into()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn setup<'a>(
        pieces: impl IntoIterator<Item = &'a (Square, Piece, Color)>,
        side_to_move: Color,
    ) -> BoardBuilder {
        let mut result = BoardBuilder::new();
        result.side_to_move = side_to_move;

        for piece in pieces.into_iter() {
            result.pieces[piece.0.to_index()] = Some((piece.1, piece.2));
        }

        result
    }

    /// Read a static 8x8 layout of piece codes, indexed `[y][x]`.
    ///
    /// `' '` and `'.'` are empty squares, `pnbrqk` are black pieces and `PNBRQK` are white ones.
    /// Anything else is an error.  Nothing has moved and white is to move.
    ///
    /// ```
    /// use chess_rules::{BoardBuilder, STANDARD_LAYOUT};
    ///
    /// let builder = BoardBuilder::from_layout(&STANDARD_LAYOUT).expect("valid layout");
    /// assert!(builder == BoardBuilder::default());
    /// ```
    pub fn from_layout(layout: &[[char; 8]; 8]) -> Result<BoardBuilder, Error> {
        let mut result = BoardBuilder::new();
        for (y, row) in layout.iter().enumerate() {
            for (x, code) in row.iter().enumerate() {
                let square = Square::make_square(x as u8, y as u8);
                result[square] = match *code {
                    ' ' | '.' => None,
                    c => Some(Piece::from_code(c).ok_or_else(|| Error::InvalidLayout {
                        layout: format!("unknown piece code {:?} on {}", c, square),
                    })?),
                };
            }
        }
        Ok(result)
    }

    /// Get the current player
    pub fn get_side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Set the side to move on the position
    ///
    /// This function can be used on self directly or in a builder pattern.
    ///
    /// ```
    /// use chess_rules::{BoardBuilder, Color};
    /// BoardBuilder::new()
    ///              .side_to_move(Color::Black);
    ///
    /// let mut bb = BoardBuilder::new();
    /// bb.side_to_move(Color::Black);
    /// ```
    pub fn side_to_move(&mut self, color: Color) -> &mut Self {
        self.side_to_move = color;
        self
    }

    /// Set a piece on a square.
    ///
    /// Note that this can and will overwrite another piece on the square if need.
    ///
    /// This function can be used on self directly or in a builder pattern.
    pub fn piece(&mut self, square: Square, piece: Piece, color: Color) -> &mut Self {
        self[square] = Some((piece, color));
        self
    }

    /// Clear a square on the board.
    pub fn clear_square(&mut self, square: Square) -> &mut Self {
        self[square] = None;
        self.moved &= !BitBoard::from_square(square);
        self
    }

    /// Mark the piece on a square as having moved.  Only kings and rooks remember this; it is
    /// what takes away their right to castle.
    pub fn moved(&mut self, square: Square) -> &mut Self {
        self.moved |= BitBoard::from_square(square);
        self
    }

    /// Has the piece on this square been marked as moved?
    pub fn has_moved(&self, square: Square) -> bool {
        self.moved.contains(square)
    }

    /// Build the board without checking anything.
    pub(crate) fn build_unchecked(&self) -> Board {
        let mut squares = [None; NUM_SQUARES];
        for square in ALL_SQUARES.iter() {
            if let Some((piece, color)) = self[*square] {
                let mut placed = BoardPiece::new(piece, color, *square);
                placed.set_moved(self.has_moved(*square));
                squares[square.to_index()] = Some(placed);
            }
        }
        Board::assemble(squares, self.side_to_move)
    }
}

impl Index<Square> for BoardBuilder {
    type Output = Option<(Piece, Color)>;

    fn index(&self, index: Square) -> &Self::Output {
        &self.pieces[index.to_index()]
    }
}

impl IndexMut<Square> for BoardBuilder {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.pieces[index.to_index()]
    }
}

/// Rows run from y = 0 to y = 7 separated by `/`, in the same run-length style as the piece
/// placement field of a FEN.  An optional second field `w` or `b` picks the side to move.
impl fmt::Display for BoardBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..8u8 {
            let mut count = 0;
            for x in 0..8u8 {
                match self[Square::make_square(x, y)] {
                    Some((piece, color)) => {
                        if count != 0 {
                            write!(f, "{}", count)?;
                            count = 0;
                        }
                        write!(f, "{}", piece.to_string(color))?;
                    }
                    None => count += 1,
                }
            }

            if count != 0 {
                write!(f, "{}", count)?;
            }

            if y != 7 {
                write!(f, "/")?;
            }
        }

        if self.side_to_move == Color::White {
            write!(f, " w")
        } else {
            write!(f, " b")
        }
    }
}

impl Default for BoardBuilder {
    /// The standard initial position.
    fn default() -> BoardBuilder {
        let mut result = BoardBuilder::new();
        for (y, row) in STANDARD_LAYOUT.iter().enumerate() {
            for (x, code) in row.iter().enumerate() {
                result[Square::make_square(x as u8, y as u8)] = Piece::from_code(*code);
            }
        }
        result
    }
}

impl FromStr for BoardBuilder {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidLayout {
            layout: value.to_string(),
        };

        let mut tokens = value.split_whitespace();
        let rows: Vec<&str> = tokens.next().ok_or_else(invalid)?.split('/').collect();
        if rows.len() != 8 {
            return Err(invalid());
        }

        let mut result = BoardBuilder::new();
        for (y, row) in rows.iter().enumerate() {
            let mut x = 0usize;
            for c in row.chars() {
                if let Some(run) = c.to_digit(10) {
                    if run == 0 || run > 8 {
                        return Err(invalid());
                    }
                    x += run as usize;
                } else {
                    if x >= 8 {
                        return Err(invalid());
                    }
                    let piece = Piece::from_code(c).ok_or_else(invalid)?;
                    result[Square::make_square(x as u8, y as u8)] = Some(piece);
                    x += 1;
                }
            }
            if x != 8 {
                return Err(invalid());
            }
        }

        match tokens.next() {
            None | Some("w") | Some("W") => result.side_to_move = Color::White,
            Some("b") | Some("B") => result.side_to_move = Color::Black,
            Some(_) => return Err(invalid()),
        }

        if tokens.next().is_some() {
            return Err(invalid());
        }

        Ok(result)
    }
}

impl From<&Board> for BoardBuilder {
    fn from(board: &Board) -> Self {
        let mut result = BoardBuilder::new();
        for piece in board.pieces() {
            result.piece(piece.square(), piece.piece(), piece.color());
            if piece.has_moved() {
                result.moved(piece.square());
            }
        }
        result.side_to_move(board.side_to_move());
        result
    }
}

impl From<Board> for BoardBuilder {
    fn from(board: Board) -> Self {
        (&board).into()
    }
}

impl TryFrom<&BoardBuilder> for Board {
    type Error = Error;

    /// Each side needs exactly one king and at most sixteen pieces, and the side that is not
    /// about to move may not be in check.
    fn try_from(builder: &BoardBuilder) -> Result<Self, Self::Error> {
        for color in ALL_COLORS.iter() {
            let mine = ALL_SQUARES
                .iter()
                .filter_map(|sq| builder[*sq])
                .filter(|(_, c)| c == color);
            let (kings, total) = mine.fold((0, 0), |(kings, total), (piece, _)| {
                (kings + (piece == Piece::King) as usize, total + 1)
            });
            if kings != 1 || total > MAX_PIECES_PER_COLOR {
                return Err(Error::InvalidBoard);
            }
        }

        let board = builder.build_unchecked();
        let waiting = !board.side_to_move();
        if is_attacked(&board, board.king_square(waiting), !waiting) {
            return Err(Error::InvalidBoard);
        }

        debug_assert!(board.is_sane());
        Ok(board)
    }
}

impl TryFrom<&mut BoardBuilder> for Board {
    type Error = Error;

    fn try_from(builder: &mut BoardBuilder) -> Result<Self, Self::Error> {
        Board::try_from(&*builder)
    }
}

impl TryFrom<BoardBuilder> for Board {
    type Error = Error;

    fn try_from(builder: BoardBuilder) -> Result<Self, Self::Error> {
        Board::try_from(&builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(x: u8, y: u8) -> Square {
        Square::make_square(x, y)
    }

    #[test]
    fn standard_layout_string() {
        let builder = BoardBuilder::default();
        assert_eq!(
            format!("{}", builder),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"
        );
        assert!(BoardBuilder::from_str("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap() == builder);
    }

    #[test]
    fn layouts_survive_a_trip_through_the_board() {
        let builder = BoardBuilder::from_str("r3k2r/8/8/3q4/8/8/8/R3K2R b").unwrap();
        let board = Board::try_from(&builder).unwrap();
        assert!(BoardBuilder::from(&board) == builder);
        assert_eq!(builder.get_side_to_move(), Color::Black);
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.piece_on(sq(3, 3)), Some(Piece::Queen));
    }

    #[test]
    fn invalid_layout_strings() {
        for layout in [
            "",
            "8/8/8/8/8/8/8",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNRR",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR",
            "rnbqkbnr/pppppppp/7/8/8/8/PPPPPPPP/RNBQKBNR",
            "rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w extra",
        ]
        .iter()
        {
            assert!(BoardBuilder::from_str(layout).is_err(), "{:?}", layout);
        }
    }

    #[test]
    fn unknown_codes_in_a_char_layout_are_rejected() {
        let mut layout = STANDARD_LAYOUT;
        layout[3][3] = 'x';
        assert!(BoardBuilder::from_layout(&layout).is_err());

        layout[3][3] = '.';
        assert!(BoardBuilder::from_layout(&layout).is_ok());
    }

    #[test]
    fn kings_are_required() {
        let mut builder = BoardBuilder::default();
        builder.clear_square(sq(4, 0));
        assert_eq!(Board::try_from(&builder), Err(Error::InvalidBoard));

        let mut builder = BoardBuilder::default();
        builder.piece(sq(4, 4), Piece::King, Color::White);
        assert_eq!(Board::try_from(&builder), Err(Error::InvalidBoard));
    }

    #[test]
    fn moved_flags_reach_the_board() {
        let mut builder = BoardBuilder::default();
        builder.moved(sq(0, 7)).moved(sq(3, 6));
        let board = Board::try_from(&builder).unwrap();
        assert!(board.piece_at(sq(0, 7)).unwrap().has_moved());
        // pawns have no move history
        assert!(!board.piece_at(sq(3, 6)).unwrap().has_moved());
    }
}
