use crate::castling::CastleMove;
use crate::check::is_attacked;
use crate::chess_move::ChessMove;
use crate::color::{Color, ALL_COLORS, NUM_COLORS};
use crate::error::Error;
use crate::movegen::MoveGen;
use crate::piece::{BoardPiece, Piece};
use crate::square::{Square, ALL_SQUARES, NUM_SQUARES};
use std::fmt;
use std::ops::Deref;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A representation of a chess board.  That's why you're here, right?
///
/// The board owns every piece.  Each square holds at most one `BoardPiece`, each piece knows
/// the square it is indexed under, and the square of each side's king is cached so check
/// queries never have to search for it.
///
/// Positions are built with `BoardBuilder` (or `Board::default()` for the initial layout), which
/// guarantees exactly one king per color.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<BoardPiece>; NUM_SQUARES],
    kings: [Square; NUM_COLORS],
    side_to_move: Color,
}

/// What is the status of this game, from the point of view of the side to move?
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Debug, Hash)]
pub enum BoardStatus {
    Ongoing,
    Check,
    Stalemate,
    Checkmate,
}

/// Everything that happened when a move was applied.  The view needs this to redraw.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MoveRecord {
    pub chess_move: ChessMove,
    pub piece: Piece,
    pub color: Color,
    pub captured: Option<BoardPiece>,
    pub castle: Option<CastleMove>,
}

/// A move tried out on a board, undone when this guard goes out of scope.
///
/// While the guard lives the board is only reachable through it, read-only, so nothing can
/// observe or keep the intermediate position.  Dropping the guard moves the piece back and puts
/// any captured piece back on its square, on every exit path.
///
/// ```
/// use chess_rules::{Board, ChessMove, Square};
///
/// let mut board = Board::default();
/// let before = board;
/// {
///     let sim = board.simulate(ChessMove::new(Square::make_square(4, 6), Square::make_square(4, 4)));
///     assert!(sim.piece_on(Square::make_square(4, 6)).is_none());
/// }
/// assert!(board == before);
/// ```
pub struct Simulation<'a> {
    board: &'a mut Board,
    chess_move: ChessMove,
    captured: Option<BoardPiece>,
}

impl<'a> Deref for Simulation<'a> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl<'a> Simulation<'a> {
    /// The piece taken off the board by the simulated move, if any.
    pub fn captured(&self) -> Option<&BoardPiece> {
        self.captured.as_ref()
    }
}

impl<'a> Drop for Simulation<'a> {
    fn drop(&mut self) {
        self.board
            .move_piece(self.chess_move.get_dest(), self.chess_move.get_source());
        if let Some(captured) = self.captured.take() {
            let square = captured.square();
            self.board.place(captured, square);
        }
    }
}

impl Board {
    /// Assemble a board out of already-placed pieces.  The caller is responsible for there being
    /// exactly one king per color.
    pub(crate) fn assemble(squares: [Option<BoardPiece>; NUM_SQUARES], side_to_move: Color) -> Board {
        let mut kings = [Square::default(); NUM_COLORS];
        for piece in squares.iter().flatten() {
            if piece.piece() == Piece::King {
                kings[piece.color().to_index()] = piece.square();
            }
        }
        Board {
            squares,
            kings,
            side_to_move,
        }
    }

    /// What piece is on a particular `Square`?  Is there even one?
    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.squares[square.to_index()].map(|p| p.piece())
    }

    /// What color piece is on a particular square?
    #[inline]
    pub fn color_on(&self, square: Square) -> Option<Color> {
        self.squares[square.to_index()].map(|p| p.color())
    }

    /// Grab the whole piece (kind, color, square and move history) on a square.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&BoardPiece> {
        self.squares[square.to_index()].as_ref()
    }

    /// Iterate over every piece on the board.
    pub fn pieces(&self) -> impl Iterator<Item = &BoardPiece> + '_ {
        self.squares.iter().flatten()
    }

    /// Iterate over every piece of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &BoardPiece> + '_ {
        self.pieces().filter(move |p| p.color() == color)
    }

    /// Who's turn is it?
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Where is the king of this color?
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.to_index()]
    }

    /// Put a piece on an empty square.  The piece is re-addressed to that square.
    pub fn place(&mut self, mut piece: BoardPiece, square: Square) {
        debug_assert!(
            self.squares[square.to_index()].is_none(),
            "{} is already occupied",
            square
        );
        piece.set_square(square);
        if piece.piece() == Piece::King {
            self.kings[piece.color().to_index()] = square;
        }
        self.squares[square.to_index()] = Some(piece);
    }

    /// Take whatever is on a square off the board.  Kings never leave the board.
    pub fn remove(&mut self, square: Square) -> Option<BoardPiece> {
        debug_assert!(
            self.piece_on(square) != Some(Piece::King),
            "the king on {} can not be removed",
            square
        );
        self.squares[square.to_index()].take()
    }

    /// Move the piece on `source` to `dest`, keeping the king cache in sync.
    ///
    /// This does not capture.  If `dest` is occupied, `remove` it first.  The piece's move
    /// history is left alone, so this is safe to use for simulations.
    pub fn move_piece(&mut self, source: Square, dest: Square) {
        debug_assert!(
            self.squares[dest.to_index()].is_none(),
            "{} is already occupied",
            dest
        );
        if let Some(mut piece) = self.squares[source.to_index()].take() {
            piece.set_square(dest);
            if piece.piece() == Piece::King {
                self.kings[piece.color().to_index()] = dest;
            }
            self.squares[dest.to_index()] = Some(piece);
        } else {
            debug_assert!(false, "there is no piece on {} to move", source);
        }
    }

    /// Take a copy of the whole position.
    #[inline]
    pub fn snapshot(&self) -> Board {
        *self
    }

    /// Go back to a copy taken with `snapshot`.
    #[inline]
    pub fn restore(&mut self, snapshot: Board) {
        *self = snapshot;
    }

    /// Try a move out.  The move is undone when the returned guard is dropped.
    ///
    /// Anything on the destination square is captured for the duration of the simulation.
    /// Move history and the side to move are not touched.
    pub fn simulate(&mut self, chess_move: ChessMove) -> Simulation<'_> {
        debug_assert!(
            chess_move.get_source() != chess_move.get_dest(),
            "{} does not go anywhere",
            chess_move
        );
        let captured = self.remove(chess_move.get_dest());
        self.move_piece(chess_move.get_source(), chess_move.get_dest());
        Simulation {
            board: self,
            chess_move,
            captured,
        }
    }

    /// Make a chess move for real.
    ///
    /// The caller must have checked the move against the legal destinations.  When `castle` is
    /// given, its rook is moved first, then the king.  Kings and rooks are marked as moved, the
    /// captured piece (if any) leaves the board and the turn passes to the other side.
    pub fn make_move(
        &mut self,
        chess_move: ChessMove,
        castle: Option<CastleMove>,
    ) -> Result<MoveRecord, Error> {
        let source = chess_move.get_source();
        let dest = chess_move.get_dest();
        let (piece, color) = match self.piece_at(source) {
            Some(p) => (p.piece(), p.color()),
            None => return Err(Error::IllegalSelection { square: source }),
        };

        if let Some(castle) = castle {
            debug_assert_eq!(castle.king, chess_move);
            let rook_move = castle.rook;
            self.move_piece(rook_move.get_source(), rook_move.get_dest());
            self.mark_moved(rook_move.get_dest());
        }

        let captured = self.remove(dest);
        self.move_piece(source, dest);
        self.mark_moved(dest);
        self.side_to_move = !self.side_to_move;

        debug_assert!(self.is_sane(), "board lost its invariants:\n{}", self);

        Ok(MoveRecord {
            chess_move,
            piece,
            color,
            captured,
            castle,
        })
    }

    fn mark_moved(&mut self, square: Square) {
        if let Some(piece) = self.squares[square.to_index()].as_mut() {
            piece.set_moved(true);
        }
    }

    /// Is the king of the side to move attacked?
    pub fn in_check(&self) -> bool {
        let color = self.side_to_move;
        is_attacked(self, self.king_square(color), !color)
    }

    /// What is the status of this game?
    ///
    /// ```
    /// use chess_rules::{Board, BoardStatus};
    ///
    /// let board = Board::default();
    /// assert_eq!(board.status(), BoardStatus::Ongoing);
    /// ```
    pub fn status(&self) -> BoardStatus {
        self.status_with(true)
    }

    /// The status under a chosen castling rule.  See `castle_moves` for what `path_safety` does.
    pub fn status_with(&self, path_safety: bool) -> BoardStatus {
        let in_check = self.in_check();
        let has_moves = MoveGen::new_legal_with(self, path_safety).len() > 0;
        match (in_check, has_moves) {
            (false, true) => BoardStatus::Ongoing,
            (true, true) => BoardStatus::Check,
            (false, false) => BoardStatus::Stalemate,
            (true, false) => BoardStatus::Checkmate,
        }
    }

    /// Is this move legal for the side to move?
    pub fn legal(&self, chess_move: ChessMove) -> bool {
        MoveGen::new_legal(self).any(|m| m == chess_move)
    }

    /// Does this board "make sense"?
    /// Is every piece indexed under its own square, is there exactly one king per color, and
    /// does the king cache point at them?
    /// This is for sanity checking.
    pub fn is_sane(&self) -> bool {
        for square in ALL_SQUARES.iter() {
            if let Some(piece) = self.piece_at(*square) {
                if piece.square() != *square {
                    return false;
                }
                if !piece.piece().tracks_moves() && piece.has_moved() {
                    return false;
                }
            }
        }

        for color in ALL_COLORS.iter() {
            let kings = self
                .pieces_of(*color)
                .filter(|p| p.piece() == Piece::King)
                .count();
            if kings != 1 {
                return false;
            }
            let ksq = self.king_square(*color);
            if self.piece_on(ksq) != Some(Piece::King) || self.color_on(ksq) != Some(*color) {
                return false;
            }
        }

        true
    }
}

impl Default for Board {
    /// The standard initial position, white to move.
    #[inline]
    fn default() -> Board {
        crate::board_builder::BoardBuilder::default().build_unchecked()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s: String = "".to_owned();
        for y in 0..8u8 {
            s.push_str(&y.to_string());
            s.push(' ');
            for x in 0..8u8 {
                let sq = Square::make_square(x, y);
                match self.piece_at(sq) {
                    None => s.push_str(" . "),
                    Some(piece) => {
                        s.push(' ');
                        s.push_str(&piece.piece().to_string(piece.color()));
                        s.push(' ');
                    }
                }
            }
            s.push('\n');
        }
        s.push_str("   0  1  2  3  4  5  6  7\n");
        s.push_str(if self.side_to_move() == Color::White {
            "Whites Turn\n"
        } else {
            "Blacks Turn\n"
        });
        write!(f, "{}", s)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", crate::board_builder::BoardBuilder::from(self))
    }
}
