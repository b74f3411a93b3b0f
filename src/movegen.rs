use crate::bitboard::{BitBoard, EMPTY};
use crate::board::Board;
use crate::castling::castle_moves;
use crate::chess_move::ChessMove;
use crate::color::Color;
use crate::legality::legal_moves;
use crate::piece::Piece;
use crate::square::Square;
use arrayvec::ArrayVec;

/// One step along a file or a row.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// One step along a diagonal.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Rook and bishop directions together.
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Every (±1, ±2) and (±2, ±1) jump.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// A king steps one square in any queen direction.
pub const KING_OFFSETS: [(i8, i8); 8] = QUEEN_DIRECTIONS;

/// Sixteen pieces of one color never have more moves than this, even if every one of them were
/// a queen in the middle of an empty board.
pub const MAX_MOVES: usize = 512;

/// Walk outward along each direction.  Stop before a friendly piece, stop on (and include) an
/// enemy piece, stop at the edge.
fn slide(board: &Board, src: Square, color: Color, directions: &[(i8, i8)]) -> BitBoard {
    let mut result = EMPTY;
    for &(dx, dy) in directions {
        let mut current = src.offset(dx, dy);
        while let Some(sq) = current {
            match board.color_on(sq) {
                None => result |= BitBoard::from_square(sq),
                Some(c) if c != color => {
                    result |= BitBoard::from_square(sq);
                    break;
                }
                Some(_) => break,
            }
            current = sq.offset(dx, dy);
        }
    }
    result
}

/// Jump to each offset that is on the board and not occupied by a friendly piece.
fn leap(board: &Board, src: Square, color: Color, offsets: &[(i8, i8)]) -> BitBoard {
    offsets
        .iter()
        .filter_map(|&(dx, dy)| src.offset(dx, dy))
        .filter(|sq| board.color_on(*sq) != Some(color))
        .collect()
}

/// The two diagonal squares in front of a pawn, whether or not anything stands there.
///
/// ```
/// use chess_rules::{get_pawn_attacks, Color, Square};
///
/// let attacks = get_pawn_attacks(Square::make_square(0, 6), Color::White);
/// assert_eq!(attacks.to_squares(), vec![Square::make_square(1, 5)]);
/// ```
pub fn get_pawn_attacks(src: Square, color: Color) -> BitBoard {
    let dy = color.forward();
    [src.offset(-1, dy), src.offset(1, dy)]
        .iter()
        .flatten()
        .cloned()
        .collect()
}

/// Pawn pushes and captures.  One step forward onto an empty square, two from the starting row
/// when both squares are empty, and diagonal steps only onto enemy pieces.
fn pawn_moves(board: &Board, src: Square, color: Color) -> BitBoard {
    let dy = color.forward();
    let mut result = EMPTY;

    if let Some(one) = src.offset(0, dy) {
        if board.piece_on(one).is_none() {
            result |= BitBoard::from_square(one);
            if src.get_y() == color.to_pawn_row() {
                if let Some(two) = src.offset(0, 2 * dy) {
                    if board.piece_on(two).is_none() {
                        result |= BitBoard::from_square(two);
                    }
                }
            }
        }
    }

    for target in get_pawn_attacks(src, color) {
        if board.color_on(target) == Some(!color) {
            result |= BitBoard::from_square(target);
        }
    }

    result
}

/// Generate the pseudo-legal moves (moves that *may* leave you in check) for the piece on `src`.
///
/// Castling is not included; see `castling::castle_moves`.  An empty square has no moves.
///
/// ```
/// use chess_rules::{get_pseudo_legal_moves, Board, Square};
///
/// let board = Board::default();
/// // the queenside knight can go to (0,5) or (2,5)
/// assert_eq!(get_pseudo_legal_moves(&board, Square::make_square(1, 7)).popcnt(), 2);
/// ```
pub fn get_pseudo_legal_moves(board: &Board, src: Square) -> BitBoard {
    let (piece, color) = match board.piece_at(src) {
        Some(p) => (p.piece(), p.color()),
        None => return EMPTY,
    };
    match piece {
        Piece::Pawn => pawn_moves(board, src, color),
        Piece::Knight => leap(board, src, color, &KNIGHT_OFFSETS),
        Piece::Bishop => slide(board, src, color, &BISHOP_DIRECTIONS),
        Piece::Rook => slide(board, src, color, &ROOK_DIRECTIONS),
        Piece::Queen => slide(board, src, color, &QUEEN_DIRECTIONS),
        Piece::King => leap(board, src, color, &KING_OFFSETS),
    }
}

/// Which squares does the piece on `src` threaten?  This is its pseudo-legal move set, except
/// for pawns, which threaten their diagonals even when nothing stands there.
pub fn get_attacks(board: &Board, src: Square) -> BitBoard {
    match board.piece_at(src) {
        Some(p) if p.piece() == Piece::Pawn => get_pawn_attacks(src, p.color()),
        Some(_) => get_pseudo_legal_moves(board, src),
        None => EMPTY,
    }
}

/// The move generation iterator
///
/// Enumerates every move of the side to move up front, then hands them out one at a time.
/// `len()` is exact and does not consume the iterator.
///
/// ```
/// use chess_rules::{Board, MoveGen};
///
/// let board = Board::default();
/// let iterable = MoveGen::new_legal(&board);
/// assert_eq!(iterable.len(), 20);
/// ```
pub struct MoveGen {
    moves: arrayvec::IntoIter<ChessMove, MAX_MOVES>,
}

impl MoveGen {
    /// Every legal move for the side to move, castles included.
    pub fn new_legal(board: &Board) -> MoveGen {
        MoveGen::new_legal_with(board, true)
    }

    /// Every legal move for the side to move, with castles checked under the given rule.
    ///
    /// ```
    /// use chess_rules::{Board, BoardBuilder, MoveGen};
    /// use std::convert::TryFrom;
    /// use std::str::FromStr;
    ///
    /// // the rook on (4,0) gives check, so castling is only allowed when the path is not checked
    /// let builder = BoardBuilder::from_str("4r3/3r1r2/6k1/8/8/8/8/4K2R w").unwrap();
    /// let board = Board::try_from(builder).unwrap();
    /// assert_eq!(MoveGen::new_legal_with(&board, true).len(), 0);
    /// assert_eq!(MoveGen::new_legal_with(&board, false).len(), 1);
    /// ```
    pub fn new_legal_with(board: &Board, path_safety: bool) -> MoveGen {
        let mut scratch = board.snapshot();
        let color = board.side_to_move();
        let mut moves: ArrayVec<ChessMove, MAX_MOVES> = ArrayVec::new();

        let sources: ArrayVec<Square, 64> = board.pieces_of(color).map(|p| p.square()).collect();

        for src in sources {
            for dest in legal_moves(&mut scratch, src) {
                moves.push(ChessMove::new(src, dest));
            }
            if scratch.piece_on(src) == Some(Piece::King) {
                for castle in castle_moves(&mut scratch, src, path_safety) {
                    moves.push(castle.king);
                }
            }
        }

        debug_assert!(scratch == *board);

        MoveGen {
            moves: moves.into_iter(),
        }
    }

    /// Every pseudo-legal move for the side to move.  No castles, no check filtering.
    pub fn new_pseudo_legal(board: &Board) -> MoveGen {
        let color = board.side_to_move();
        let mut moves: ArrayVec<ChessMove, MAX_MOVES> = ArrayVec::new();

        for piece in board.pieces_of(color) {
            let src = piece.square();
            for dest in get_pseudo_legal_moves(board, src) {
                moves.push(ChessMove::new(src, dest));
            }
        }

        MoveGen {
            moves: moves.into_iter(),
        }
    }

    /// Count the leaves of the legal move tree `depth` plies deep.
    pub fn movegen_perft_test(board: &Board, depth: usize) -> usize {
        if depth == 0 {
            return 1;
        }
        let moves = MoveGen::new_legal(board);
        if depth == 1 {
            return moves.len();
        }

        let mut result = 0;
        for m in moves {
            let mut next = board.snapshot();
            let castle = castle_moves(&mut next, m.get_source(), true)
                .into_iter()
                .find(|c| c.king == m);
            if next.make_move(m, castle).is_ok() {
                result += MoveGen::movegen_perft_test(&next, depth - 1);
            }
        }
        result
    }
}

impl Iterator for MoveGen {
    type Item = ChessMove;

    fn next(&mut self) -> Option<ChessMove> {
        self.moves.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.moves.size_hint()
    }
}

impl ExactSizeIterator for MoveGen {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_builder::BoardBuilder;
    use std::convert::TryFrom;
    use std::str::FromStr;

    fn sq(x: u8, y: u8) -> Square {
        Square::make_square(x, y)
    }

    fn board(layout: &str) -> Board {
        Board::try_from(BoardBuilder::from_str(layout).expect("valid layout")).expect("valid board")
    }

    #[test]
    fn opening_has_twenty_pseudo_legal_moves() {
        let board = Board::default();
        let moves = MoveGen::new_pseudo_legal(&board);
        assert_eq!(moves.len(), 20);

        let pawn_moves = MoveGen::new_pseudo_legal(&board)
            .filter(|m| board.piece_on(m.get_source()) == Some(Piece::Pawn))
            .count();
        assert_eq!(pawn_moves, 16);
    }

    #[test]
    fn legality_keeps_all_opening_moves() {
        let board = Board::default();
        let mut pseudo: Vec<ChessMove> = MoveGen::new_pseudo_legal(&board).collect();
        let mut legal: Vec<ChessMove> = MoveGen::new_legal(&board).collect();
        pseudo.sort();
        legal.sort();
        assert_eq!(pseudo, legal);
    }

    #[test]
    fn lone_rook_covers_its_row_and_column() {
        let mut builder = BoardBuilder::new();
        builder.piece(sq(0, 0), Piece::Rook, Color::White);
        // the kings are needed for a valid board, keep them off row 0 and column 0
        builder.piece(sq(7, 7), Piece::King, Color::White);
        builder.piece(sq(5, 5), Piece::King, Color::Black);
        let board = Board::try_from(&builder).expect("valid board");

        let moves = get_pseudo_legal_moves(&board, sq(0, 0));
        assert_eq!(moves.popcnt(), 14);
        for target in moves {
            assert!(target.get_x() == 0 || target.get_y() == 0);
        }
    }

    #[test]
    fn sliders_stop_at_friends_and_take_enemies() {
        let board = board("4k3/8/8/8/1p1Q2P1/8/8/4K3 w");
        let moves = get_pseudo_legal_moves(&board, sq(3, 4));
        assert!(moves.contains(sq(1, 4)));
        assert!(!moves.contains(sq(0, 4)));
        assert!(moves.contains(sq(5, 4)));
        assert!(!moves.contains(sq(6, 4)));
        assert!(moves.contains(sq(3, 0)));
        assert!(moves.contains(sq(7, 0)));
    }

    #[test]
    fn pawns_push_from_home_and_capture_diagonally() {
        let board = board("4k3/8/8/8/8/2p5/1P6/4K3 w");
        let moves = get_pseudo_legal_moves(&board, sq(1, 6));
        assert_eq!(moves.popcnt(), 3);
        assert!(moves.contains(sq(1, 5)));
        assert!(moves.contains(sq(1, 4)));
        assert!(moves.contains(sq(2, 5)));

        let blocked = self::board("4k3/8/8/8/8/1n6/1P6/4K3 w");
        assert_eq!(get_pseudo_legal_moves(&blocked, sq(1, 6)), EMPTY);
    }

    #[test]
    fn double_step_needs_both_squares_empty() {
        let board = board("4k3/8/8/8/1n6/8/1P6/4K3 w");
        let moves = get_pseudo_legal_moves(&board, sq(1, 6));
        assert_eq!(moves.to_squares(), vec![sq(1, 5)]);
    }

    #[test]
    fn black_pawns_walk_down() {
        let board = board("4k3/3p4/8/8/8/8/8/4K3 b");
        let moves = get_pseudo_legal_moves(&board, sq(3, 1));
        assert_eq!(moves.to_squares(), vec![sq(3, 2), sq(3, 3)]);
        assert_eq!(get_attacks(&board, sq(3, 1)).to_squares(), vec![sq(2, 2), sq(4, 2)]);
    }

    #[test]
    fn knights_in_the_corner() {
        let board = board("4k3/8/8/8/8/8/8/N3K3 w");
        let moves = get_pseudo_legal_moves(&board, sq(0, 7));
        assert_eq!(moves.popcnt(), 2);
        assert!(moves.contains(sq(1, 5)));
        assert!(moves.contains(sq(2, 6)));
    }

    #[test]
    fn perft_initial_position() {
        let board = Board::default();
        assert_eq!(MoveGen::movegen_perft_test(&board, 1), 20);
        assert_eq!(MoveGen::movegen_perft_test(&board, 2), 400);
        assert_eq!(MoveGen::movegen_perft_test(&board, 3), 8902);
    }

    #[test]
    fn perft_castling_position() {
        let board = board("r3k2r/8/8/8/8/8/8/R3K2R w");
        assert_eq!(MoveGen::movegen_perft_test(&board, 1), 26);
    }
}
