use crate::board::Board;
use crate::color::Color;
use crate::movegen::get_attacks;
use crate::square::Square;

/// Is `square` attacked by any piece of color `by`?
///
/// Each attacker contributes its normal pseudo-legal moves, except pawns, which contribute
/// their diagonals.  A piece standing on `square` itself is skipped, so a king never attacks
/// its own square.  Castling never attacks anything and is not consulted.
///
/// ```
/// use chess_rules::{is_attacked, Board, Color, Square};
///
/// let board = Board::default();
/// // the pawns on row 6 cover all of row 5
/// assert!(is_attacked(&board, Square::make_square(3, 5), Color::White));
/// assert!(!is_attacked(&board, Square::make_square(3, 4), Color::White));
/// ```
pub fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    board
        .pieces_of(by)
        .filter(|p| p.square() != square)
        .any(|p| get_attacks(board, p.square()).contains(square))
}

/// Every piece of color `by` that attacks `square`.
pub fn attackers(board: &Board, square: Square, by: Color) -> Vec<Square> {
    board
        .pieces_of(by)
        .filter(|p| p.square() != square)
        .filter(|p| get_attacks(board, p.square()).contains(square))
        .map(|p| p.square())
        .collect()
}
