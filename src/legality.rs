use crate::bitboard::{BitBoard, EMPTY};
use crate::board::Board;
use crate::check::is_attacked;
use crate::chess_move::ChessMove;
use crate::movegen::get_pseudo_legal_moves;
use crate::square::Square;

/// Does playing `chess_move` leave the mover's own king attacked?
///
/// The move is simulated on `board` and undone before returning.  When the king itself moves,
/// the square it lands on is the one tested.
pub fn leaves_king_attacked(board: &mut Board, chess_move: ChessMove) -> bool {
    let color = match board.color_on(chess_move.get_source()) {
        Some(c) => c,
        None => return false,
    };
    let sim = board.simulate(chess_move);
    is_attacked(&sim, sim.king_square(color), !color)
}

/// Filter the pseudo-legal moves of the piece on `src` down to the ones that do not leave its
/// own king attacked.  Castles are not included.
///
/// `board` is used as scratch space.  It is exactly as it was when this returns.
///
/// ```
/// use chess_rules::{legal_moves, Board, Square};
///
/// let mut board = Board::default();
/// let moves = legal_moves(&mut board, Square::make_square(4, 6));
/// assert_eq!(moves.popcnt(), 2);
/// ```
pub fn legal_moves(board: &mut Board, src: Square) -> BitBoard {
    let mut result = EMPTY;
    for dest in get_pseudo_legal_moves(board, src) {
        if !leaves_king_attacked(board, ChessMove::new(src, dest)) {
            result |= BitBoard::from_square(dest);
        }
    }
    result
}
