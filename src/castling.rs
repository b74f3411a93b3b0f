use crate::board::Board;
use crate::check::is_attacked;
use crate::chess_move::ChessMove;
use crate::legality::leaves_king_attacked;
use crate::piece::Piece;
use crate::square::Square;
use arrayvec::ArrayVec;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Which rook does the king castle with?
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Debug, Hash)]
pub enum CastleSide {
    /// With the rook on x = 0.
    QueenSide,
    /// With the rook on x = 7.
    KingSide,
}

/// How many sides can a king castle to?
pub const NUM_CASTLE_SIDES: usize = 2;

/// Enumerate both castle sides.
pub const ALL_CASTLE_SIDES: [CastleSide; NUM_CASTLE_SIDES] =
    [CastleSide::QueenSide, CastleSide::KingSide];

impl CastleSide {
    /// Where the rook starts.
    #[inline]
    pub fn rook_x(&self) -> u8 {
        match *self {
            CastleSide::QueenSide => 0,
            CastleSide::KingSide => 7,
        }
    }

    /// Where the king lands, two steps towards the rook.
    #[inline]
    pub fn king_dest_x(&self) -> u8 {
        match *self {
            CastleSide::QueenSide => 2,
            CastleSide::KingSide => 6,
        }
    }

    /// Where the rook lands, on the square the king jumped over.
    #[inline]
    pub fn rook_dest_x(&self) -> u8 {
        match *self {
            CastleSide::QueenSide => 3,
            CastleSide::KingSide => 5,
        }
    }
}

/// A castle, as the king's move plus the rook move that goes with it.
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct CastleMove {
    pub side: CastleSide,
    pub king: ChessMove,
    pub rook: ChessMove,
}

/// Which castles can the king on `king_sq` make right now?
///
/// A side is available when:
///  * the king has never moved,
///  * a rook of the same color that has never moved stands on that side's corner of the
///    king's row,
///  * every square strictly between the king and that rook is empty,
///  * the king does not end up attacked.
///
/// With `path_safety` set, the king also may not castle out of check or pass over an attacked
/// square.  Without it, only the destination is checked.
///
/// `board` is used as scratch space.  It is exactly as it was when this returns.
///
/// ```
/// use chess_rules::{castle_moves, Board, BoardBuilder, CastleSide, Square};
/// use std::convert::TryFrom;
/// use std::str::FromStr;
///
/// let builder = BoardBuilder::from_str("r3k2r/8/8/8/8/8/8/R3K2R w").unwrap();
/// let mut board = Board::try_from(builder).unwrap();
/// let castles = castle_moves(&mut board, Square::make_square(4, 7), true);
/// assert_eq!(castles.len(), 2);
/// assert_eq!(castles[0].side, CastleSide::QueenSide);
/// ```
pub fn castle_moves(
    board: &mut Board,
    king_sq: Square,
    path_safety: bool,
) -> ArrayVec<CastleMove, NUM_CASTLE_SIDES> {
    let mut result = ArrayVec::new();

    let color = match board.piece_at(king_sq) {
        Some(p) if p.piece() == Piece::King && !p.has_moved() => p.color(),
        _ => return result,
    };

    if path_safety && is_attacked(board, king_sq, !color) {
        return result;
    }

    let y = king_sq.get_y();
    let king_x = king_sq.get_x();

    for side in ALL_CASTLE_SIDES.iter() {
        let rook_sq = Square::make_square(side.rook_x(), y);
        match board.piece_at(rook_sq) {
            Some(r) if r.piece() == Piece::Rook && r.color() == color && !r.has_moved() => {}
            _ => continue,
        }

        let (low, high) = if king_x < side.rook_x() {
            (king_x, side.rook_x())
        } else {
            (side.rook_x(), king_x)
        };
        if ((low + 1)..high).any(|x| board.piece_on(Square::make_square(x, y)).is_some()) {
            continue;
        }

        let dest_x = side.king_dest_x();
        if dest_x == king_x || dest_x <= low || dest_x >= high {
            continue;
        }
        let dest = Square::make_square(dest_x, y);

        let safe = if path_safety {
            let step: i8 = if dest_x > king_x { 1 } else { -1 };
            let mut x = king_x;
            let mut safe = true;
            while x != dest_x && safe {
                x = (x as i8 + step) as u8;
                let through = Square::make_square(x, y);
                safe = !leaves_king_attacked(board, ChessMove::new(king_sq, through));
            }
            safe
        } else {
            !leaves_king_attacked(board, ChessMove::new(king_sq, dest))
        };

        if safe {
            result.push(CastleMove {
                side: *side,
                king: ChessMove::new(king_sq, dest),
                rook: ChessMove::new(rook_sq, Square::make_square(side.rook_dest_x(), y)),
            });
        }
    }

    result
}
