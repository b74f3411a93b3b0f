use crate::square::*;
use std::fmt;
use std::iter::FromIterator;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A good old-fashioned bitboard: one bit per square, indexed by `Square::to_index`.
///
/// This is the set type for everything square-shaped in the engine: generated destinations,
/// candidate moves and the squares handed to the view for highlighting.
///
/// ```
/// use chess_rules::{BitBoard, Square};
///
/// let bb = BitBoard(7); // (0,0), (1,0) and (2,0)
///
/// let mut count = 0;
///
/// // Iterate over each square in the bitboard
/// for _ in bb {
///     count += 1;
/// }
///
/// assert_eq!(count, 3);
/// assert!(bb.contains(Square::make_square(2, 0)));
/// ```
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Eq, PartialOrd, Clone, Copy, Debug, Default, Hash)]
pub struct BitBoard(pub u64);

/// An empty bitboard.  It is sometimes useful to use !EMPTY to get the universe of squares.
///
/// ```
///     use chess_rules::EMPTY;
///
///     assert_eq!(EMPTY.popcnt(), 0);
///
///     assert_eq!((!EMPTY).popcnt(), 64);
/// ```
pub const EMPTY: BitBoard = BitBoard(0);

impl BitAnd for BitBoard {
    type Output = BitBoard;

    fn bitand(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 & other.0)
    }
}

impl BitAndAssign for BitBoard {
    fn bitand_assign(&mut self, other: BitBoard) {
        self.0 &= other.0;
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 | other.0)
    }
}

impl BitOrAssign for BitBoard {
    fn bitor_assign(&mut self, other: BitBoard) {
        self.0 |= other.0;
    }
}

impl BitXor for BitBoard {
    type Output = BitBoard;

    fn bitxor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 ^ other.0)
    }
}

impl BitXorAssign for BitBoard {
    fn bitxor_assign(&mut self, other: BitBoard) {
        self.0 ^= other.0;
    }
}

impl Not for BitBoard {
    type Output = BitBoard;

    fn not(self) -> BitBoard {
        BitBoard(!self.0)
    }
}

impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s: String = "".to_owned();
        for x in 0..64 {
            if self.0 & (1u64 << x) == (1u64 << x) {
                s.push_str("X ");
            } else {
                s.push_str(". ");
            }
            if x % 8 == 7 {
                s.push('\n');
            }
        }
        write!(f, "{}", s)
    }
}

impl BitBoard {
    /// Construct a new bitboard from a u64
    #[inline]
    pub fn new(b: u64) -> BitBoard {
        BitBoard(b)
    }

    /// Construct a new `BitBoard` with a particular `Square` set
    #[inline]
    pub fn from_square(sq: Square) -> BitBoard {
        BitBoard(1u64 << sq.to_index())
    }

    /// Is this `Square` in the set?
    #[inline]
    pub fn contains(&self, sq: Square) -> bool {
        *self & BitBoard::from_square(sq) != EMPTY
    }

    /// Convert a `BitBoard` to a `Square`.  This grabs the least-significant `Square`
    #[inline]
    pub fn to_square(&self) -> Square {
        Square::from_index(self.0.trailing_zeros() as usize)
    }

    /// Count the number of `Squares` set in this `BitBoard`
    #[inline]
    pub fn popcnt(&self) -> u32 {
        self.0.count_ones()
    }

    /// Collect the squares into a list, lowest index first.  This is the shape the view
    /// callbacks receive.
    pub fn to_squares(&self) -> Vec<Square> {
        (*self).collect()
    }
}

/// For the `BitBoard`, iterate over every `Square` set.
impl Iterator for BitBoard {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            let result = self.to_square();
            *self ^= BitBoard::from_square(result);
            Some(result)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.popcnt() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitBoard {}

impl FromIterator<Square> for BitBoard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> BitBoard {
        iter.into_iter()
            .fold(EMPTY, |bb, sq| bb | BitBoard::from_square(sq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_squares_sets_their_bits() {
        let squares = vec![Square::make_square(0, 0), Square::make_square(7, 7)];
        let bb: BitBoard = squares.iter().cloned().collect();
        assert_eq!(bb, BitBoard(1 | (1 << 63)));
        assert_eq!(bb.len(), 2);
        assert_eq!(bb.to_squares(), squares);
    }

    #[test]
    fn display_draws_the_grid_row_by_row() {
        let bb = BitBoard::from_square(Square::make_square(1, 0));
        let first = format!("{}", bb).lines().next().unwrap().to_owned();
        assert_eq!(first, ". X . . . . . . ");
    }
}
