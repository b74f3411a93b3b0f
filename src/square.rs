use crate::error::Error;
use std::convert::TryFrom;
use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Represent a square on the chess board
///
/// A square is an `(x, y)` pair with both coordinates in `0..8`.  `(0, 0)` is the corner where
/// black's queenside rook starts; `x` grows towards the kingside and `y` grows towards white's
/// side of the board.  There is no way to build a `Square` outside of the board.
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Ord, Eq, PartialOrd, Copy, Clone, Default, Hash)]
pub struct Square(u8);

/// How many squares are there?
pub const NUM_SQUARES: usize = 64;

impl Square {
    /// Make a square given an x and a y coordinate.
    ///
    /// Panics if either coordinate is 8 or more.  Use `Square::new` for untrusted input.
    #[inline]
    pub fn make_square(x: u8, y: u8) -> Square {
        assert!(x < 8 && y < 8, "({}, {}) is not on the board", x, y);
        Square((y << 3) | x)
    }

    /// Make a square from raw coordinates, if they are on the board.
    ///
    /// ```
    /// use chess_rules::Square;
    ///
    /// assert_eq!(Square::new(4, 6), Some(Square::make_square(4, 6)));
    /// assert_eq!(Square::new(-1, 6), None);
    /// assert_eq!(Square::new(4, 8), None);
    /// ```
    #[inline]
    pub fn new(x: i32, y: i32) -> Option<Square> {
        if (0..8).contains(&x) && (0..8).contains(&y) {
            Some(Square(((y as u8) << 3) | x as u8))
        } else {
            None
        }
    }

    /// Return the x coordinate (the column).
    #[inline]
    pub fn get_x(&self) -> u8 {
        self.0 & 7
    }

    /// Return the y coordinate (the row).
    #[inline]
    pub fn get_y(&self) -> u8 {
        self.0 >> 3
    }

    /// Step by `(dx, dy)`.  If that walks off the board, return `None`.
    ///
    /// ```
    /// use chess_rules::Square;
    ///
    /// let sq = Square::make_square(0, 7);
    /// assert_eq!(sq.offset(1, -2), Some(Square::make_square(1, 5)));
    /// assert_eq!(sq.offset(-1, 0), None);
    /// ```
    #[inline]
    pub fn offset(&self, dx: i8, dy: i8) -> Option<Square> {
        Square::new(
            self.get_x() as i32 + dx as i32,
            self.get_y() as i32 + dy as i32,
        )
    }

    /// Convert this `Square` to a `usize` for table lookup purposes
    #[inline]
    pub fn to_index(&self) -> usize {
        self.0 as usize
    }

    /// Convert an index back into a `Square`.  Indices wrap around the board.
    #[inline]
    pub fn from_index(i: usize) -> Square {
        Square((i & 63) as u8)
    }
}

impl TryFrom<(i32, i32)> for Square {
    type Error = Error;

    fn try_from((x, y): (i32, i32)) -> Result<Self, Self::Error> {
        Square::new(x, y).ok_or(Error::OutOfBounds { x, y })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.get_x(), self.get_y())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Square({},{})", self.get_x(), self.get_y())
    }
}

/// A list of every square on the chessboard.
pub const ALL_SQUARES: [Square; NUM_SQUARES] = {
    let mut result = [Square(0); NUM_SQUARES];
    let mut i = 0;
    while i < NUM_SQUARES {
        result[i] = Square(i as u8);
        i += 1;
    }
    result
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_survive_packing() {
        for x in 0..8u8 {
            for y in 0..8u8 {
                let sq = Square::make_square(x, y);
                assert_eq!((sq.get_x(), sq.get_y()), (x, y));
                assert_eq!(ALL_SQUARES[sq.to_index()], sq);
            }
        }
    }

    #[test]
    fn out_of_bounds_clicks_are_rejected() {
        assert_eq!(
            Square::try_from((8, 0)),
            Err(Error::OutOfBounds { x: 8, y: 0 })
        );
        assert_eq!(
            Square::try_from((3, -1)),
            Err(Error::OutOfBounds { x: 3, y: -1 })
        );
        assert_eq!(Square::try_from((7, 7)), Ok(Square::make_square(7, 7)));
    }

    #[test]
    fn offsets_stop_at_every_edge() {
        let corner = Square::make_square(7, 0);
        assert_eq!(corner.offset(1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
        assert_eq!(corner.offset(-7, 7), Some(Square::make_square(0, 7)));
    }
}
