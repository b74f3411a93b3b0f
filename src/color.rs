use std::ops::Not;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Represent a color.
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(PartialOrd, Ord, PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Color {
    White,
    Black,
}

/// How many colors are there?
pub const NUM_COLORS: usize = 2;
/// List all colors
pub const ALL_COLORS: [Color; NUM_COLORS] = [Color::White, Color::Black];

impl Color {
    /// Convert the `Color` to a `usize` for table lookups.
    #[inline]
    pub fn to_index(&self) -> usize {
        *self as usize
    }

    /// Which way is "forward" along the y axis?  White starts at the bottom (y = 7) and walks
    /// towards y = 0, black does the opposite.
    #[inline]
    pub fn forward(&self) -> i8 {
        match *self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The row my king and rooks start on.
    #[inline]
    pub fn to_my_backrank(&self) -> u8 {
        match *self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The row my pawns start on.  A pawn here may still make its double step.
    #[inline]
    pub fn to_pawn_row(&self) -> u8 {
        match *self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

impl Not for Color {
    type Output = Color;

    /// Get the other color.
    #[inline]
    fn not(self) -> Color {
        if self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }
}
