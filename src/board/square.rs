/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

use super::BOARD_SIZE;

/// Represents a single square on an `8x8` chess board, as a `(row, column)` pair.
///
/// Rows are counted from Black's side of the board, so row `0` is the eighth rank and row `7` is the first rank.
/// Columns are counted from the `a` file.
/// ```text
/// 8| (0,0) (0,1) ... (0,7)
/// 7| (1,0) (1,1) ... (1,7)
///  |  ...
/// 1| (7,0) (7,1) ... (7,7)
///  +--------------------
///     a     b   ...   h
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Creates a new [`Square`] from the provided row and column.
    ///
    /// # Panics
    /// If `row` or `col` is not within `[0, 8)` and debug assertions are enabled.
    ///
    /// # Example
    /// ```
    /// # use caissa::Square;
    /// let e2 = Square::new(6, 4);
    /// assert_eq!(e2.to_string(), "e2");
    /// ```
    #[inline(always)]
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(
            row < BOARD_SIZE && col < BOARD_SIZE,
            "Square coordinates must be between [0,8)"
        );
        Self { row, col }
    }

    /// Creates a new [`Square`] if both coordinates lie on the board.
    ///
    /// # Example
    /// ```
    /// # use caissa::Square;
    /// assert!(Square::try_new(7, 7).is_some());
    /// assert!(Square::try_new(8, 0).is_none());
    /// assert!(Square::try_new(0, -1).is_none());
    /// ```
    #[inline(always)]
    pub fn try_new(row: i8, col: i8) -> Option<Self> {
        let size = BOARD_SIZE as i8;
        ((0..size).contains(&row) && (0..size).contains(&col))
            .then(|| Self::new(row as u8, col as u8))
    }

    /// Returns an iterator over all squares, row by row, starting at `(0, 0)`.
    ///
    /// # Example
    /// ```
    /// # use caissa::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next().unwrap(), Square::new(0, 0));
    /// assert_eq!(iter.last().unwrap(), Square::new(7, 7));
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(|i| Self::new(i / BOARD_SIZE, i % BOARD_SIZE))
    }

    /// The row of this [`Square`], where `0` is Black's back rank.
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// The column of this [`Square`], where `0` is the `a` file.
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.col
    }

    /// Returns this [`Square`] as a `usize` in `[0, 64)`.
    ///
    /// Useful for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        (self.row * BOARD_SIZE + self.col) as usize
    }

    /// Steps `d_row` rows and `d_col` columns away from this [`Square`], yielding `None` if that leaves the board.
    ///
    /// # Example
    /// ```
    /// # use caissa::Square;
    /// let e2 = Square::new(6, 4);
    /// assert_eq!(e2.offset(-2, 0), Some(Square::new(4, 4)));
    /// assert_eq!(e2.offset(2, 0), None);
    /// ```
    #[inline(always)]
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Self> {
        Self::try_new(self.row as i8 + d_row, self.col as i8 + d_col)
    }

    /// Creates a [`Square`] from a coordinate string, such as `"e4"`.
    ///
    /// # Example
    /// ```
    /// # use caissa::Square;
    /// let e4 = Square::from_uci("e4").unwrap();
    /// assert_eq!(e4, Square::new(4, 4));
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let &[file, rank] = square.as_bytes() else {
            bail!("Invalid Square string: String must contain exactly 2 characters. Got {square:?}");
        };

        if !(b'a'..=b'h').contains(&file) {
            bail!("Invalid file in Square string {square:?}: must be between [a,h]");
        }
        if !(b'1'..=b'8').contains(&rank) {
            bail!("Invalid rank in Square string {square:?}: must be between [1,8]");
        }

        Ok(Self::new(BOARD_SIZE - (rank - b'0'), file - b'a'))
    }

    /// Converts this [`Square`] to a coordinate string, such as `"e4"`.
    ///
    /// # Example
    /// ```
    /// # use caissa::Square;
    /// assert_eq!(Square::new(4, 2).to_uci(), "c4");
    /// ```
    #[inline(always)]
    pub fn to_uci(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    /// The file letter (`a` through `h`) of this [`Square`].
    #[inline(always)]
    pub const fn file_char(&self) -> char {
        (b'a' + self.col) as char
    }

    /// The rank digit (`1` through `8`) of this [`Square`].
    #[inline(always)]
    pub const fn rank_char(&self) -> char {
        (b'0' + BOARD_SIZE - self.row) as char
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Wrapper for [`Square::from_uci`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;
    /// Wrapper for [`Square::from_uci`].
    #[inline(always)]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_uci(value)
    }
}

impl fmt::Display for Square {
    /// Calls [`Square::to_uci`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_uci().fmt(f)
    }
}

impl fmt::Debug for Square {
    /// Calls [`Square::to_uci`] and also displays the `(row, column)` pair.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({},{})", self.to_uci(), self.row, self.col)
    }
}
