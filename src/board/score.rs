/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Index};

use super::{Board, Color, Verdict};

/// Points awarded to the winner of a game that ended in checkmate, on top of their material.
pub const CHECKMATE_BONUS: i32 = 10;

impl Board {
    /// Sums the value of every piece `color` has on the board.
    ///
    /// Kings are worth nothing, so the starting position is worth `8 + 2*3 + 2*3 + 2*5 + 9 = 39` to either side.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Color};
    /// assert_eq!(Board::new().material(Color::White), 39);
    /// assert_eq!(Board::empty().material(Color::Black), 0);
    /// ```
    pub fn material(&self, color: Color) -> i32 {
        self.pieces(color).map(|(_, piece)| piece.kind().value()).sum()
    }
}

/// The score of both sides in a game.
///
/// Each side scores the material it has left, and the winner of a checkmate earns an additional [`CHECKMATE_BONUS`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Scoreboard([i32; Color::COUNT]);

impl Scoreboard {
    /// Scores `board` for both sides, given the game's `verdict`.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Color, Scoreboard, Verdict, CHECKMATE_BONUS};
    /// let board = Board::new();
    /// let scores = Scoreboard::new(&board, Verdict::Checkmate { winner: Color::Black });
    /// assert_eq!(scores[Color::White], 39);
    /// assert_eq!(scores[Color::Black], 39 + CHECKMATE_BONUS);
    /// ```
    pub fn new(board: &Board, verdict: Verdict) -> Self {
        let mut scores = Color::all().map(|color| board.material(color));

        if let Some(winner) = verdict.winner() {
            scores[winner] += CHECKMATE_BONUS;
        }

        Self(scores)
    }

    /// The side with the higher score, or `None` if the scores are level.
    pub fn leader(&self) -> Option<Color> {
        let [white, black] = self.0;
        match white.cmp(&black) {
            std::cmp::Ordering::Greater => Some(Color::White),
            std::cmp::Ordering::Less => Some(Color::Black),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl Index<Color> for Scoreboard {
    type Output = i32;
    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        &self.0[index]
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}, {}: {}",
            Color::White.title(),
            self[Color::White],
            Color::Black.title(),
            self[Color::Black]
        )
    }
}
