/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Board, Color, Square};

/// The outcome of a position, from the perspective of the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Verdict {
    /// The side to move has at least one legal move.
    #[default]
    Ongoing,

    /// The side to move is in check and has no legal moves.
    Checkmate { winner: Color },

    /// The side to move is not in check and has no legal moves.
    Stalemate,
}

impl Verdict {
    /// Returns `true` if the game cannot continue.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    /// The winning side, if the game ended in checkmate.
    #[inline(always)]
    pub const fn winner(&self) -> Option<Color> {
        match self {
            Self::Checkmate { winner } => Some(*winner),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "Game in progress"),
            Self::Checkmate { winner } => write!(f, "Checkmate! {} wins!", winner.title()),
            Self::Stalemate => write!(f, "Stalemate - Draw!"),
        }
    }
}

impl Board {
    /// Returns `true` if `color` has at least one legal move.
    ///
    /// Stops at the first legal move found.
    pub fn has_legal_move(&self, color: Color, ep_target: Option<Square>) -> bool {
        self.pieces(color).any(|(square, piece)| {
            self.pseudo_moves(square, ep_target)
                .into_iter()
                .any(|mv| self.is_legal(piece.color(), mv))
        })
    }

    /// Returns `true` if `color` is in check and has no legal moves.
    #[inline(always)]
    pub fn is_checkmate(&self, color: Color, ep_target: Option<Square>) -> bool {
        self.is_in_check(color) && !self.has_legal_move(color, ep_target)
    }

    /// Returns `true` if `color` is not in check but has no legal moves.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Color};
    /// // Black's King is boxed in by the Queen but not attacked
    /// let board = Board::from_fen("k7/2Q5/1K6/8/8/8/8/8").unwrap();
    /// assert!(board.is_stalemate(Color::Black, None));
    /// assert!(!board.is_checkmate(Color::Black, None));
    /// ```
    #[inline(always)]
    pub fn is_stalemate(&self, color: Color, ep_target: Option<Square>) -> bool {
        !self.is_in_check(color) && !self.has_legal_move(color, ep_target)
    }

    /// Classifies this position for `side_to_move`.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Color, Verdict};
    /// assert_eq!(Board::new().verdict(Color::White, None), Verdict::Ongoing);
    /// ```
    pub fn verdict(&self, side_to_move: Color, ep_target: Option<Square>) -> Verdict {
        if self.has_legal_move(side_to_move, ep_target) {
            Verdict::Ongoing
        } else if self.is_in_check(side_to_move) {
            Verdict::Checkmate {
                winner: side_to_move.opponent(),
            }
        } else {
            Verdict::Stalemate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::position::fen_board;

    #[test]
    fn test_fools_mate() {
        let board = fen_board("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR");
        assert!(board.is_in_check(Color::White));
        assert!(board.is_checkmate(Color::White, None));
        assert!(!board.is_stalemate(Color::White, None));
        assert!(board.legal_moves_for(Color::White, None).is_empty());
        assert_eq!(
            board.verdict(Color::White, None),
            Verdict::Checkmate {
                winner: Color::Black
            }
        );
    }

    #[test]
    fn test_cornered_king_is_stalemate() {
        let board = fen_board("7k/5Q2/6K1/8/8/8/8/8");
        assert!(!board.is_in_check(Color::Black));
        assert!(board.is_stalemate(Color::Black, None));
        assert!(!board.is_checkmate(Color::Black, None));
        assert_eq!(board.verdict(Color::Black, None), Verdict::Stalemate);

        // White still has plenty to do
        assert_eq!(board.verdict(Color::White, None), Verdict::Ongoing);
    }

    #[test]
    fn test_check_with_escape_is_ongoing() {
        let board = fen_board("4k3/8/8/8/8/8/8/4R1K1");
        assert!(board.is_in_check(Color::Black));
        assert!(!board.is_checkmate(Color::Black, None));
        assert_eq!(board.verdict(Color::Black, None), Verdict::Ongoing);
    }

    #[test]
    fn test_en_passant_resolves_check() {
        // The Black Pawn just advanced to d5, checking the King on c4
        let board = fen_board("7k/8/8/3pP3/2K5/8/8/8");
        let e5 = "e5".parse().unwrap();
        let d6 = "d6".parse().unwrap();
        assert!(board.is_in_check(Color::White));

        let moves = board.legal_moves(e5, Some(d6));
        assert_eq!(moves.len(), 1);
        assert!(moves[0].is_en_passant());

        // Without the en passant target, the Pawn cannot help
        assert!(board.legal_moves(e5, None).is_empty());
    }

    #[test]
    fn test_verdict_display() {
        let mate = Verdict::Checkmate {
            winner: Color::White,
        };
        assert!(mate.is_over());
        assert_eq!(mate.winner(), Some(Color::White));
        assert_eq!(mate.to_string(), "Checkmate! White wins!");

        assert!(Verdict::Stalemate.is_over());
        assert_eq!(Verdict::Stalemate.winner(), None);
        assert_eq!(Verdict::Stalemate.to_string(), "Stalemate - Draw!");

        assert!(!Verdict::Ongoing.is_over());
    }
}
