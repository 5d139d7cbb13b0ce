/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, Piece, Square};

impl Board {
    /// Returns `true` if `color`'s King is attacked by any enemy piece.
    ///
    /// A board without a King of that color is never in check.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Color};
    /// let board = Board::from_fen("4k3/8/8/8/8/8/8/4R1K1").unwrap();
    /// assert!(board.is_in_check(Color::Black));
    /// assert!(!board.is_in_check(Color::White));
    /// assert!(!Board::empty().is_in_check(Color::White));
    /// ```
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_attacked_by(king, color.opponent()))
    }

    /// Returns `true` if any piece of `attacker` could capture on `square` (or move onto it, if it is empty).
    ///
    /// Pawns only attack diagonally, so their forward pushes never count.
    pub fn is_attacked_by(&self, square: Square, attacker: Color) -> bool {
        self.pieces(attacker)
            .any(|(from, piece)| self.attacks(from, piece, square))
    }

    /// Returns an iterator over the squares of every enemy piece currently giving check to `color`'s King.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Color, Square};
    /// let board = Board::from_fen("4k3/8/3N4/8/8/8/8/4R1K1").unwrap();
    /// let checkers = board.checkers(Color::Black).collect::<Vec<_>>();
    /// assert_eq!(checkers, [Square::new(2, 3), Square::new(7, 4)]);
    /// ```
    pub fn checkers(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        let king = self.king_square(color);

        self.pieces(color.opponent())
            .filter(move |&(from, piece)| king.is_some_and(|king| self.attacks(from, piece, king)))
            .map(|(from, _)| from)
    }

    /// Returns `true` if `piece` on `from` attacks `target`.
    fn attacks(&self, from: Square, piece: Piece, target: Square) -> bool {
        if piece.is_pawn() {
            let dir = piece.color().pawn_direction();
            return [-1, 1]
                .into_iter()
                .any(|d_col| from.offset(dir, d_col) == Some(target));
        }

        self.attack_moves(from).iter().any(|mv| mv.to() == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::position::fen_board;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_startpos_not_in_check() {
        let board = Board::new();
        assert!(!board.is_in_check(Color::White));
        assert!(!board.is_in_check(Color::Black));
        assert_eq!(board.checkers(Color::White).count(), 0);
    }

    #[test]
    fn test_pawn_attacks_diagonally_only() {
        let board = fen_board("8/8/8/4p3/8/8/8/8");
        assert!(board.is_attacked_by(sq("d4"), Color::Black));
        assert!(board.is_attacked_by(sq("f4"), Color::Black));
        assert!(!board.is_attacked_by(sq("e4"), Color::Black));
        assert!(!board.is_attacked_by(sq("d6"), Color::Black));
    }

    #[test]
    fn test_pawn_gives_check() {
        let board = fen_board("8/8/8/8/8/3p4/4K3/8");
        assert!(board.is_in_check(Color::White));
        assert_eq!(board.checkers(Color::White).collect::<Vec<_>>(), [sq("d3")]);
    }

    #[test]
    fn test_sliders_are_blocked() {
        let board = fen_board("4k3/8/8/8/4P3/8/8/4R1K1");
        assert!(!board.is_in_check(Color::Black));
        assert!(board.is_attacked_by(sq("e3"), Color::White));
        assert!(!board.is_attacked_by(sq("e5"), Color::White));
    }

    #[test]
    fn test_knight_checks_over_pieces() {
        let board = fen_board("4k3/3ppp2/5N2/8/8/8/8/4K3");
        assert!(board.is_in_check(Color::Black));
    }

    #[test]
    fn test_kings_attack_adjacent_squares() {
        let board = fen_board("8/8/8/8/8/8/8/4K3");
        assert!(board.is_attacked_by(sq("d2"), Color::White));
        assert!(!board.is_attacked_by(sq("e3"), Color::White));
    }

    #[test]
    fn test_own_pieces_are_not_attacked() {
        let board = fen_board("8/8/8/8/8/8/4P3/4R3");
        assert!(!board.is_attacked_by(sq("e2"), Color::White));
    }
}
