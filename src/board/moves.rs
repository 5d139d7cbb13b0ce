/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Piece, PieceKind, Square, KINGSIDE_CASTLE_COLS, QUEENSIDE_CASTLE_COLS};

/// Maximum possible number of moves in a given chess position.
///
/// Found [here](<https://www.chessprogramming.org/Chess_Position#cite_note-4>)
pub const MAX_NUM_MOVES: usize = 218;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// Represents a move made on a chess board.
///
/// A [`Move`] is self-describing: it carries the moving piece (as it was before moving), whatever it captures,
/// and any special behavior (en passant, castling, promotion). Applying it to a board never needs to look
/// anything up beyond the squares it names.
///
/// Moves are produced by the move generator. See [`crate::Board::legal_moves`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
    en_passant: bool,
    castling: bool,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a new, non-capturing [`Move`] of `piece` from `from` to `to`.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Move, Piece, Color, PieceKind, Square};
    /// let pawn = Piece::new(Color::White, PieceKind::Pawn);
    /// let e2e4 = Move::new(Square::new(6, 4), Square::new(4, 4), pawn);
    /// assert_eq!(e2e4.to_string(), "e2e4");
    /// ```
    #[inline(always)]
    pub const fn new(from: Square, to: Square, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            captured: None,
            en_passant: false,
            castling: false,
            promotion: None,
        }
    }

    /// Creates an en passant capture of `captured` by `pawn`, landing on `to`.
    #[inline(always)]
    pub const fn en_passant(from: Square, to: Square, pawn: Piece, captured: Piece) -> Self {
        Self {
            captured: Some(captured),
            en_passant: true,
            ..Self::new(from, to, pawn)
        }
    }

    /// Creates a castling move of `king` from `from` to `to`.
    ///
    /// The Rook that takes part is implied by the side of the board `to` lies on.
    #[inline(always)]
    pub const fn castle(from: Square, to: Square, king: Piece) -> Self {
        Self {
            castling: true,
            ..Self::new(from, to, king)
        }
    }

    /// Returns a copy of this [`Move`] that captures `victim`.
    #[inline(always)]
    pub const fn with_capture(self, victim: Piece) -> Self {
        Self {
            captured: Some(victim),
            ..self
        }
    }

    /// Returns a copy of this [`Move`] that promotes the moving Pawn to `promotion`.
    #[inline(always)]
    pub const fn with_promotion(self, promotion: PieceKind) -> Self {
        Self {
            promotion: Some(promotion),
            ..self
        }
    }

    /// Fetches the source (or "from") part of this [`Move`].
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Fetches the destination (or "to") part of this [`Move`].
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Fetches the moving [`Piece`], as it stood before this [`Move`].
    #[inline(always)]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    /// Fetches the [`Piece`] this [`Move`] captures, if any.
    #[inline(always)]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// Fetches the kind this [`Move`] promotes to, if any.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Returns `true` if this [`Move`] is a capture of any kind (capture, promotion-capture, en passant capture).
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns `true` if this [`Move`] is en passant.
    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        self.en_passant
    }

    /// Returns `true` if this [`Move`] is a castle, on either side.
    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        self.castling
    }

    /// Returns `true` if this [`Move`] is a kingside castle.
    #[inline(always)]
    pub const fn is_short_castle(&self) -> bool {
        self.castling && self.to.col() == KINGSIDE_CASTLE_COLS.2
    }

    /// Returns `true` if this [`Move`] is a queenside castle.
    #[inline(always)]
    pub const fn is_long_castle(&self) -> bool {
        self.castling && self.to.col() == QUEENSIDE_CASTLE_COLS.2
    }

    /// Returns `true` if this [`Move`] is a promotion.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Returns `true` if this [`Move`] advances a Pawn by two squares.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Move, Piece, Color, PieceKind, Square};
    /// let pawn = Piece::new(Color::Black, PieceKind::Pawn);
    /// let d7d5 = Move::new(Square::new(1, 3), Square::new(3, 3), pawn);
    /// assert!(d7d5.is_pawn_double_push());
    /// ```
    #[inline(always)]
    pub const fn is_pawn_double_push(&self) -> bool {
        self.piece.is_pawn() && self.from.row().abs_diff(self.to.row()) == 2
    }

    /// The en passant target square available to the opponent right after this [`Move`].
    ///
    /// This is the square a Pawn skipped over while advancing two squares, and `None` after any other move.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Move, Piece, Color, PieceKind, Square};
    /// let pawn = Piece::new(Color::White, PieceKind::Pawn);
    /// let e2e4 = Move::new(Square::new(6, 4), Square::new(4, 4), pawn);
    /// assert_eq!(e2e4.en_passant_target(), Some(Square::new(5, 4)));
    ///
    /// let e2e3 = Move::new(Square::new(6, 4), Square::new(5, 4), pawn);
    /// assert_eq!(e2e3.en_passant_target(), None);
    /// ```
    #[inline(always)]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.is_pawn_double_push()
            .then(|| Square::new((self.from.row() + self.to.row()) / 2, self.to.col()))
    }

    /// The square of the Pawn removed by this en passant capture, if this [`Move`] is en passant.
    ///
    /// The captured Pawn sits beside the mover: on the mover's starting row, in the destination's column.
    #[inline(always)]
    pub const fn en_passant_victim_square(&self) -> Option<Square> {
        if self.en_passant {
            Some(Square::new(self.from.row(), self.to.col()))
        } else {
            None
        }
    }

    /// If this [`Move`] is a castle, returns the origin and destination of the Rook that takes part.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Move, Piece, Color, PieceKind, Square};
    /// let king = Piece::new(Color::White, PieceKind::King);
    /// let castle = Move::castle(Square::new(7, 4), Square::new(7, 6), king);
    /// assert_eq!(castle.castling_rook_squares(), Some((Square::new(7, 7), Square::new(7, 5))));
    /// ```
    #[inline(always)]
    pub const fn castling_rook_squares(&self) -> Option<(Square, Square)> {
        if !self.castling {
            return None;
        }

        let row = self.from.row();
        let (rook_from, rook_to, _) = if self.to.col() == KINGSIDE_CASTLE_COLS.2 {
            KINGSIDE_CASTLE_COLS
        } else {
            QUEENSIDE_CASTLE_COLS
        };

        Some((Square::new(row, rook_from), Square::new(row, rook_to)))
    }

    /// Converts this [`Move`] to a coordinate string, such as `e2e4` or `e7e8q`.
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        if let Some(promotion) = self.promotion {
            format!("{}{}{}", self.from, self.to, promotion.to_uci())
        } else {
            format!("{}{}", self.from, self.to)
        }
    }

    /// A short, human-readable description of what kind of move this is.
    pub fn describe(&self) -> &'static str {
        match (self.castling, self.en_passant, self.promotion, self.captured) {
            (true, _, _, _) if self.to.col() == KINGSIDE_CASTLE_COLS.2 => "Short Castle",
            (true, _, _, _) => "Long Castle",
            (_, true, _, _) => "En Passant Capture",
            (_, _, Some(_), Some(_)) => "Capture and Promotion",
            (_, _, Some(_), None) => "Promotion",
            (_, _, None, Some(_)) => "Capture",
            _ if self.is_pawn_double_push() => "Pawn Double Push",
            _ => "Quiet",
        }
    }
}

impl fmt::Display for Move {
    /// A [`Move`] is displayed in its coordinate notation.
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Move {
    /// Debug formatting also shows the moving piece and what kind of move this is.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.to_uci(), self.piece.name(), self.describe())?;
        if let Some(captured) = self.captured {
            write!(f, " x {}", captured.name())?;
        }
        Ok(())
    }
}
