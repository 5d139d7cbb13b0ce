/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Index, str::FromStr};

use anyhow::{bail, Context, Result};

use super::{Color, Move, Piece, PieceKind, Square, BOARD_SIZE};

/// Back rank layout of the standard starting position, from the `a` file to the `h` file.
const BACK_RANK: [PieceKind; BOARD_SIZE as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An `8x8` grid of optional [`Piece`]s.
///
/// A [`Board`] is a plain value. Nothing outside of this crate mutates one in place:
/// playing a move returns a fresh [`Board`] (see [`Board::with_move_made`]), so hypothetical
/// positions never disturb the board they were derived from.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    /// Creates a [`Board`] in the standard starting position, with every piece unmoved.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Square, PieceKind};
    /// let board = Board::new();
    /// assert_eq!(board.piece_at(Square::new(7, 4)).unwrap().kind(), PieceKind::King);
    /// assert_eq!(board.iter().count(), 32);
    /// ```
    pub const fn new() -> Self {
        let mut board = Self::empty();

        let mut col = 0;
        while col < BOARD_SIZE as usize {
            let kind = BACK_RANK[col];
            board.squares[0][col] = Some(Piece::new(Color::Black, kind));
            board.squares[1][col] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            board.squares[6][col] = Some(Piece::new(Color::White, PieceKind::Pawn));
            board.squares[7][col] = Some(Piece::new(Color::White, kind));
            col += 1;
        }

        board
    }

    /// Creates a [`Board`] with no pieces on it.
    #[inline(always)]
    pub const fn empty() -> Self {
        Self {
            squares: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// Creates a [`Board`] from the piece placement field of a FEN string.
    ///
    /// A piece counts as unmoved only if it stands where the starting position has the same piece.
    /// Everything else is flagged as having moved.
    ///
    /// # Example
    /// ```
    /// # use caissa::Board;
    /// let board = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
    /// assert_eq!(board, Board::new());
    /// ```
    pub fn from_fen(placements: &str) -> Result<Self> {
        let home = Self::new();
        let mut board = Self::empty();

        let rows = placements.trim().split('/').collect::<Vec<_>>();
        if rows.len() != BOARD_SIZE as usize {
            bail!(
                "FEN placements must have {BOARD_SIZE} ranks separated by '/'. Got {} in {placements:?}",
                rows.len()
            );
        }

        for (row, placements) in rows.into_iter().enumerate() {
            let mut col = 0;
            for c in placements.chars() {
                if let Some(empty) = c.to_digit(10) {
                    col += empty as usize;
                    continue;
                }

                if col >= BOARD_SIZE as usize {
                    bail!("Too many squares in FEN rank {placements:?}");
                }

                let square = Square::new(row as u8, col as u8);
                let piece = Piece::from_uci(c)
                    .with_context(|| format!("Invalid piece in FEN rank {placements:?}"))?;
                let unmoved = home.piece_at(square).is_some_and(|p| p == piece);
                board.place(piece.with_moved(!unmoved), square);
                col += 1;
            }

            if col != BOARD_SIZE as usize {
                bail!("FEN rank {placements:?} must describe exactly {BOARD_SIZE} squares. Got {col}");
            }
        }

        Ok(board)
    }

    /// Generates the piece placement field of a FEN string for this [`Board`].
    ///
    /// # Example
    /// ```
    /// # use caissa::Board;
    /// assert_eq!(Board::new().to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    /// ```
    pub fn to_fen(&self) -> String {
        let mut placements = Vec::with_capacity(BOARD_SIZE as usize);

        for row in &self.squares {
            let mut rank = String::with_capacity(BOARD_SIZE as usize);
            let mut empty_spaces = 0;

            for square in row {
                if let Some(piece) = square {
                    if empty_spaces != 0 {
                        rank += &empty_spaces.to_string();
                        empty_spaces = 0;
                    }
                    rank.push(piece.char());
                } else {
                    empty_spaces += 1;
                }
            }

            if empty_spaces != 0 {
                rank += &empty_spaces.to_string();
            }
            placements.push(rank);
        }

        placements.join("/")
    }

    /// Fetches the [`Piece`] on `square`, if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.row() as usize][square.col() as usize]
    }

    /// Returns `true` if `square` holds no piece.
    #[inline(always)]
    pub const fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Returns a copy of this [`Board`] with `piece` placed on `square`, replacing whatever stood there.
    ///
    /// Useful for setting up positions by hand.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Color, Piece, PieceKind, Square};
    /// let king = Piece::new(Color::White, PieceKind::King);
    /// let board = Board::empty().with(king, Square::new(7, 4));
    /// assert_eq!(board.piece_at(Square::new(7, 4)), Some(king));
    /// ```
    #[inline(always)]
    pub const fn with(mut self, piece: Piece, square: Square) -> Self {
        self.squares[square.row() as usize][square.col() as usize] = Some(piece);
        self
    }

    /// Returns a copy of this [`Board`] with `square` emptied.
    #[inline(always)]
    pub const fn without(mut self, square: Square) -> Self {
        self.squares[square.row() as usize][square.col() as usize] = None;
        self
    }

    /// Returns an iterator over every piece on the board along with its square, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| Some((square, self.piece_at(square)?)))
    }

    /// Returns an iterator over every piece of `color` along with its square.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.color() == color)
    }

    /// Finds the square of `color`'s King, if it is on the board.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Color, Square};
    /// assert_eq!(Board::new().king_square(Color::Black), Some(Square::new(0, 4)));
    /// assert_eq!(Board::empty().king_square(Color::Black), None);
    /// ```
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find_map(|(square, piece)| piece.is_king().then_some(square))
    }

    /// Copies `self` and returns a [`Board`] after having applied the provided [`Move`].
    ///
    /// The move is trusted to have come from the move generator; it is not checked for legality.
    /// `self` is left untouched.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Square};
    /// let board = Board::new();
    /// let e2 = Square::new(6, 4);
    /// let e4 = Square::new(4, 4);
    /// let mv = board.legal_moves(e2, None).into_iter().find(|mv| mv.to() == e4).unwrap();
    ///
    /// let after = board.with_move_made(mv);
    /// assert!(after.is_empty(e2));
    /// assert!(after.piece_at(e4).unwrap().has_moved());
    /// assert!(!board.is_empty(e2));
    /// ```
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = *self;
        copied.make_move(mv);
        copied
    }

    /// Applies the provided [`Move`] in place. No enforcement of legality.
    fn make_move(&mut self, mv: Move) {
        // En passant removes a Pawn that isn't on the destination square
        if let Some(victim) = mv.en_passant_victim_square() {
            self.clear(victim);
        }

        // Castling drags the Rook along to the other side of the King
        if let Some((rook_from, rook_to)) = mv.castling_rook_squares() {
            if let Some(rook) = self.take(rook_from) {
                self.place(rook.moved(), rook_to);
            }
        }

        self.place(mv.piece().moved(), mv.to());
        self.clear(mv.from());

        if let Some(promotion) = mv.promotion() {
            if let Some(pawn) = self.piece_at(mv.to()) {
                self.place(pawn.promoted(promotion), mv.to());
            }
        }
    }

    /// Places `piece` on `square`, replacing whatever stood there.
    #[inline(always)]
    fn place(&mut self, piece: Piece, square: Square) {
        self.squares[square.row() as usize][square.col() as usize] = Some(piece);
    }

    /// Empties `square`.
    #[inline(always)]
    fn clear(&mut self, square: Square) {
        self.squares[square.row() as usize][square.col() as usize] = None;
    }

    /// Empties `square`, returning whatever stood there.
    #[inline(always)]
    fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.row() as usize][square.col() as usize].take()
    }

    /// Marks the piece on `square` as moved or unmoved, if there is one.
    ///
    /// Only used while importing castling rights from a FEN string.
    pub(crate) fn set_moved(&mut self, square: Square, has_moved: bool) {
        if let Some(piece) = self.piece_at(square) {
            self.place(piece.with_moved(has_moved), square);
        }
    }

    /// Returns `true` if `square` holds an unmoved piece of the provided `color` and `kind`.
    pub(crate) fn is_unmoved(&self, square: Square, color: Color, kind: PieceKind) -> bool {
        self.piece_at(square)
            .is_some_and(|p| p.color() == color && p.kind() == kind && !p.has_moved())
    }
}

impl Default for Board {
    /// Standard starting position for chess.
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    /// Wrapper for [`Board::from_fen`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index.row() as usize][index.col() as usize]
    }
}

impl fmt::Display for Board {
    /// Draws the board with rank and file labels.
    ///
    /// Pieces are drawn with their FEN characters, or with their Unicode glyphs when using the alternate (`{:#}`) formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, squares) in self.squares.iter().enumerate() {
            write!(f, "{}|", BOARD_SIZE as usize - row)?;
            for square in squares {
                let occupant = match square {
                    Some(piece) if f.alternate() => piece.glyph(),
                    Some(piece) => piece.char(),
                    None => '.',
                };
                write!(f, " {occupant}")?;
            }
            writeln!(f)?;
        }

        write!(f, " +")?;
        for _ in 0..BOARD_SIZE {
            write!(f, "--")?;
        }
        write!(f, "\n  ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", (b'a' + col) as char)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}\n\nFEN: {}", self.to_fen())
    }
}

/// Parses a FEN placement string, panicking on failure. Only meant for tests.
#[cfg(test)]
pub(crate) fn fen_board(placements: &str) -> Board {
    Board::from_fen(placements).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_initial_board_layout() {
        let board = Board::new();
        assert_eq!(board.pieces(Color::White).count(), 16);
        assert_eq!(board.pieces(Color::Black).count(), 16);
        assert!(board.iter().all(|(_, piece)| !piece.has_moved()));
        assert_eq!(
            board.piece_at(sq("d1")),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
        assert_eq!(
            board.piece_at(sq("d8")),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
    }

    #[test]
    fn test_fen_round_trip() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R";
        assert_eq!(fen_board(fen).to_fen(), fen);
    }

    #[test]
    fn test_fen_marks_displaced_pieces_as_moved() {
        let board = fen_board("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR");
        assert!(board.piece_at(sq("e4")).unwrap().has_moved());
        assert!(!board.piece_at(sq("d2")).unwrap().has_moved());
        assert!(!board.piece_at(sq("e1")).unwrap().has_moved());
    }

    #[test]
    fn test_fen_rejects_malformed_placements() {
        assert!(Board::from_fen("8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("9/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("7/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("x7/8/8/8/8/8/8/8").is_err());
    }

    #[test]
    fn test_make_move_leaves_original_untouched() {
        let original = Board::new();
        let pawn = original.piece_at(sq("e2")).unwrap();
        let after = original.with_move_made(Move::new(sq("e2"), sq("e4"), pawn));

        assert_eq!(original, Board::new());
        assert_ne!(original, after);
        assert_eq!(after.piece_at(sq("e4")), Some(pawn.moved()));
        assert!(after.is_empty(sq("e2")));
    }

    #[test]
    fn test_make_move_capture_replaces_victim() {
        let before = fen_board("4k3/8/8/3p4/4P3/8/8/4K3");
        let pawn = before.piece_at(sq("e4")).unwrap();
        let victim = before.piece_at(sq("d5")).unwrap();
        let after = before.with_move_made(Move::new(sq("e4"), sq("d5"), pawn).with_capture(victim));

        assert_eq!(after.piece_at(sq("d5")), Some(pawn.moved()));
        assert_eq!(after.iter().count(), 3);
    }

    #[test]
    fn test_make_move_en_passant_removes_passed_pawn() {
        let before = fen_board("4k3/8/8/3pP3/8/8/8/4K3");
        let pawn = before.piece_at(sq("e5")).unwrap();
        let victim = before.piece_at(sq("d5")).unwrap();
        let after = before.with_move_made(Move::en_passant(sq("e5"), sq("d6"), pawn, victim));

        assert!(after.is_empty(sq("d5")));
        assert!(after.is_empty(sq("e5")));
        assert_eq!(after.piece_at(sq("d6")), Some(pawn.moved()));
    }

    #[test]
    fn test_make_move_castling_relocates_rook() {
        let before = fen_board("r3k2r/8/8/8/8/8/8/R3K2R");
        let king = Piece::new(Color::White, PieceKind::King);
        let before = before.with(king, sq("e1"));

        let short = before.with_move_made(Move::castle(sq("e1"), sq("g1"), king));
        assert_eq!(short.piece_at(sq("g1")), Some(king.moved()));
        assert_eq!(
            short.piece_at(sq("f1")),
            Some(Piece::new(Color::White, PieceKind::Rook).moved())
        );
        assert!(short.is_empty(sq("h1")));
        assert!(short.is_empty(sq("e1")));

        let black_king = Piece::new(Color::Black, PieceKind::King);
        let long = before.with_move_made(Move::castle(sq("e8"), sq("c8"), black_king));
        assert_eq!(long.piece_at(sq("c8")), Some(black_king.moved()));
        assert!(long.piece_at(sq("d8")).unwrap().is_rook());
        assert!(long.is_empty(sq("a8")));
    }

    #[test]
    fn test_make_move_promotion_overwrites_kind() {
        let before = fen_board("1r2k3/P7/8/8/8/8/8/4K3");
        let pawn = before.piece_at(sq("a7")).unwrap();
        let rook = before.piece_at(sq("b8")).unwrap();
        let mv = Move::new(sq("a7"), sq("b8"), pawn)
            .with_capture(rook)
            .with_promotion(PieceKind::Knight);
        let after = before.with_move_made(mv);

        let knight = after.piece_at(sq("b8")).unwrap();
        assert_eq!(knight.kind(), PieceKind::Knight);
        assert_eq!(knight.color(), Color::White);
        assert!(knight.has_moved());
    }

    #[test]
    fn test_display_uses_glyphs_when_alternate() {
        let board = Board::new();
        assert!(format!("{board}").contains("r n b q k b n r"));
        assert!(format!("{board:#}").contains("♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜"));
    }
}
