/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{
    Board, Color, Move, MoveList, Piece, PieceKind, Square, KINGSIDE_CASTLE_COLS, KING_START_COL,
    QUEENSIDE_CASTLE_COLS,
};

/// Deltas for the movement of the Queen.
const QUEEN_DELTAS: [(i8, i8); 8] = [
    /* Rook */
    (1, 0),
    (0, -1),
    (-1, 0),
    (0, 1),
    /* Bishop */
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// Deltas for the movement of the Rook.
const ROOK_DELTAS: [(i8, i8); 4] = [
    QUEEN_DELTAS[0],
    QUEEN_DELTAS[1],
    QUEEN_DELTAS[2],
    QUEEN_DELTAS[3],
];

/// Deltas for the movement of the Bishop.
const BISHOP_DELTAS: [(i8, i8); 4] = [
    QUEEN_DELTAS[4],
    QUEEN_DELTAS[5],
    QUEEN_DELTAS[6],
    QUEEN_DELTAS[7],
];

/// Deltas for the movement of the Knight.
const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (2, 1),
    (2, -1),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

/// The King steps one square in any direction a Queen could slide.
const KING_DELTAS: [(i8, i8); 8] = QUEEN_DELTAS;

impl Board {
    /// Generates every pseudo-legal move for the piece on `from`.
    ///
    /// Pseudo-legal moves follow the movement rules of the piece (including castling and en passant)
    /// but may leave the mover's own King in check. An empty `from` yields no moves.
    ///
    /// `ep_target` is the square a Pawn skipped over on the previous ply, if any.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Square};
    /// let board = Board::new();
    /// let knight = Square::new(7, 1);
    /// assert_eq!(board.pseudo_moves(knight, None).len(), 2);
    /// assert!(board.pseudo_moves(Square::new(4, 4), None).is_empty());
    /// ```
    #[inline(always)]
    pub fn pseudo_moves(&self, from: Square, ep_target: Option<Square>) -> MoveList {
        self.generate_moves::<true>(from, ep_target)
    }

    /// Generates the moves of the piece on `from` that threaten other squares.
    ///
    /// Castling is never generated here: a castle cannot capture, and castling itself asks whether
    /// squares are attacked, so leaving it out keeps attack detection from recursing.
    #[inline(always)]
    pub(crate) fn attack_moves(&self, from: Square) -> MoveList {
        self.generate_moves::<false>(from, None)
    }

    /// Generates every legal move for the piece on `from`.
    ///
    /// A move is legal if it is pseudo-legal and does not leave the mover's King in check.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Square};
    /// let board = Board::new();
    /// let moves = board.legal_moves(Square::new(6, 4), None);
    /// let mut targets = moves.iter().map(|mv| mv.to()).collect::<Vec<_>>();
    /// targets.sort();
    /// assert_eq!(targets, [Square::new(4, 4), Square::new(5, 4)]);
    /// ```
    pub fn legal_moves(&self, from: Square, ep_target: Option<Square>) -> MoveList {
        let Some(piece) = self.piece_at(from) else {
            return MoveList::new();
        };

        let mut moves = self.pseudo_moves(from, ep_target);
        moves.retain(|mv| self.is_legal(piece.color(), *mv));
        moves
    }

    /// Generates every legal move available to `color`.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Board, Color};
    /// assert_eq!(Board::new().legal_moves_for(Color::White, None).len(), 20);
    /// ```
    pub fn legal_moves_for(&self, color: Color, ep_target: Option<Square>) -> MoveList {
        let mut moves = MoveList::new();

        for (square, _) in self.pieces(color) {
            for mv in self.legal_moves(square, ep_target) {
                // Only positions that cannot arise in a game have more moves than fit
                if moves.try_push(mv).is_err() {
                    return moves;
                }
            }
        }

        moves
    }

    /// Returns `true` if playing `mv` does not leave `color`'s King in check.
    #[inline(always)]
    pub(crate) fn is_legal(&self, color: Color, mv: Move) -> bool {
        !self.with_move_made(mv).is_in_check(color)
    }

    /// Generates moves for the piece on `from`, with or without castling.
    fn generate_moves<const CASTLING: bool>(
        &self,
        from: Square,
        ep_target: Option<Square>,
    ) -> MoveList {
        let mut moves = MoveList::new();

        let Some(piece) = self.piece_at(from) else {
            return moves;
        };

        match piece.kind() {
            PieceKind::Pawn => self.pawn_moves(&mut moves, from, piece, ep_target),
            PieceKind::Knight => self.step_moves(&mut moves, from, piece, &KNIGHT_DELTAS),
            PieceKind::Bishop => self.slider_moves(&mut moves, from, piece, &BISHOP_DELTAS),
            PieceKind::Rook => self.slider_moves(&mut moves, from, piece, &ROOK_DELTAS),
            PieceKind::Queen => self.slider_moves(&mut moves, from, piece, &QUEEN_DELTAS),
            PieceKind::King => {
                self.step_moves(&mut moves, from, piece, &KING_DELTAS);
                if CASTLING {
                    self.castling_moves(&mut moves, from, piece);
                }
            }
        }

        moves
    }

    /// Pushes, double pushes, diagonal captures and en passant.
    fn pawn_moves(
        &self,
        moves: &mut MoveList,
        from: Square,
        pawn: Piece,
        ep_target: Option<Square>,
    ) {
        let color = pawn.color();
        let dir = color.pawn_direction();

        // Pushes are never captures, so they need empty squares
        if let Some(single) = from.offset(dir, 0).filter(|to| self.is_empty(*to)) {
            push_pawn_move(moves, Move::new(from, single, pawn));

            if from.row() == color.pawn_start_row() {
                if let Some(double) = single.offset(dir, 0).filter(|to| self.is_empty(*to)) {
                    moves.push(Move::new(from, double, pawn));
                }
            }
        }

        for d_col in [-1, 1] {
            let Some(to) = from.offset(dir, d_col) else {
                continue;
            };

            match self.piece_at(to) {
                Some(victim) if victim.color() != color => {
                    push_pawn_move(moves, Move::new(from, to, pawn).with_capture(victim));
                }

                // The captured Pawn stands beside the mover, not on the target
                None if ep_target == Some(to) => {
                    let beside = Square::new(from.row(), to.col());
                    if let Some(victim) = self
                        .piece_at(beside)
                        .filter(|p| p.is_pawn() && p.color() != color)
                    {
                        moves.push(Move::en_passant(from, to, pawn, victim));
                    }
                }

                _ => {}
            }
        }
    }

    /// Single steps onto empty or enemy-occupied squares. Used by Knights and Kings.
    fn step_moves(&self, moves: &mut MoveList, from: Square, piece: Piece, deltas: &[(i8, i8)]) {
        for &(d_row, d_col) in deltas {
            let Some(to) = from.offset(d_row, d_col) else {
                continue;
            };

            match self.piece_at(to) {
                None => moves.push(Move::new(from, to, piece)),
                Some(victim) if victim.color() != piece.color() => {
                    moves.push(Move::new(from, to, piece).with_capture(victim))
                }
                Some(_) => {}
            }
        }
    }

    /// Rays that stop at the edge of the board, before a friendly piece, or on an enemy piece.
    fn slider_moves(
        &self,
        moves: &mut MoveList,
        from: Square,
        piece: Piece,
        deltas: &[(i8, i8)],
    ) {
        for &(d_row, d_col) in deltas {
            let mut current = from;

            while let Some(to) = current.offset(d_row, d_col) {
                match self.piece_at(to) {
                    None => moves.push(Move::new(from, to, piece)),
                    Some(victim) => {
                        if victim.color() != piece.color() {
                            moves.push(Move::new(from, to, piece).with_capture(victim));
                        }
                        break;
                    }
                }

                current = to;
            }
        }
    }

    /// Castling on either side of the board, if permitted.
    fn castling_moves(&self, moves: &mut MoveList, from: Square, king: Piece) {
        let home = Square::new(king.color().home_row(), KING_START_COL);
        if king.has_moved() || from != home || self.is_in_check(king.color()) {
            return;
        }

        for (rook_col, _, king_to) in [KINGSIDE_CASTLE_COLS, QUEENSIDE_CASTLE_COLS] {
            if self.can_castle(from, king, rook_col, king_to) {
                let to = Square::new(from.row(), king_to);
                moves.push(Move::castle(from, to, king));
            }
        }
    }

    /// Checks the Rook, the squares between King and Rook, and the squares the King travels through.
    ///
    /// Assumes the King is unmoved, on its home square, and not currently in check.
    fn can_castle(&self, from: Square, king: Piece, rook_col: u8, king_to: u8) -> bool {
        let row = from.row();

        if !self.is_unmoved(Square::new(row, rook_col), king.color(), PieceKind::Rook) {
            return false;
        }

        let (low, high) = if rook_col > from.col() {
            (from.col() + 1, rook_col)
        } else {
            (rook_col + 1, from.col())
        };
        if (low..high).any(|col| !self.is_empty(Square::new(row, col))) {
            return false;
        }

        // Both squares the King lands on, the one it crosses and its destination, must be safe
        let crossed = if king_to > from.col() {
            from.col() + 1
        } else {
            from.col() - 1
        };

        let without_king = self.without(from);
        [crossed, king_to].into_iter().all(|col| {
            !without_king
                .with(king, Square::new(row, col))
                .is_in_check(king.color())
        })
    }
}

/// Pushes `mv`, expanding it into one move per promotion kind if it reaches the last row.
fn push_pawn_move(moves: &mut MoveList, mv: Move) {
    if mv.to().row() == mv.piece().color().promotion_row() {
        for kind in PieceKind::promotions() {
            moves.push(mv.with_promotion(kind));
        }
    } else {
        moves.push(mv);
    }
}
