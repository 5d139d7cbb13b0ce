/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info};

use crate::{
    perft, Board, Color, Move, MoveList, PieceKind, Scoreboard, Square, Verdict,
    KINGSIDE_CASTLE_COLS, KING_START_COL, QUEENSIDE_CASTLE_COLS,
};

/// A game of chess in progress.
///
/// The [`Board`] itself knows nothing about whose turn it is or what happened on the previous ply.
/// A [`Game`] owns that context: the side to move, the en passant target left by the last move,
/// the log of moves played so far, and the current [`Verdict`].
#[derive(Clone, PartialEq, Eq)]
pub struct Game {
    /// Current piece placement.
    board: Board,

    /// Whose turn it is.
    side_to_move: Color,

    /// The square skipped by a Pawn's double push on the previous ply, if any.
    ep_target: Option<Square>,

    /// Every move played since this game was created, in order.
    history: Vec<Move>,

    /// Outcome of the current position, for the side to move.
    verdict: Verdict,

    /// Plies since the last capture or Pawn move. Only reported in FEN strings.
    halfmove: usize,

    /// Starts at 1 and increments after every move by Black.
    fullmove: usize,
}

impl Game {
    /// Creates a new [`Game`] from the standard starting position, with White to move.
    pub fn new() -> Self {
        Self::from_position(Board::new(), Color::White, None)
    }

    /// Creates a new [`Game`] from an arbitrary position.
    ///
    /// The verdict is computed immediately, so a game may begin already over.
    pub fn from_position(board: Board, side_to_move: Color, ep_target: Option<Square>) -> Self {
        Self {
            board,
            side_to_move,
            ep_target,
            history: Vec::new(),
            verdict: board.verdict(side_to_move, ep_target),
            halfmove: 0,
            fullmove: 1,
        }
    }

    /// Creates a new [`Game`] from the provided FEN string.
    ///
    /// Every field after the piece placements is optional and defaults to the values of a fresh game.
    /// Castling availability is recorded on the corner Rooks: a Rook whose right is absent is marked as having moved.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Game, Color, FEN_KIWIPETE};
    /// let game = Game::from_fen(FEN_KIWIPETE).unwrap();
    /// assert_eq!(game.side_to_move(), Color::White);
    /// assert_eq!(game.legal_moves().len(), 48);
    /// assert_eq!(game.to_fen(), FEN_KIWIPETE);
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut split = fen.split_whitespace();

        let placements = split
            .next()
            .ok_or(anyhow!("FEN string must have piece placements."))?;
        let mut board = Board::from_fen(placements)?;

        let active_color = split.next().unwrap_or("w");
        let side_to_move = Color::from_str(active_color)
            .with_context(|| format!("Invalid active color in FEN string {fen:?}"))?;

        let castling = split.next().unwrap_or("-");
        apply_castling_rights(&mut board, castling)?;

        let en_passant_target = split.next().unwrap_or("-");
        let ep_target = match en_passant_target {
            "-" => None,
            square => Some(
                Square::from_uci(square)
                    .with_context(|| format!("Invalid en passant target in FEN string {fen:?}"))?,
            ),
        };

        let halfmove = split.next().unwrap_or("0");
        let halfmove = halfmove.parse().or(Err(anyhow!(
            "FEN string must have valid halfmove counter. Got {halfmove:?}"
        )))?;

        let fullmove = split.next().unwrap_or("1");
        let fullmove = fullmove.parse().or(Err(anyhow!(
            "FEN string must have valid fullmove counter. Got {fullmove:?}"
        )))?;

        Ok(Self {
            halfmove,
            fullmove,
            ..Self::from_position(board, side_to_move, ep_target)
        })
    }

    /// Generates a FEN string of the current position.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Game, FEN_STARTPOS};
    /// let mut game = Game::new();
    /// assert_eq!(game.to_fen(), FEN_STARTPOS);
    ///
    /// game.play_uci("e2e4").unwrap();
    /// assert_eq!(game.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    /// ```
    pub fn to_fen(&self) -> String {
        let ep = self
            .ep_target
            .map(|square| square.to_string())
            .unwrap_or(String::from("-"));

        format!(
            "{} {} {} {ep} {} {}",
            self.board.to_fen(),
            self.side_to_move,
            castling_rights(&self.board),
            self.halfmove,
            self.fullmove,
        )
    }

    /// Fetch the current [`Board`].
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Whose turn it is.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The en passant target square left by the previous move, if any.
    #[inline(always)]
    pub const fn ep_target(&self) -> Option<Square> {
        self.ep_target
    }

    /// Every move played so far, oldest first.
    #[inline(always)]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The most recently played move, if any.
    #[inline(always)]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// The outcome of the current position.
    #[inline(always)]
    pub const fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Returns `true` if the game has ended in checkmate or stalemate.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        self.verdict.is_over()
    }

    /// Halfmove counter, as it would appear in a FEN string.
    #[inline(always)]
    pub const fn halfmove(&self) -> usize {
        self.halfmove
    }

    /// Fullmove counter, as it would appear in a FEN string.
    #[inline(always)]
    pub const fn fullmove(&self) -> usize {
        self.fullmove
    }

    /// Returns `true` if the side to move is in check.
    #[inline(always)]
    pub fn is_in_check(&self) -> bool {
        self.board.is_in_check(self.side_to_move)
    }

    /// Squares of the pieces giving check to the side to move.
    pub fn checkers(&self) -> Vec<Square> {
        self.board.checkers(self.side_to_move).collect()
    }

    /// Scores the current position for both sides.
    #[inline(always)]
    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard::new(&self.board, self.verdict)
    }

    /// Legal moves of the piece on `square`.
    ///
    /// Empty if the square is empty, holds a piece of the side not to move, or the game is over.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Game, Square};
    /// let game = Game::new();
    /// assert_eq!(game.legal_moves_from(Square::new(6, 4)).len(), 2);
    /// assert!(game.legal_moves_from(Square::new(1, 4)).is_empty());
    /// ```
    pub fn legal_moves_from(&self, square: Square) -> MoveList {
        let owned = self
            .board
            .piece_at(square)
            .is_some_and(|piece| piece.color() == self.side_to_move);

        if !owned || self.is_over() {
            return MoveList::new();
        }

        self.board.legal_moves(square, self.ep_target)
    }

    /// All legal moves of the side to move.
    #[inline(always)]
    pub fn legal_moves(&self) -> MoveList {
        self.board.legal_moves_for(self.side_to_move, self.ep_target)
    }

    /// Looks up the legal move from `from` to `to`, with the given promotion choice.
    ///
    /// Fails with a description of the problem if no such move is legal right now.
    pub fn find_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move> {
        if self.is_over() {
            bail!("The game is already over: {}", self.verdict);
        }

        let Some(piece) = self.board.piece_at(from) else {
            bail!("There is no piece on {from}");
        };

        if piece.color() != self.side_to_move {
            bail!(
                "The {} on {from} belongs to {}, but it is {}'s turn",
                piece.name(),
                piece.color().title(),
                self.side_to_move.title()
            );
        }

        let candidates = self
            .board
            .legal_moves(from, self.ep_target)
            .into_iter()
            .filter(|mv| mv.to() == to)
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            bail!("The {} on {from} cannot move to {to}", piece.name());
        }

        let is_promotion = candidates.iter().any(Move::is_promotion);
        match (is_promotion, promotion) {
            (true, None) => bail!("Moving to {to} promotes; choose one of q, r, b, or n"),
            (false, Some(kind)) => bail!("Moving to {to} does not promote, so {kind} is not allowed"),
            _ => {}
        }

        candidates
            .into_iter()
            .find(|mv| mv.promotion() == promotion)
            .ok_or(anyhow!("Cannot promote to a {}", promotion.map_or("piece", |k| k.name())))
    }

    /// Plays the move from `from` to `to`, if it is legal.
    ///
    /// Returns the [`Move`] that was played.
    pub fn play(&mut self, from: Square, to: Square, promotion: Option<PieceKind>) -> Result<Move> {
        let mv = self.find_move(from, to, promotion)?;
        self.make_move(mv);
        Ok(mv)
    }

    /// Parses a coordinate string (`e2e4`, `e7e8q`) and plays it, if it is legal.
    ///
    /// # Example
    /// ```
    /// # use caissa::Game;
    /// let mut game = Game::new();
    /// game.play_uci("e2e4").unwrap();
    /// assert!(game.play_uci("e4e5").is_err()); // Not White's turn
    /// assert!(game.play_uci("e7e4").is_err()); // Not a legal destination
    /// ```
    pub fn play_uci(&mut self, mv: &str) -> Result<Move> {
        let (from, to, promotion) =
            parse_uci_move(mv).with_context(|| format!("Invalid move string {mv:?}"))?;
        self.play(from, to, promotion)
    }

    /// Applies the provided [`Move`] and advances the turn. No enforcement of legality.
    ///
    /// Use [`Game::play`] or [`Game::play_uci`] for moves that come from a user.
    pub fn make_move(&mut self, mv: Move) {
        let mover = self.side_to_move;

        self.board = self.board.with_move_made(mv);
        self.ep_target = mv.en_passant_target();
        self.side_to_move = mover.opponent();
        self.history.push(mv);

        if mv.piece().is_pawn() || mv.is_capture() {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }
        if mover == Color::Black {
            self.fullmove += 1;
        }

        self.verdict = self.board.verdict(self.side_to_move, self.ep_target);

        debug!(
            "[GAME] {} played {mv:?}, en passant target: {:?}",
            mover.title(),
            self.ep_target
        );

        if self.verdict.is_over() {
            info!("[GAME] Game ended after {} plies: {}", self.history.len(), self.verdict);
        }
    }

    /// Counts the positions reachable from this one in `depth` plies. See [`perft`].
    #[inline(always)]
    pub fn perft(&self, depth: usize) -> u64 {
        perft(self, depth)
    }
}

/// Parses the parts of a coordinate move string, such as `e2e4` or `b7b8n`.
fn parse_uci_move(mv: &str) -> Result<(Square, Square, Option<PieceKind>)> {
    let mv = mv.trim();
    if !(4..=5).contains(&mv.len()) || !mv.is_ascii() {
        bail!("Move strings must be 4 or 5 characters long, such as \"e2e4\" or \"e7e8q\"");
    }

    let from = Square::from_uci(&mv[0..2])?;
    let to = Square::from_uci(&mv[2..4])?;
    let promotion = mv[4..]
        .chars()
        .next()
        .map(PieceKind::from_uci)
        .transpose()?;

    if promotion.is_some_and(|kind| !kind.is_promotion()) {
        bail!("Pawns may only promote to a Queen, Rook, Bishop, or Knight");
    }

    Ok((from, to, promotion))
}

/// Marks corner Rooks without a castling right in `castling` as having moved.
///
/// Fails if a right names a King or Rook that is not on its starting square.
fn apply_castling_rights(board: &mut Board, castling: &str) -> Result<()> {
    if castling != "-" {
        if let Some(c) = castling.chars().find(|c| !"KQkq".contains(*c)) {
            bail!("Invalid castling rights {castling:?}: unrecognized character {c:?}");
        }
    }

    for color in Color::all() {
        let row = color.home_row();
        let king = Square::new(row, KING_START_COL);

        for (rook_col, _, _) in [KINGSIDE_CASTLE_COLS, QUEENSIDE_CASTLE_COLS] {
            let rook = Square::new(row, rook_col);
            let right = castling_char(color, rook_col);

            if castling.contains(right) {
                if !board.is_unmoved(king, color, PieceKind::King) {
                    bail!("Castling right {right:?} requires a {} King on {king}", color.title());
                }
                if !board.is_unmoved(rook, color, PieceKind::Rook) {
                    bail!("Castling right {right:?} requires a {} Rook on {rook}", color.title());
                }
            } else {
                board.set_moved(rook, true);
            }
        }
    }

    Ok(())
}

/// Reconstructs the castling field of a FEN string from the `has_moved` flags of Kings and Rooks.
fn castling_rights(board: &Board) -> String {
    let mut castling = String::with_capacity(4);

    for color in Color::all() {
        let row = color.home_row();
        if !board.is_unmoved(Square::new(row, KING_START_COL), color, PieceKind::King) {
            continue;
        }

        for (rook_col, _, _) in [KINGSIDE_CASTLE_COLS, QUEENSIDE_CASTLE_COLS] {
            if board.is_unmoved(Square::new(row, rook_col), color, PieceKind::Rook) {
                castling.push(castling_char(color, rook_col));
            }
        }
    }

    // If no side can castle, use a hyphen
    if castling.is_empty() {
        castling.push('-');
    }
    castling
}

/// The FEN character for `color`'s castling right with the Rook on `rook_col`.
fn castling_char(color: Color, rook_col: u8) -> char {
    let c = if rook_col == KINGSIDE_CASTLE_COLS.0 {
        'k'
    } else {
        'q'
    };

    if color.is_white() {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

impl Default for Game {
    /// Standard starting position for chess.
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    /// Wrapper for [`Game::from_fen`].
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Game {
    /// Draws the board alongside the state of the game.
    ///
    /// The alternate (`{:#}`) formatter draws pieces with their Unicode glyphs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = if f.alternate() {
            format!("{:#}", self.board)
        } else {
            self.board.to_string()
        };

        let squares_to_string = |squares: Vec<Square>| {
            squares
                .into_iter()
                .map(Square::to_uci)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let lines = board.lines().collect::<Vec<_>>();
        for (row, line) in lines.iter().enumerate() {
            write!(f, "{line}")?;

            match row {
                1 => write!(f, "        FEN: {}", self.to_fen())?,
                2 => write!(f, "       Turn: {}", self.side_to_move.title())?,
                3 => write!(f, "   Checkers: {}", squares_to_string(self.checkers()))?,
                4 => write!(f, "     Status: {}", self.verdict)?,
                5 => write!(f, "      Score: {}", self.scoreboard())?,
                _ => {}
            }

            if row + 1 < lines.len() {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let history = self
            .history
            .iter()
            .map(Move::to_uci)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{self}\n\nMoves: {history}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_STARTPOS};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_startpos_fen_round_trip() {
        let game = Game::from_fen(FEN_STARTPOS).unwrap();
        assert_eq!(game, Game::new());
        assert_eq!(game.to_fen(), FEN_STARTPOS);
    }

    #[test]
    fn test_kiwipete_fen_round_trip() {
        assert_eq!(Game::from_fen(FEN_KIWIPETE).unwrap().to_fen(), FEN_KIWIPETE);
    }

    #[test]
    fn test_fen_defaults() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.ep_target(), None);
        assert_eq!(game.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn test_fen_castling_rights_mark_rooks() {
        let game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        let castles = game
            .legal_moves_from(sq("e1"))
            .into_iter()
            .filter(|mv| mv.is_castle())
            .collect::<Vec<_>>();
        assert_eq!(castles.len(), 1);
        assert!(castles[0].is_short_castle());
        assert_eq!(game.to_fen(), "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1");
    }

    #[test]
    fn test_fen_rejects_impossible_castling_rights() {
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1").is_err());
        assert!(Game::from_fen("r3k2r/8/8/8/8/8/8/R2K3R w Q - 0 1").is_err());
        assert!(Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w X - 0 1").is_err());
    }

    #[test]
    fn test_fen_rejects_garbage() {
        assert!(Game::from_fen("").is_err());
        assert!(Game::from_fen("8/8/8/8/8/8/8/8 x").is_err());
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - z9").is_err());
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x").is_err());
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 y").is_err());
    }

    #[test]
    fn test_single_push_leaves_no_en_passant_target() {
        let mut game = Game::new();
        game.play_uci("e2e3").unwrap();
        assert_eq!(game.ep_target(), None);
    }

    #[test]
    fn test_double_push_sets_en_passant_target() {
        let mut game = Game::new();
        game.play_uci("e2e4").unwrap();
        assert_eq!(game.ep_target(), Some(Square::new(5, 4)));
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn test_en_passant_expires_after_one_ply() {
        let mut game = Game::new();
        for mv in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            game.play_uci(mv).unwrap();
        }

        // Available immediately
        let ep = game
            .legal_moves_from(sq("e5"))
            .into_iter()
            .find(|mv| mv.is_en_passant())
            .unwrap();
        assert_eq!(ep.to(), sq("d6"));

        // But not after a waiting move from each side
        game.play_uci("g1f3").unwrap();
        game.play_uci("a6a5").unwrap();
        assert!(game
            .legal_moves_from(sq("e5"))
            .iter()
            .all(|mv| !mv.is_en_passant()));
        assert!(game.play_uci("e5d6").is_err());
    }

    #[test]
    fn test_en_passant_capture_removes_pawn() {
        let mut game = Game::new();
        for mv in ["e2e4", "a7a6", "e4e5", "d7d5", "e5d6"] {
            game.play_uci(mv).unwrap();
        }

        assert!(game.board().is_empty(sq("d5")));
        assert!(game.board().is_empty(sq("e5")));
        assert!(game.board().piece_at(sq("d6")).unwrap().is_pawn());
        assert_eq!(game.board().material(Color::Black), 38);
    }

    #[test]
    fn test_promotion_requires_choice() {
        let mut game = Game::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(game.play_uci("b7b8").is_err());
        assert!(game.play_uci("b7b8k").is_err());
        assert!(game.play_uci("b7b8p").is_err());

        let mv = game.play_uci("b7b8r").unwrap();
        assert!(mv.is_promotion());
        assert_eq!(
            game.board().piece_at(sq("b8")).map(|p| p.kind()),
            Some(PieceKind::Rook)
        );
    }

    #[test]
    fn test_superfluous_promotion_is_rejected() {
        let mut game = Game::new();
        assert!(game.play_uci("e2e4q").is_err());
        assert_eq!(game, Game::new());
    }

    #[test]
    fn test_find_move_errors() {
        let game = Game::new();
        assert!(game.find_move(sq("e4"), sq("e5"), None).is_err());
        assert!(game.find_move(sq("e7"), sq("e5"), None).is_err());
        assert!(game.find_move(sq("e2"), sq("e5"), None).is_err());
        assert!(game.find_move(sq("e2"), sq("e4"), None).is_ok());
    }

    #[test]
    fn test_invalid_move_strings() {
        let mut game = Game::new();
        for mv in ["", "e2", "e2e", "e2e4qq", "z2e4", "e2e9", "é2e4"] {
            assert!(game.play_uci(mv).is_err(), "{mv:?} should be rejected");
        }
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let mut game = Game::new();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.play_uci(mv).unwrap();
        }

        assert_eq!(
            game.verdict(),
            Verdict::Checkmate {
                winner: Color::Black
            }
        );
        assert!(game.legal_moves_from(sq("e2")).is_empty());
        assert!(game.play_uci("e2e4").is_err());
        assert_eq!(game.scoreboard()[Color::Black], 39 + crate::CHECKMATE_BONUS);
    }

    #[test]
    fn test_counters() {
        let mut game = Game::new();
        game.play_uci("g1f3").unwrap();
        assert_eq!((game.halfmove(), game.fullmove()), (1, 1));
        game.play_uci("g8f6").unwrap();
        assert_eq!((game.halfmove(), game.fullmove()), (2, 2));
        game.play_uci("e2e4").unwrap();
        assert_eq!((game.halfmove(), game.fullmove()), (0, 2));
    }

    #[test]
    fn test_castling_through_session() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        game.play_uci("e1g1").unwrap();
        assert!(game.board().piece_at(sq("f1")).unwrap().is_rook());
        assert!(game.last_move().unwrap().is_short_castle());

        game.play_uci("e8c8").unwrap();
        assert!(game.board().piece_at(sq("d8")).unwrap().is_rook());
        assert_eq!(game.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
    }
}
