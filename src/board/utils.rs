/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// FEN string for the starting position of chess.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A popular FEN string for debugging move generation.
pub const FEN_KIWIPETE: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// Number of rows (and columns) on the board.
pub const BOARD_SIZE: u8 = 8;

/// Column the King starts on, for both sides.
pub const KING_START_COL: u8 = 4;

/// Kingside castling: (Rook's origin column, Rook's destination column, King's destination column).
pub const KINGSIDE_CASTLE_COLS: (u8, u8, u8) = (7, 5, 6);

/// Queenside castling: (Rook's origin column, Rook's destination column, King's destination column).
pub const QUEENSIDE_CASTLE_COLS: (u8, u8, u8) = (0, 3, 2);
