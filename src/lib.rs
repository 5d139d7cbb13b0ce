/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! A pure, deterministic chess rules engine.
//!
//! Given a [`Board`] and a requested move, `caissa` decides whether the move is legal and produces the next [`Board`].
//! It knows every rule of chess (including en passant, castling, and promotion) and can tell when a game ends in
//! checkmate or stalemate. A [`Game`] wraps a [`Board`] with the context it needs to be played: whose turn it is,
//! the en passant target square, and the moves played so far.
//!
//! ```
//! # use caissa::{Game, Color, Verdict};
//! let mut game = Game::new();
//! for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     game.play_uci(mv).unwrap();
//! }
//! assert_eq!(game.verdict(), Verdict::Checkmate { winner: Color::Black });
//! ```

/// Board representation, move generation, and the rules of chess.
mod board;

/// Command-line and console command parsing.
mod cli;

/// The interactive console behind the `caissa` binary.
mod console;

/// A game in progress: turn order, en passant state, and move history.
mod game;

pub use board::*;
pub use cli::*;
pub use console::*;
pub use game::*;
