/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Detection of attacked squares and checks.
mod attacks;

/// Pseudo-legal and legal move generation.
mod movegen;

/// Representation of a single move.
mod moves;

/// Move generation testing.
mod perft;

/// Colors, piece kinds, and pieces.
mod piece;

/// The board itself and the rules for applying moves to it.
mod position;

/// Material counting and game scores.
mod score;

/// A single square on the board.
mod square;

/// Checkmate and stalemate detection.
mod status;

/// Constants shared across the board module.
mod utils;

pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use score::*;
pub use square::*;
pub use status::*;
pub use utils::*;
