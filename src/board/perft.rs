/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, Square};
use crate::Game;

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
///
/// # Example
/// ```
/// # use caissa::{perft, Game};
/// assert_eq!(perft(&Game::default(), 2), 400);
/// ```
#[inline(always)]
pub fn perft(game: &Game, depth: usize) -> u64 {
    perft_generic::<true, false>(game, depth)
}

/// Perform a splitperft at the specified depth, collecting only data about the number of possible positions (nodes),
/// and printing the number of nodes reachable after each move available at the root node.
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
#[inline(always)]
pub fn splitperft(game: &Game, depth: usize) -> u64 {
    perft_generic::<true, true>(game, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(game: &Game, depth: usize) -> u64 {
    count_nodes::<BULK, SPLIT>(game.board(), game.side_to_move(), game.ep_target(), depth)
}

/// Recursive body of [`perft_generic`].
///
/// Works on the bare position rather than a [`Game`], so that no move history is copied at each node.
fn count_nodes<const BULK: bool, const SPLIT: bool>(
    board: &Board,
    side: Color,
    ep_target: Option<Square>,
    depth: usize,
) -> u64 {
    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && !SPLIT && depth == 1 {
        return board.legal_moves_for(side, ep_target).len() as u64;
    }
    // Recursion limit; return 1, since we're fathoming this node.
    else if depth == 0 {
        return 1;
    }

    // Recursively accumulate the nodes from the remaining depths
    board
        .legal_moves_for(side, ep_target)
        .into_iter()
        .fold(0, |nodes, mv| {
            let new_nodes = count_nodes::<BULK, false>(
                &board.with_move_made(mv),
                side.opponent(),
                mv.en_passant_target(),
                depth - 1,
            );

            if SPLIT {
                println!("{mv}\t{new_nodes}");
            }

            nodes + new_nodes
        })
}
