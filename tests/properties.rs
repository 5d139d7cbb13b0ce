/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Rules that must hold in every position reachable by legal play.

use caissa::{Color, Game, PieceKind, Verdict, FEN_KIWIPETE, FEN_STARTPOS};
use proptest::prelude::*;

const STARTING_FENS: &[&str] = &[
    FEN_STARTPOS,
    FEN_KIWIPETE,
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "8/P1k5/K7/8/8/8/8/8 w - - 0 1",
];

/// Plays from `fen`, picking each move by index into the legal moves.
fn playout(fen: &str, choices: &[usize]) -> Game {
    let mut game = Game::from_fen(fen).unwrap();
    for &choice in choices {
        let moves = game.legal_moves();
        if moves.is_empty() {
            break;
        }
        game.make_move(moves[choice % moves.len()]);
    }
    game
}

fn random_game() -> impl Strategy<Value = Game> {
    (
        prop::sample::select(STARTING_FENS.to_vec()),
        prop::collection::vec(any::<usize>(), 0..24),
    )
        .prop_map(|(fen, choices)| playout(fen, &choices))
}

fn material_by_hand(game: &Game, color: Color) -> i32 {
    game.board()
        .iter()
        .filter(|(_, piece)| piece.color() == color)
        .map(|(_, piece)| piece.kind().value())
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn legal_moves_never_leave_mover_in_check(game in random_game()) {
        let mover = game.side_to_move();
        for mv in game.legal_moves() {
            let after = game.board().with_move_made(mv);
            prop_assert!(!after.is_in_check(mover), "{mv:?} leaves {mover:?} in check\n{game}");
        }
    }

    #[test]
    fn applying_a_move_is_pure(game in random_game()) {
        let before = *game.board();
        for mv in game.legal_moves() {
            let first = before.with_move_made(mv);
            let second = before.with_move_made(mv);
            prop_assert_eq!(first, second);
            prop_assert_eq!(*game.board(), before);
        }
    }

    #[test]
    fn material_is_sum_of_piece_values(game in random_game()) {
        for color in Color::all() {
            prop_assert_eq!(game.board().material(color), material_by_hand(&game, color));
        }
    }

    #[test]
    fn captures_only_cost_the_victim(game in random_game()) {
        let mover = game.side_to_move();
        let board = game.board();
        for mv in game.legal_moves().into_iter().filter(|mv| mv.is_capture()) {
            let after = board.with_move_made(mv);
            let Some(victim) = mv.captured() else {
                continue;
            };

            let promotion_gain = mv
                .promotion()
                .map_or(0, |kind| kind.value() - PieceKind::Pawn.value());

            prop_assert_eq!(after.material(mover), board.material(mover) + promotion_gain);
            prop_assert_eq!(
                after.material(mover.opponent()),
                board.material(mover.opponent()) - victim.kind().value()
            );
        }
    }

    #[test]
    fn verdicts_are_exclusive(game in random_game()) {
        let side = game.side_to_move();
        let ep = game.ep_target();
        let board = game.board();

        let mate = board.is_checkmate(side, ep);
        let stalemate = board.is_stalemate(side, ep);
        prop_assert!(!(mate && stalemate));

        if mate || stalemate {
            prop_assert!(game.legal_moves().is_empty());
            prop_assert!(game.is_over());
        } else {
            prop_assert!(!game.legal_moves().is_empty());
            prop_assert_eq!(game.verdict(), Verdict::Ongoing);
        }

        if mate {
            prop_assert_eq!(game.verdict().winner(), Some(side.opponent()));
        }
    }

    #[test]
    fn fen_reload_preserves_position(game in random_game()) {
        let fen = game.to_fen();
        let reloaded = Game::from_fen(&fen).unwrap();
        prop_assert_eq!(reloaded.to_fen(), fen);

        let uci = |game: &Game| {
            let mut moves = game.legal_moves().iter().map(|mv| mv.to_uci()).collect::<Vec<_>>();
            moves.sort();
            moves
        };
        prop_assert_eq!(uci(&reloaded), uci(&game));
    }

    #[test]
    fn en_passant_lasts_one_ply(game in random_game()) {
        match game.last_move() {
            Some(mv) if mv.is_pawn_double_push() => {
                prop_assert_eq!(game.ep_target(), mv.en_passant_target());
            }
            _ => prop_assert_eq!(game.ep_target(), None),
        }
    }
}
