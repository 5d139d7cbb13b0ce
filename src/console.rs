/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    ops::ControlFlow,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
    time::Instant,
};

use anyhow::{bail, Context, Result};
use clap::{error::ErrorKind, Parser};
use tracing::warn;

use crate::{perft_generic, ConsoleCommand, Game, Square};

/// An interactive console that plays a single [`Game`], one command at a time.
#[derive(Debug)]
pub struct Console {
    /// The game being played.
    ///
    /// Modified whenever a move is played or a new game is started.
    game: Game,

    /// One half of a channel, responsible for sending commands to the console to execute.
    sender: Sender<ConsoleCommand>,

    /// One half of a channel, responsible for receiving commands for the console to execute.
    receiver: Receiver<ConsoleCommand>,
}

impl Console {
    /// Constructs a new [`Console`] playing `game`, to be executed with [`Console::run`].
    pub fn new(game: Game) -> Self {
        let (sender, receiver) = channel();

        Self {
            game,
            sender,
            receiver,
        }
    }

    /// The game currently being played.
    #[inline(always)]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Queues a [`ConsoleCommand`] to be executed once [`Console::run`] is called.
    pub fn send_command(&self, command: ConsoleCommand) -> Result<()> {
        self.sender
            .send(command)
            .context("Failed to queue command for the console")
    }

    /// Execute the main event loop for the console.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    /// Queued commands are executed before anything read from `stdin`.
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping after fatal error: {err}");
            }
        });

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            // Keep running, even on error
            match self.execute(cmd) {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => break,
                Err(e) => {
                    warn!("[CONSOLE] Command failed: {e:#}");
                    eprintln!("Error: {e:#}");
                }
            }
        }

        Ok(())
    }

    /// Executes a single [`ConsoleCommand`], printing its results to `stdout`.
    ///
    /// Returns [`ControlFlow::Break`] if the console should stop.
    pub fn execute(&mut self, cmd: ConsoleCommand) -> Result<ControlFlow<()>> {
        match cmd {
            ConsoleCommand::Display { pretty } => {
                if pretty {
                    println!("{:#}", self.game);
                } else {
                    println!("{}", self.game);
                }
            }

            ConsoleCommand::Exit => return Ok(ControlFlow::Break(())),

            ConsoleCommand::Fen => println!("{}", self.game.to_fen()),

            ConsoleCommand::History => println!("{}", self.history()),

            ConsoleCommand::Move { mv_string } => {
                let mv = self.game.play_uci(&mv_string)?;
                println!("{mv:?}");

                if self.game.is_over() {
                    println!("{}", self.game.verdict());
                    println!("{}", self.game.scoreboard());
                } else if self.game.is_in_check() {
                    println!("{} is in check", self.game.side_to_move().title());
                }
            }

            ConsoleCommand::Moves {
                square,
                debug,
                sort,
            } => println!("{}", self.moves(square, debug, sort)),

            ConsoleCommand::New { fen } => {
                self.game = if fen.is_empty() {
                    Game::default()
                } else {
                    Game::from_fen(&fen.join(" "))?
                };
            }

            ConsoleCommand::Perft { depth } => self.perft::<false>(depth),

            ConsoleCommand::Score => println!("{}", self.score()),

            ConsoleCommand::Splitperft { depth } => self.perft::<true>(depth),

            ConsoleCommand::Status => println!("{}", self.status()),
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Formats the moves played so far, numbered in pairs.
    fn history(&self) -> String {
        if self.game.history().is_empty() {
            return String::from("(none)");
        }

        self.game
            .history()
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| {
                let pair = pair.iter().map(|mv| mv.to_uci()).collect::<Vec<_>>();
                format!("{}. {}", i + 1, pair.join(" "))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Formats the legal moves of the side to move, or of the piece on `square`.
    fn moves(&self, square: Option<Square>, debug: bool, sort: bool) -> String {
        // Get the legal moves
        let moves = if let Some(square) = square {
            self.game.legal_moves_from(square)
        } else {
            self.game.legal_moves()
        };

        // If there are none, print "(none)"
        if moves.is_empty() {
            return String::from("(none)");
        }

        let mut moves = moves
            .into_iter()
            .map(|mv| {
                if debug {
                    format!("{mv:?}")
                } else {
                    mv.to_string()
                }
            })
            .collect::<Vec<_>>();

        if sort {
            moves.sort();
        }

        // Otherwise, join them by comma-space
        let sep = if debug { "\n" } else { ", " };
        moves.join(sep)
    }

    /// Describes whose turn it is and whether the game is over.
    fn status(&self) -> String {
        let side = self.game.side_to_move().title();

        if self.game.is_over() {
            format!("{}\n{}", self.game.verdict(), self.game.scoreboard())
        } else if self.game.is_in_check() {
            format!("{side} to move, in check")
        } else {
            format!("{side} to move")
        }
    }

    /// Formats both sides' scores and who is ahead.
    fn score(&self) -> String {
        let scores = self.game.scoreboard();
        match scores.leader() {
            Some(color) => format!("{scores}\n{} leads", color.title()),
            None => format!("{scores}\nScores are level"),
        }
    }

    /// Runs a perft (or a splitperft) and prints the total node count along with timing.
    fn perft<const SPLIT: bool>(&self, depth: usize) {
        let now = Instant::now();
        let nodes = perft_generic::<true, SPLIT>(&self.game, depth);
        let elapsed = now.elapsed();

        let nps = nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        println!("\n{nodes}");
        println!("Depth {depth}: {nodes} nodes in {elapsed:.1?} ({nps:.0} nodes/sec)");
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(Game::default())
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<ConsoleCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing console commands")?;

        // For ctrl + d
        if 0 == bytes {
            // Send the Exit command and exit this function
            sender
                .send(ConsoleCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            bail!("Console received input of 0 bytes and is quitting");
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match ConsoleCommand::try_parse_from(buf.split_ascii_whitespace()) {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to console")?,

            // `help` is an "error" according to Clap
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp) => println!("{err}"),

            Err(err) => {
                warn!("[CONSOLE] Rejected input {buf:?}");
                eprintln!("{err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Verdict;

    fn run(console: &mut Console, cmd: &str) -> Result<ControlFlow<()>> {
        console.execute(cmd.parse().unwrap())
    }

    #[test]
    fn test_console_plays_moves() {
        let mut console = Console::default();
        assert!(run(&mut console, "move e2e4").unwrap().is_continue());
        assert!(run(&mut console, "m e7e5").unwrap().is_continue());
        assert_eq!(console.game().history().len(), 2);
        assert_eq!(console.history(), "1. e2e4 e7e5");
    }

    #[test]
    fn test_console_reports_illegal_moves() {
        let mut console = Console::default();
        assert!(run(&mut console, "move e2e5").is_err());
        assert!(run(&mut console, "move nonsense").is_err());
        assert!(console.game().history().is_empty());
    }

    #[test]
    fn test_console_exit() {
        let mut console = Console::default();
        assert!(run(&mut console, "exit").unwrap().is_break());
    }

    #[test]
    fn test_console_new_game() {
        let mut console = Console::default();
        run(&mut console, "new 7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(console.game().verdict(), Verdict::Stalemate);
        assert_eq!(console.status(), "Stalemate - Draw!\nWhite: 9, Black: 0");

        run(&mut console, "new").unwrap();
        assert_eq!(console.game(), &Game::default());

        assert!(run(&mut console, "new not/a/fen").is_err());
    }

    #[test]
    fn test_console_score_names_leader() {
        let mut console = Console::default();
        assert_eq!(console.score(), "White: 39, Black: 39\nScores are level");

        for mv in ["e2e4", "d7d5", "e4d5"] {
            run(&mut console, &format!("move {mv}")).unwrap();
        }
        assert_eq!(console.score(), "White: 39, Black: 38\nWhite leads");
        assert!(run(&mut console, "score").unwrap().is_continue());
    }

    #[test]
    fn test_console_lists_moves() {
        let console = Console::default();
        assert_eq!(console.moves(Some(Square::new(7, 1)), false, true), "b1a3, b1c3");
        assert_eq!(console.moves(Some(Square::new(4, 4)), false, false), "(none)");
        assert_eq!(console.history(), "(none)");
    }
}
