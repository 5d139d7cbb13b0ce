/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::Parser;

use crate::Square;

/// Command-line arguments for the `caissa` console.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Start from this FEN string instead of the standard starting position.
    #[arg(short, long)]
    pub fen: Option<String>,

    /// Filter for log output, such as `debug` or `caissa=trace`.
    ///
    /// Falls back to the `RUST_LOG` environment variable, and then to `warn`.
    #[arg(short, long)]
    pub log: Option<String>,

    /// Console commands to execute on startup, before reading from `stdin`.
    ///
    /// May be given more than once, such as `-c "move e2e4" -c display`.
    #[arg(short, long = "command")]
    pub commands: Vec<String>,
}

/// A command to be sent to the console.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<CONSOLE COMMAND>")
)]
pub enum ConsoleCommand {
    /// Print a visual representation of the current game.
    #[command(alias = "d")]
    Display {
        /// If set, pieces are drawn with their Unicode chess symbols.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Quit the console.
    #[command(alias = "quit")]
    Exit,

    /// Generate and print a FEN string for the current position.
    Fen,

    /// Print every move played so far.
    History,

    /// Play the provided move, if it is legal, such as `e2e4` or `e7e8q`.
    #[command(alias = "m")]
    Move { mv_string: String },

    /// Shows all legal moves in the current position, or for a specific piece.
    Moves {
        square: Option<Square>,

        /// If set, moves will be printed using their debug formatter, which displays what kind of move it is (quiet, en passant, etc.).
        #[arg(short, long, default_value = "false")]
        debug: bool,

        /// If set, moves will be sorted in alphabetical order.
        ///
        /// By default, moves are generated in no particular order.
        #[arg(short, long, default_value = "false")]
        sort: bool,
    },

    /// Start a new game, from the provided FEN string or the standard starting position.
    New { fen: Vec<String> },

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Print both sides' scores and who is ahead.
    Score,

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Print whose turn it is, whether they are in check, and whether the game is over.
    Status,
}

impl FromStr for ConsoleCommand {
    type Err = clap::Error;
    /// Attempt to parse a [`ConsoleCommand`] from a whitespace-separated string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}
