/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{Context, Result};
use caissa::{Cli, Console, ConsoleCommand, Game};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log.as_deref()).and_then(|_| run(cli)) {
        eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
        std::process::exit(1);
    }
}

/// Installs a subscriber that writes log events to `stderr`, keeping `stdout` free for console output.
fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log filter {directives:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Sets up the starting position, queues any startup commands, and hands control to the console.
fn run(cli: Cli) -> Result<()> {
    let game = match cli.fen.as_deref() {
        Some(fen) => Game::from_fen(fen).context("Invalid starting position")?,
        None => Game::default(),
    };

    let mut console = Console::new(game);

    for command in &cli.commands {
        match command.parse::<ConsoleCommand>() {
            Ok(cmd) => console.send_command(cmd)?,
            Err(e) => eprintln!("ERROR on startup command {command:?}:\n{e}"),
        }
    }

    console.run()
}
