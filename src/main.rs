//! Gridduel - match server entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use gridduel::{Board, Coordinator, Leaderboard, Seat, bot, detect_draw, detect_win};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host } => run_server(host, port).await,
        Command::Solo => run_solo(),
    }
}

/// Run the WebSocket match server
async fn run_server(host: String, port: u16) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting gridduel match server");

    let coordinator = Coordinator::new(Leaderboard::new());
    gridduel::serve(&host, port, coordinator).await
}

/// Play against the scripted opponent on stdin/stdout.
///
/// The human holds the first seat and moves first; cells are entered by
/// their 1-based index as shown on the board.
fn run_solo() -> Result<()> {
    let mut board = Board::new();
    println!("You are X. Enter a cell number to claim it.\n");

    loop {
        println!("{}\n", board.display());

        let cell = match prompt_cell(&board)? {
            Some(cell) => cell,
            None => {
                println!("Bye!");
                return Ok(());
            }
        };
        if board.place(cell, Seat::First).is_err() {
            println!("That cell is taken.");
            continue;
        }
        if announce_end(&board) {
            return Ok(());
        }

        match bot::choose_move(&board, Seat::Second) {
            Some(reply) => {
                println!("Opponent takes cell {}.", reply + 1);
                if board.place(reply, Seat::Second).is_err() {
                    continue;
                }
            }
            None => continue,
        }
        if announce_end(&board) {
            return Ok(());
        }
    }
}

/// Reads a 1-based cell index from stdin; `None` means quit.
fn prompt_cell(board: &Board) -> Result<Option<usize>> {
    loop {
        print!("Your move (1-9, q to quit): ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match line.parse::<usize>() {
            Ok(number) if (1..=9).contains(&number) && board.is_empty(number - 1) => {
                return Ok(Some(number - 1));
            }
            _ => println!("Pick a free cell between 1 and 9."),
        }
    }
}

/// Prints the result if the round is over; returns whether it was.
fn announce_end(board: &Board) -> bool {
    if let Some(win) = detect_win(board) {
        println!("{}\n", board.display());
        match win.seat {
            Seat::First => println!("You win!"),
            Seat::Second => println!("The opponent wins."),
        }
        true
    } else if detect_draw(board) {
        println!("{}\n", board.display());
        println!("It's a draw.");
        true
    } else {
        false
    }
}
