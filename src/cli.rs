//! Command-line interface for gridduel.

use clap::{Parser, Subcommand};

/// Gridduel - real-time tic-tac-toe match server
#[derive(Parser, Debug)]
#[command(name = "gridduel")]
#[command(about = "Two-player tic-tac-toe matches over WebSocket", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the match server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Play the scripted opponent on the terminal, no server involved
    Solo,
}
