use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "event admission and seeding backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema
    Setup {
        /// Drop existing tables first (destroys all events and registrations)
        #[arg(long)]
        reset: bool,
    },
    /// Compute next-phase seeding from a JSON file of phase results or games
    Rank {
        /// Path to the JSON input
        #[arg(short, long)]
        input: PathBuf,
        /// Comma-separated tie-break chain, e.g. wins,point_differential,points_for
        #[arg(short, long)]
        criteria: Option<String>,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
