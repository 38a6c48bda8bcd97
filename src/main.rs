use anyhow::Result;

use event_admission::cli::Command;
use event_admission::{handle_completions, handle_rank, handle_serve, handle_setup, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Setup { reset } => handle_setup(*reset),
        Command::Rank { input, criteria } => handle_rank(input, criteria.as_deref()),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
