use anyhow::Result;

use padel_tournament::cli::Command;
use padel_tournament::{
    handle_completions, handle_match, handle_player, handle_round, handle_serve, handle_settings,
    handle_standings, handle_tournament, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
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
        Command::Player { command } => handle_player(command),
        Command::Tournament { command } => handle_tournament(command),
        Command::Round { command } => handle_round(command),
        Command::Match { command } => handle_match(command),
        Command::Standings(args) => handle_standings(args),
        Command::Settings { command } => handle_settings(command),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
