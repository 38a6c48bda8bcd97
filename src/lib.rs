pub mod admission;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod seeding;
pub mod services;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::seeding::SeedingService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env()?;
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_setup(reset: bool) -> Result<()> {
    let config = AppConfig::from_env()?;
    let pool = database::create_pool(&config.database)?;
    let conn = database::get_connection(&pool)?;

    if reset {
        database::setup::reset_database(&conn)
    } else {
        database::setup::initialize_schema(&conn)
    }
}

pub fn handle_rank(input: &Path, criteria: Option<&str>) -> Result<()> {
    let config = AppConfig::from_env()?;
    let criteria = criteria.map(seeding::parse_criteria_list).transpose()?;
    let service = SeedingService::new(&config.seeding, criteria);
    service.run(input).map(|_| ())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}
