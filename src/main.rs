#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use assetctl::cli::{Cli, Commands, ConfigCommands};
use assetctl::commands;
use assetctl::config::Config;
use assetctl::logging;
use assetctl::project::Project;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let project = Project::detect()?;

    // Validation reports broken config files instead of failing on them
    if let Commands::Config {
        command: ConfigCommands::Validate { file },
    } = &cli.command
    {
        commands::config::validate(&project, file.as_deref())?;
        return Ok(());
    }

    let config = Config::load(project.root())?.with_cli_overrides(&cli);
    logging::init_logging(&config.logging)?;

    match &cli.command {
        Commands::Search(cmd) => commands::search::execute(&project, &config, cmd)?,
        Commands::Install(cmd) => commands::install::execute(&project, &config, cmd)?,
        Commands::List(cmd) => commands::list::execute(&project, &config, cmd)?,
        Commands::Config { command } => commands::config::execute(&project, &config, command)?,
    }

    Ok(())
}
