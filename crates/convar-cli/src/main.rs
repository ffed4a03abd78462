//! Convar CLI
//!
//! Command-line host for the console command system

use clap::{Parser, Subcommand};
use convar_core::logging_facility::init;
use convar_core::CommandSystemConfig;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "convar")]
#[command(about = "Convar - console commands and variables", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run console scripts against the demo console
    Run(commands::run::RunArgs),
    /// Read console lines from stdin
    Repl(commands::repl::ReplArgs),
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match CommandSystemConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => CommandSystemConfig::default(),
    };

    init(config.logging.profile);

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args, &config),
        Commands::Repl(args) => commands::repl::execute(args, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
