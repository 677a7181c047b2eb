use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;
use xplan_cli::cli::{Cli, Commands};

mod commands;

use commands::Session;

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Metrics { basis }) => commands::metrics::handle(*basis),
        Some(Commands::Import { command }) => commands::import::handle(command),
        Some(Commands::Scenarios { command }) => {
            commands::scenarios::handle(&Session::open(cli)?, command)
        }
        Some(Commands::Results { command }) => {
            commands::results::handle(&Session::open(cli)?, command)
        }
        Some(Commands::Db { command }) => commands::db::handle(&Session::open(cli)?, command),
        None => {
            info!("No subcommand provided. Use `xplan --help` for more information.");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install log subscriber: {e}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
