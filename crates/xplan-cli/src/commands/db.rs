use anyhow::{bail, Result};
use xplan_io::api::{DatabaseConfig, DatabaseOperationResult};
use xplan_ui_common::database::failure_message;

use super::Session;
use xplan_cli::cli::{ConnectionArgs, DbCommands};

pub fn handle(session: &Session, command: &DbCommands) -> Result<()> {
    let database = session.service().database();
    let outcome = match command {
        DbCommands::Status => return status(session),
        DbCommands::Current => return current(session),
        DbCommands::Test(args) => session.block_on(database.test(connection(args))),
        DbCommands::Configure(args) => session.block_on(database.configure(connection(args))),
        DbCommands::Disconnect => session.block_on(database.disconnect()),
    };

    match outcome {
        Ok(DatabaseOperationResult {
            success: true,
            message,
        }) => {
            println!("{message}");
            Ok(())
        }
        Ok(DatabaseOperationResult { message, .. }) => bail!(message),
        Err(e) => bail!(failure_message(&e)),
    }
}

fn status(session: &Session) -> Result<()> {
    let status = match session.block_on(session.service().database().status()) {
        Ok(status) => status,
        Err(e) => bail!(failure_message(&e)),
    };

    let state = if status.is_connected {
        "connected"
    } else {
        "disconnected"
    };
    println!("Database: {state}");
    if let (Some(server), Some(db)) = (&status.server_name, &status.database_name) {
        println!("  {server} / {db}");
    }
    if let Some(message) = &status.message {
        println!("  {message}");
    }
    Ok(())
}

fn current(session: &Session) -> Result<()> {
    match session.block_on(session.service().database().current()) {
        Ok(Some(config)) => print_config(&config),
        Ok(None) => println!("No database configured"),
        Err(e) => bail!(failure_message(&e)),
    }
    Ok(())
}

fn connection(args: &ConnectionArgs) -> DatabaseConfig {
    let config = match &args.sql_user {
        Some(user) => DatabaseConfig::sql(
            &args.server,
            &args.database,
            user,
            args.sql_password.clone().unwrap_or_default(),
        ),
        None => DatabaseConfig::windows(&args.server, &args.database),
    };
    config
        .with_trust_server_certificate(args.trust_cert)
        .with_timeout(args.timeout)
}

fn print_config(config: &DatabaseConfig) {
    println!("Server              : {}", config.server_name);
    println!("Database            : {}", config.database_name);
    match (&config.username, config.use_windows_authentication) {
        (_, true) => println!("Authentication      : Windows"),
        (Some(user), false) => println!("Authentication      : SQL ({user})"),
        (None, false) => println!("Authentication      : SQL"),
    }
    println!("Trust certificate   : {}", config.trust_server_certificate);
    println!("Connection timeout  : {}s", config.connection_timeout);
}
