pub mod cli;
pub mod common;

pub use cli::{
    build_cli_command, Cli, Commands, DbCommands, ImportCommands, ResultsCommands,
    ScenariosCommands,
};
