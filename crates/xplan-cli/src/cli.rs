use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::common::{BasisArg, OutputFormat, PivotFormat};

#[derive(Parser, Debug)]
#[command(name = "xplan", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// Configuration file (defaults to ~/.xplan/config.toml)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Results backend base URL, overriding the configuration
    #[arg(long)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse expansion-plan scenarios
    Scenarios {
        #[command(subcommand)]
        command: ScenariosCommands,
    },
    /// Inspect study results
    Results {
        #[command(subcommand)]
        command: ResultsCommands,
    },
    /// List the metric catalog for a calculation basis
    Metrics {
        #[arg(long, value_enum, default_value_t = BasisArg::Yearly)]
        basis: BasisArg,
    },
    /// Import result spreadsheets
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },
    /// Backend datastore connection
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScenariosCommands {
    /// List scenarios known to the backend
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show scenario details
    Show {
        /// Scenario identifier
        id: i64,
    },
}

/// Query filters shared by the result subcommands.
#[derive(clap::Args, Debug, Clone)]
pub struct ResultFilter {
    /// Scenario identifier
    pub scenario: i64,

    /// Calculation basis (defaults to the configured basis)
    #[arg(long, value_enum)]
    pub basis: Option<BasisArg>,

    /// Restrict to one study year
    #[arg(long)]
    pub year: Option<i32>,

    /// Restrict to one solver iteration
    #[arg(long)]
    pub iteration: Option<u32>,
}

/// Sort and page controls shared by table-shaped output.
#[derive(clap::Args, Debug, Clone)]
pub struct ViewArgs {
    /// Column to sort by (field key, metric name or metric wire key)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// 1-based page number (clamped to the available pages)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page: 10, 20, 25, 50 or 100 (defaults to the configured size)
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum ResultsCommands {
    /// List the study years available for a scenario
    Years {
        /// Scenario identifier
        scenario: i64,
    },
    /// Flat result table
    Table {
        #[command(flatten)]
        filter: ResultFilter,

        #[command(flatten)]
        view: ViewArgs,

        /// Output format (defaults to a table, or the export format with --all)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Emit every row instead of one page
        #[arg(long)]
        all: bool,
    },
    /// One metric pivoted to build cycles x technologies
    Pivot {
        #[command(flatten)]
        filter: ResultFilter,

        /// Metric to pivot (display name or wire key; defaults to the first present)
        #[arg(long)]
        metric: Option<String>,

        #[command(flatten)]
        view: ViewArgs,

        #[arg(long, value_enum, default_value_t = PivotFormat::Table)]
        format: PivotFormat,
    },
    /// Capacity added and removed per unit
    Units {
        /// Scenario identifier
        scenario: i64,

        /// Restrict to one study year
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ImportCommands {
    /// Convert a result spreadsheet export (CSV) to JSON records
    Csv {
        /// Path to the CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output file path (JSON)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
}

/// Datastore connection settings.
#[derive(clap::Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Database server host name
    #[arg(long)]
    pub server: String,

    /// Database name
    #[arg(long)]
    pub database: String,

    /// SQL login; Windows authentication is used when omitted
    #[arg(long)]
    pub sql_user: Option<String>,

    /// SQL password
    #[arg(long, requires = "sql_user")]
    pub sql_password: Option<String>,

    /// Trust the server certificate without validation
    #[arg(long)]
    pub trust_cert: bool,

    /// Connection timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u32,
}

#[derive(Subcommand, Debug)]
pub enum DbCommands {
    /// Show whether the backend is connected
    Status,
    /// Show the active connection settings
    Current,
    /// Try connection settings without applying them
    Test(ConnectionArgs),
    /// Apply connection settings on the backend
    Configure(ConnectionArgs),
    /// Drop the backend's datastore connection
    Disconnect,
}

/// Build the clap command tree.
pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn parses_table_arguments() {
        let cli = Cli::try_parse_from([
            "xplan", "results", "table", "5", "--basis", "npv", "--sort", "Total Cost", "--desc",
            "--page-size", "10",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Results {
                command: ResultsCommands::Table { filter, view, .. },
            }) => {
                assert_eq!(filter.scenario, 5);
                assert_eq!(filter.basis, Some(BasisArg::Npv));
                assert_eq!(view.sort.as_deref(), Some("Total Cost"));
                assert!(view.desc);
                assert_eq!(view.page_size, Some(10));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn desc_requires_sort() {
        assert!(Cli::try_parse_from(["xplan", "results", "table", "5", "--desc"]).is_err());
    }
}
