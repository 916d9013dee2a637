use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use expman::cli::{LedgerCommand, NewRecord};
use expman::core::log::init_logging;
use expman::core::query::parse_month;
use expman::core::{RecordFilter, RecordKind};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Record an expense, credit card expense or income
    Add {
        /// expense, credit or income
        kind: RecordKind,
        amount: f64,
        category: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Date as YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a record
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Repeat an expense with today's date
    Duplicate { id: u64 },
    /// List records, newest first
    List {
        #[arg(short = 't', long = "type")]
        kind: Option<RecordKind>,
        #[arg(long)]
        category: Option<String>,
        /// YYYY-MM
        #[arg(short, long, value_parser = parse_month)]
        month: Option<NaiveDate>,
    },
    /// Display totals and balance
    Summary,
    /// List known categories
    Categories,
    /// Push the ledger to the server
    Sync,
    /// Interactive shell with background sync
    Shell,
}

impl From<Commands> for expman::AppCommand {
    fn from(cmd: Commands) -> expman::AppCommand {
        use expman::AppCommand::Ledger;
        match cmd {
            Commands::Add {
                kind,
                amount,
                category,
                description,
                date,
            } => Ledger(LedgerCommand::Add(NewRecord {
                kind,
                amount,
                category,
                description,
                date,
            })),
            Commands::Delete { id, yes } => Ledger(LedgerCommand::Delete { id, confirmed: yes }),
            Commands::Duplicate { id } => Ledger(LedgerCommand::Duplicate { id }),
            Commands::List {
                kind,
                category,
                month,
            } => Ledger(LedgerCommand::List(RecordFilter {
                kind,
                category,
                month,
            })),
            Commands::Summary => Ledger(LedgerCommand::Summary),
            Commands::Categories => Ledger(LedgerCommand::Categories),
            Commands::Sync => Ledger(LedgerCommand::Sync),
            Commands::Shell => expman::AppCommand::Shell,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => expman::cli::setup::setup_at_path(path),
            None => expman::cli::setup::setup(),
        },
        Some(cmd) => expman::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
