use anyhow::Result;
use clap::{Parser, Subcommand};

use finledger::cli::{
    handle_account_command, handle_budget_command, handle_category_command, handle_goal_command,
    handle_report_command, handle_transaction_command, handle_user_command, resolve_acting_user,
};
use finledger::config::{paths::LedgerPaths, settings::Settings};
use finledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "finledger",
    version,
    about = "Multi-user personal-finance ledger",
    long_about = "finledger records income and expenses against accounts, keeps every \
                  balance consistent with its transactions, and tracks budgets and \
                  savings goals from the command line."
)]
struct Cli {
    /// Acting user (ID or name)
    #[arg(short, long, global = true, env = "FINLEDGER_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    #[command(subcommand)]
    User(finledger::cli::UserCommands),

    /// Account management commands
    #[command(subcommand)]
    Account(finledger::cli::AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(finledger::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, name = "txn", alias = "transaction")]
    Transaction(finledger::cli::TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(finledger::cli::BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(finledger::cli::GoalCommands),

    /// Generate a report over a date range
    Report(finledger::cli::ReportArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    finledger::init_tracing_with(&settings.log_filter);

    // Initialize storage
    let storage = Storage::open(paths.clone())?;

    let user = cli.user.as_deref();

    match cli.command {
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, cmd)?;
        }
        Some(Commands::Account(cmd)) => {
            let owner = resolve_acting_user(&storage, user)?;
            handle_account_command(&storage, &settings, owner, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            let owner = resolve_acting_user(&storage, user)?;
            handle_transaction_command(&storage, owner, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            let owner = resolve_acting_user(&storage, user)?;
            handle_budget_command(&storage, owner, cmd)?;
        }
        Some(Commands::Goal(cmd)) => {
            let owner = resolve_acting_user(&storage, user)?;
            handle_goal_command(&storage, owner, cmd)?;
        }
        Some(Commands::Report(args)) => {
            let owner = resolve_acting_user(&storage, user)?;
            handle_report_command(&storage, owner, args)?;
        }
        Some(Commands::Config) => {
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }

            println!("finledger Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:      {}", settings.currency_symbol);
            println!("  Date format:          {}", settings.date_format);
            println!("  Default account type: {}", settings.default_account_type);
            println!("  Log filter:           {}", settings.log_filter);
        }
        None => {
            println!("finledger - multi-user personal-finance ledger");
            println!();
            println!("Run 'finledger --help' for usage information.");
            println!("Run 'finledger user add <name>' to get started.");
        }
    }

    Ok(())
}
