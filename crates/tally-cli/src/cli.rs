//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tally_core::debt::PayoffStrategy;
use tally_core::models::{DebtType, Frequency, RecurringKind};

/// Tally - Track debts, budgets and cash flow
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Config file (defaults to TALLY_CONFIG, then the data dir, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status (path, size, encryption)
    Status,

    /// Show this month's overview
    Dashboard,

    /// Show plan limits and unlocked features
    Tier,

    /// Manage debts (list, add, update, remove, project, order, plan)
    Debts {
        #[command(subcommand)]
        action: Option<DebtsAction>,
    },

    /// Manage monthly budgets (list, add, remove, status)
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Record and list expenses
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Record and list income
    Income {
        #[command(subcommand)]
        action: Option<IncomeAction>,
    },

    /// Manage recurring expenses and income
    Recurring {
        #[command(subcommand)]
        action: Option<RecurringAction>,
    },

    /// Show notifications
    Notifications {
        /// Include notifications already read
        #[arg(short, long)]
        all: bool,

        #[command(subcommand)]
        action: Option<NotificationsAction>,
    },

    /// Export data to CSV (premium plans)
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        #[arg(long)]
        no_auth: bool,

        /// Directory of static files to serve (web UI)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum DebtsAction {
    /// List all debts
    List,

    /// Add a debt
    Add {
        /// Display name (e.g., "Visa")
        name: String,
        /// credit_card, student_loan, mortgage, auto_loan, personal_loan, medical, other
        #[arg(long = "type", default_value = "other")]
        debt_type: DebtType,
        /// Outstanding balance
        #[arg(long)]
        balance: f64,
        /// Annual interest rate in percent (18.5 = 18.5%)
        #[arg(long, default_value = "0")]
        rate: f64,
        /// Minimum monthly payment
        #[arg(long)]
        minimum: f64,
        /// Currency code (defaults to config)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Update a debt's balance, rate or minimum payment
    Update {
        /// Debt ID
        id: i64,
        #[arg(long)]
        balance: Option<f64>,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        minimum: Option<f64>,
    },

    /// Remove a debt
    Remove {
        /// Debt ID
        id: i64,
    },

    /// Project month-by-month payoff for one debt
    Project {
        /// Debt ID
        id: i64,
        /// Extra amount paid every month on top of the minimum
        #[arg(long, default_value = "0")]
        extra: f64,
        /// Schedule rows to print (0 = summary only)
        #[arg(long, default_value = "12")]
        rows: usize,
    },

    /// Show the order debts should be paid off in
    Order {
        /// avalanche (highest rate first) or snowball (smallest balance first)
        #[arg(short, long, default_value = "avalanche")]
        strategy: PayoffStrategy,
    },

    /// Compare avalanche and snowball plans for all debts
    Plan {
        /// Extra amount available every month
        #[arg(long, default_value = "0")]
        extra: f64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// List all budgets
    List,

    /// Add a monthly budget for a category
    Add {
        /// Expense category (matched exactly)
        category: String,
        /// Monthly limit
        #[arg(long)]
        limit: f64,
        /// Currency code (defaults to config)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Remove a budget
    Remove {
        /// Budget ID
        id: i64,
    },

    /// Show this month's status and fire any new threshold alerts
    Status,
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses, newest first
    List {
        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Maximum rows
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Record an expense (negative amount for a refund)
    Add {
        category: String,
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        description: Option<String>,
        /// Currency code (defaults to config)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Remove an expense
    Remove {
        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum IncomeAction {
    /// List income records
    List {
        /// From date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// To date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Record income
    Add {
        source: String,
        amount: f64,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Currency code (defaults to config)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Remove an income record
    Remove {
        /// Income ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum RecurringAction {
    /// List recurring rules
    List {
        /// Include paused rules
        #[arg(short, long)]
        all: bool,
    },

    /// Add a recurring expense or income
    Add {
        /// expense or income
        kind: RecurringKind,
        /// Display name (e.g., "Rent")
        name: String,
        amount: f64,
        /// daily, weekly, biweekly, monthly, quarterly, yearly
        #[arg(short, long, default_value = "monthly")]
        frequency: Frequency,
        /// Budget category (required for expenses)
        #[arg(short, long)]
        category: Option<String>,
        /// First occurrence (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Currency code (defaults to config)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Pause a rule
    Pause {
        /// Rule ID
        id: i64,
    },

    /// Resume a paused rule
    Resume {
        /// Rule ID
        id: i64,
    },

    /// Remove a rule (generated records are kept)
    Remove {
        /// Rule ID
        id: i64,
    },

    /// Create every occurrence due up to a date
    Run {
        /// Process up to this date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum NotificationsAction {
    /// Mark one notification as read
    Read {
        /// Notification ID
        id: i64,
    },

    /// Mark every notification as read
    ReadAll,
}

#[derive(Subcommand)]
pub enum ExportTarget {
    /// Export expenses
    Expenses {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Export a debt's payoff schedule
    Projection {
        /// Debt ID
        id: i64,
        /// Extra monthly payment
        #[arg(long, default_value = "0")]
        extra: f64,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
