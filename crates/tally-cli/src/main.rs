//! Tally CLI - Personal finance tracker
//!
//! Usage:
//!   tally init                       Initialize database
//!   tally debts add NAME --balance   Track a debt
//!   tally debts plan --extra 200     Compare avalanche and snowball
//!   tally budgets status             Check budgets and fire alerts
//!   tally serve --port 3000          Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use chrono::{Local, Utc};
use clap::Parser;
use tally_core::models::{NewDebt, NewRecurringTransaction};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Dashboard => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_dashboard(&db, &config, today)
        }
        Commands::Tier => commands::cmd_tier(&config),
        Commands::Debts { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(DebtsAction::List) => commands::cmd_debts_list(&db),
                Some(DebtsAction::Add {
                    name,
                    debt_type,
                    balance,
                    rate,
                    minimum,
                    currency,
                }) => {
                    let debt = NewDebt {
                        name,
                        debt_type,
                        currency: currency.unwrap_or_else(|| config.default_currency.clone()),
                        current_balance: balance,
                        interest_rate: rate,
                        minimum_payment: minimum,
                    };
                    commands::cmd_debts_add(&db, &config, debt).map(|_| ())
                }
                Some(DebtsAction::Update {
                    id,
                    balance,
                    rate,
                    minimum,
                }) => commands::cmd_debts_update(&db, id, balance, rate, minimum),
                Some(DebtsAction::Remove { id }) => commands::cmd_debts_remove(&db, id),
                Some(DebtsAction::Project { id, extra, rows }) => {
                    commands::cmd_debts_project(&db, &config, id, extra, rows, today)
                }
                Some(DebtsAction::Order { strategy }) => commands::cmd_debts_order(&db, strategy),
                Some(DebtsAction::Plan { extra }) => commands::cmd_debts_plan(&db, &config, extra),
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(BudgetsAction::List) => commands::cmd_budgets_list(&db),
                Some(BudgetsAction::Add {
                    category,
                    limit,
                    currency,
                }) => commands::cmd_budgets_add(&db, &config, &category, limit, currency.as_deref())
                    .map(|_| ()),
                Some(BudgetsAction::Remove { id }) => commands::cmd_budgets_remove(&db, id),
                Some(BudgetsAction::Status) => commands::cmd_budgets_status(&db, &config, Utc::now()),
            }
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_expenses_list(&db, None, None, 20),
                Some(ExpensesAction::List {
                    month,
                    category,
                    limit,
                }) => commands::cmd_expenses_list(&db, month.as_deref(), category.as_deref(), limit),
                Some(ExpensesAction::Add {
                    category,
                    amount,
                    date,
                    description,
                    currency,
                }) => commands::cmd_expenses_add(
                    &db,
                    &config,
                    &category,
                    amount,
                    date.unwrap_or(today),
                    description.as_deref(),
                    currency.as_deref(),
                )
                .map(|_| ()),
                Some(ExpensesAction::Remove { id }) => commands::cmd_expenses_remove(&db, id),
            }
        }
        Commands::Income { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_income_list(&db, None, None),
                Some(IncomeAction::List { from, to }) => commands::cmd_income_list(&db, from, to),
                Some(IncomeAction::Add {
                    source,
                    amount,
                    date,
                    currency,
                }) => commands::cmd_income_add(
                    &db,
                    &config,
                    &source,
                    amount,
                    date.unwrap_or(today),
                    currency.as_deref(),
                )
                .map(|_| ()),
                Some(IncomeAction::Remove { id }) => commands::cmd_income_remove(&db, id),
            }
        }
        Commands::Recurring { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_recurring_list(&db, false),
                Some(RecurringAction::List { all }) => commands::cmd_recurring_list(&db, all),
                Some(RecurringAction::Add {
                    kind,
                    name,
                    amount,
                    frequency,
                    category,
                    start,
                    currency,
                }) => {
                    let rule = NewRecurringTransaction {
                        kind,
                        name,
                        category,
                        amount,
                        currency: currency.unwrap_or_else(|| config.default_currency.clone()),
                        frequency,
                        start_date: start.unwrap_or(today),
                    };
                    commands::cmd_recurring_add(&db, &config, rule).map(|_| ())
                }
                Some(RecurringAction::Pause { id }) => {
                    commands::cmd_recurring_set_active(&db, id, false)
                }
                Some(RecurringAction::Resume { id }) => {
                    commands::cmd_recurring_set_active(&db, id, true)
                }
                Some(RecurringAction::Remove { id }) => commands::cmd_recurring_remove(&db, id),
                Some(RecurringAction::Run { date }) => {
                    commands::cmd_recurring_run(&db, &config, date.unwrap_or(today)).map(|_| ())
                }
            }
        }
        Commands::Notifications { all, action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_notifications_list(&db, all),
                Some(NotificationsAction::Read { id }) => commands::cmd_notifications_read(&db, id),
                Some(NotificationsAction::ReadAll) => {
                    commands::cmd_notifications_read_all(&db).map(|_| ())
                }
            }
        }
        Commands::Export { target } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match target {
                ExportTarget::Expenses {
                    output,
                    month,
                    category,
                } => commands::cmd_export_expenses(
                    &db,
                    &config,
                    output.as_deref(),
                    month.as_deref(),
                    category.as_deref(),
                )
                .map(|_| ()),
                ExportTarget::Projection { id, extra, output } => {
                    commands::cmd_export_projection(&db, &config, id, extra, output.as_deref(), today)
                        .map(|_| ())
                }
            }
        }
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                config,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
    }
}
