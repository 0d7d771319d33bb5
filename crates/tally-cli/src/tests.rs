//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::{NaiveDate, TimeZone, Utc};
use clap::Parser;
use tally_core::config::TallyConfig;
use tally_core::db::Database;
use tally_core::gating::SubscriptionTier;
use tally_core::models::{
    DebtType, Frequency, NewDebt, NewRecurringTransaction, NotificationType, RecurringKind,
};

use crate::cli::{Cli, Commands, DebtsAction, ExpensesAction};
use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn premium() -> TallyConfig {
    TallyConfig {
        tier: SubscriptionTier::Premium,
        ..Default::default()
    }
}

fn new_debt(name: &str, balance: f64, rate: f64, minimum: f64) -> NewDebt {
    NewDebt {
        name: name.to_string(),
        debt_type: DebtType::CreditCard,
        currency: "USD".to_string(),
        current_balance: balance,
        interest_rate: rate,
        minimum_payment: minimum,
    }
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_debts_add() {
    let cli = Cli::try_parse_from([
        "tally",
        "--no-encrypt",
        "debts",
        "add",
        "Visa",
        "--type",
        "credit-card",
        "--balance",
        "2500",
        "--rate",
        "19.9",
        "--minimum",
        "75",
    ])
    .unwrap();

    assert!(cli.no_encrypt);
    assert_eq!(cli.db.to_str(), Some("tally.db"));
    match cli.command {
        Commands::Debts {
            action:
                Some(DebtsAction::Add {
                    name,
                    debt_type,
                    balance,
                    ..
                }),
        } => {
            assert_eq!(name, "Visa");
            assert_eq!(debt_type, DebtType::CreditCard);
            assert_eq!(balance, 2500.0);
        }
        _ => panic!("Expected debts add"),
    }
}

#[test]
fn test_parse_refund_amount() {
    let cli = Cli::try_parse_from(["tally", "expenses", "add", "Shoes", "-40", "--date", "2026-02-03"])
        .unwrap();

    match cli.command {
        Commands::Expenses {
            action: Some(ExpensesAction::Add { amount, date, .. }),
        } => {
            assert_eq!(amount, -40.0);
            assert_eq!(date, Some(d(2026, 2, 3)));
        }
        _ => panic!("Expected expenses add"),
    }
}

#[test]
fn test_parse_rejects_unknown_strategy() {
    let result = Cli::try_parse_from(["tally", "debts", "order", "--strategy", "random"]);
    assert!(result.is_err());
}

// ========== Debt Command Tests ==========

#[test]
fn test_cmd_debts_add_and_list() {
    let db = setup_test_db();
    let config = TallyConfig::default();

    let id = commands::cmd_debts_add(&db, &config, new_debt("Visa", 2500.0, 19.9, 75.0)).unwrap();

    let debt = db.get_debt(id).unwrap().unwrap();
    assert_eq!(debt.name, "Visa");
    assert!(commands::cmd_debts_list(&db).is_ok());
}

#[test]
fn test_cmd_debts_add_free_tier_cap() {
    let db = setup_test_db();
    let config = TallyConfig::default();

    for i in 0..3 {
        commands::cmd_debts_add(&db, &config, new_debt(&format!("D{}", i), 100.0, 5.0, 10.0))
            .unwrap();
    }

    let result = commands::cmd_debts_add(&db, &config, new_debt("D3", 100.0, 5.0, 10.0));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("free plan allows 3"));
    assert_eq!(db.count_debts().unwrap(), 3);
}

#[test]
fn test_cmd_debts_add_invalid() {
    let db = setup_test_db();
    let result = commands::cmd_debts_add(
        &db,
        &TallyConfig::default(),
        new_debt("Bad", 100.0, 5.0, 0.0),
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_debts_update_paid_off() {
    let db = setup_test_db();
    let id = db.create_debt(&new_debt("Card", 300.0, 18.0, 50.0)).unwrap();

    commands::cmd_debts_update(&db, id, Some(0.0), None, None).unwrap();

    let debt = db.get_debt(id).unwrap().unwrap();
    assert_eq!(debt.current_balance, 0.0);
    assert_eq!(debt.interest_rate, 18.0);

    let notifications = db.list_notifications(false, 10).unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].notification_type, NotificationType::DebtMilestone);
}

#[test]
fn test_cmd_debts_update_not_found() {
    let db = setup_test_db();
    assert!(commands::cmd_debts_update(&db, 99, Some(1.0), None, None).is_err());
}

#[test]
fn test_cmd_debts_project() {
    let db = setup_test_db();
    let id = db.create_debt(&new_debt("Loan", 1200.0, 0.0, 100.0)).unwrap();

    let result = commands::cmd_debts_project(&db, &TallyConfig::default(), id, 0.0, 3, d(2026, 1, 1));
    assert!(result.is_ok());

    // Payment below interest still terminates
    let stuck = db.create_debt(&new_debt("Stuck", 10_000.0, 18.0, 100.0)).unwrap();
    let result = commands::cmd_debts_project(&db, &TallyConfig::default(), stuck, 0.0, 0, d(2026, 1, 1));
    assert!(result.is_ok());
}

#[test]
fn test_cmd_debts_order_and_plan() {
    let db = setup_test_db();
    db.create_debt(&new_debt("A", 5000.0, 20.0, 100.0)).unwrap();
    db.create_debt(&new_debt("B", 2000.0, 10.0, 50.0)).unwrap();

    assert!(commands::cmd_debts_order(&db, tally_core::PayoffStrategy::Snowball).is_ok());
    assert!(commands::cmd_debts_plan(&db, &TallyConfig::default(), 200.0).is_ok());
}

#[test]
fn test_cmd_debts_remove() {
    let db = setup_test_db();
    let id = db.create_debt(&new_debt("Gone", 10.0, 0.0, 10.0)).unwrap();

    commands::cmd_debts_remove(&db, id).unwrap();
    assert!(db.get_debt(id).unwrap().is_none());
    assert!(commands::cmd_debts_remove(&db, id).is_err());
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budgets_status_fires_alerts_once() {
    let db = setup_test_db();
    let config = TallyConfig::default();
    commands::cmd_budgets_add(&db, &config, "Dining", 200.0, None).unwrap();
    commands::cmd_expenses_add(&db, &config, "Dining", 190.0, d(2026, 6, 10), None, None).unwrap();

    let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
    commands::cmd_budgets_status(&db, &config, now).unwrap();
    // 50, 75 and 90
    assert_eq!(db.count_unread_notifications().unwrap(), 3);

    commands::cmd_budgets_status(&db, &config, now).unwrap();
    assert_eq!(db.count_unread_notifications().unwrap(), 3);
}

#[test]
fn test_cmd_budgets_status_alerts_disabled() {
    let db = setup_test_db();
    let mut config = TallyConfig::default();
    config.alerts.enabled = false;
    commands::cmd_budgets_add(&db, &config, "Dining", 100.0, None).unwrap();
    commands::cmd_expenses_add(&db, &config, "Dining", 150.0, d(2026, 6, 10), None, None).unwrap();

    let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
    commands::cmd_budgets_status(&db, &config, now).unwrap();
    assert_eq!(db.count_unread_notifications().unwrap(), 0);
}

#[test]
fn test_cmd_budgets_add_duplicate() {
    let db = setup_test_db();
    let config = TallyConfig::default();
    commands::cmd_budgets_add(&db, &config, "Fuel", 80.0, None).unwrap();
    assert!(commands::cmd_budgets_add(&db, &config, "Fuel", 90.0, None).is_err());
}

// ========== Expense / Income Command Tests ==========

#[test]
fn test_cmd_expenses_list_filters() {
    let db = setup_test_db();
    let config = TallyConfig::default();
    commands::cmd_expenses_add(&db, &config, "Coffee", 4.5, d(2026, 3, 2), Some("Latte"), None)
        .unwrap();

    assert!(commands::cmd_expenses_list(&db, Some("2026-03"), Some("Coffee"), 20).is_ok());
    assert!(commands::cmd_expenses_list(&db, Some("2026-13"), None, 20).is_err());
}

#[test]
fn test_cmd_expenses_default_currency() {
    let db = setup_test_db();
    let config = TallyConfig {
        default_currency: "EUR".to_string(),
        ..Default::default()
    };

    let id = commands::cmd_expenses_add(&db, &config, "Food", 10.0, d(2026, 1, 5), None, None)
        .unwrap();
    assert_eq!(db.get_expense(id).unwrap().unwrap().currency, "EUR");
}

#[test]
fn test_cmd_income_add_and_remove() {
    let db = setup_test_db();
    let id = commands::cmd_income_add(
        &db,
        &TallyConfig::default(),
        "Salary",
        3000.0,
        d(2026, 4, 1),
        None,
    )
    .unwrap();

    assert!(commands::cmd_income_list(&db, None, None).is_ok());
    commands::cmd_income_remove(&db, id).unwrap();
    assert!(db.list_incomes(None, None).unwrap().is_empty());
}

// ========== Recurring Command Tests ==========

#[test]
fn test_cmd_recurring_run_and_pause() {
    let db = setup_test_db();
    let config = TallyConfig::default();
    let id = commands::cmd_recurring_add(
        &db,
        &config,
        NewRecurringTransaction {
            kind: RecurringKind::Income,
            name: "Paycheck".to_string(),
            category: None,
            amount: 1500.0,
            currency: "USD".to_string(),
            frequency: Frequency::Biweekly,
            start_date: d(2026, 1, 2),
        },
    )
    .unwrap();

    let summary = commands::cmd_recurring_run(&db, &config, d(2026, 1, 30)).unwrap();
    // Jan 2, 16, 30
    assert_eq!(summary.incomes_created, 3);

    commands::cmd_recurring_set_active(&db, id, false).unwrap();
    let summary = commands::cmd_recurring_run(&db, &config, d(2026, 3, 1)).unwrap();
    assert_eq!(summary.total_created(), 0);

    assert!(commands::cmd_recurring_list(&db, true).is_ok());
}

#[test]
fn test_cmd_recurring_remove_keeps_records() {
    let db = setup_test_db();
    let config = TallyConfig::default();
    let id = commands::cmd_recurring_add(
        &db,
        &config,
        NewRecurringTransaction {
            kind: RecurringKind::Expense,
            name: "Gym".to_string(),
            category: Some("Health".to_string()),
            amount: 40.0,
            currency: "USD".to_string(),
            frequency: Frequency::Monthly,
            start_date: d(2026, 1, 1),
        },
    )
    .unwrap();
    commands::cmd_recurring_run(&db, &config, d(2026, 2, 1)).unwrap();

    commands::cmd_recurring_remove(&db, id).unwrap();

    let expenses = db
        .list_expenses(&tally_core::ExpenseFilter::default())
        .unwrap();
    assert_eq!(expenses.len(), 2);
    assert!(expenses.iter().all(|e| e.recurring_id.is_none()));
}

// ========== Notification Command Tests ==========

#[test]
fn test_cmd_notifications_read_all() {
    let db = setup_test_db();
    let id = db.create_debt(&new_debt("Card", 50.0, 10.0, 10.0)).unwrap();
    db.update_debt(id, &new_debt("Card", 0.0, 10.0, 10.0)).unwrap();

    assert!(commands::cmd_notifications_list(&db, false).is_ok());
    assert_eq!(commands::cmd_notifications_read_all(&db).unwrap(), 1);
    assert_eq!(db.count_unread_notifications().unwrap(), 0);
    assert!(commands::cmd_notifications_read(&db, 999).is_err());
}

// ========== Export Command Tests ==========

#[test]
fn test_cmd_export_requires_premium() {
    let db = setup_test_db();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.csv");

    let result =
        commands::cmd_export_expenses(&db, &TallyConfig::default(), Some(&path), None, None);
    assert!(result.is_err());
    assert!(!path.exists());
}

#[test]
fn test_cmd_export_expenses_to_file() {
    let db = setup_test_db();
    let config = premium();
    commands::cmd_expenses_add(&db, &config, "Books", 12.0, d(2026, 5, 5), None, None).unwrap();
    commands::cmd_expenses_add(&db, &config, "Books", 8.0, d(2026, 6, 5), None, None).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("may.csv");
    let count =
        commands::cmd_export_expenses(&db, &config, Some(&path), Some("2026-05"), None).unwrap();

    assert_eq!(count, 1);
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("date,category,amount,currency,description,recurring"));
    assert!(content.contains("2026-05-05,Books,12.00,USD"));
}

#[test]
fn test_cmd_export_projection_to_file() {
    let db = setup_test_db();
    let id = db.create_debt(&new_debt("Loan", 300.0, 0.0, 100.0)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.csv");
    let count =
        commands::cmd_export_projection(&db, &premium(), id, 0.0, Some(&path), d(2026, 1, 1))
            .unwrap();

    assert_eq!(count, 3);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 4);
}

// ========== Status / Helper Tests ==========

#[test]
fn test_cmd_dashboard_and_tier() {
    let db = setup_test_db();
    assert!(commands::cmd_dashboard(&db, &TallyConfig::default(), d(2026, 1, 15)).is_ok());
    assert!(commands::cmd_tier(&premium()).is_ok());
}

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("init.db");

    commands::cmd_init(&path, true).unwrap();

    assert!(path.exists());
    let conn = rusqlite::Connection::open(&path).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('debts', 'budgets', 'budget_alert_log')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 3);
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer name", 10), "a much ...");
    assert_eq!(truncate("café au lait", 6), "caf...");
}
