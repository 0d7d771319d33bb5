//! Status-related command implementations (status, dashboard, tier)

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use tally_core::config::TallyConfig;
use tally_core::db::Database;
use tally_core::gating::FeatureGate;

use super::{money, open_db};

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use std::fs;
    use tally_core::db::DB_KEY_ENV;

    println!();
    println!("📊 Tally Status");
    println!("   ─────────────────────────────────────────────────────────────");

    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => {
                println!();
                if let Ok(debts) = db.count_debts() {
                    println!("   Debts: {}", debts);
                }
                if let Ok(budgets) = db.count_budgets() {
                    println!("   Budgets: {}", budgets);
                }
                if let Ok(rules) = db.count_recurring() {
                    println!("   Active recurring rules: {}", rules);
                }
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                } else if has_key {
                    println!("      (Check if {} is correct)", DB_KEY_ENV);
                }
            }
        }
    }

    println!();
    Ok(())
}

pub fn cmd_dashboard(db: &Database, config: &TallyConfig, today: NaiveDate) -> Result<()> {
    let stats = db.get_dashboard_stats(today)?;
    let currency = config.default_currency.as_str();

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           💰 Tally Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", today.format("%B %Y"));
    println!();
    println!("  Income:          {}", money(stats.month_income, currency));
    println!("  Spending:        {}", money(stats.month_spending, currency));
    if stats.net_cash_flow < 0.0 {
        println!("  📉 Net:           {}", money(stats.net_cash_flow, currency));
    } else {
        println!("  📈 Net:           {}", money(stats.net_cash_flow, currency));
    }
    println!();
    println!("  💳 Debts: {}", stats.debt_count);
    println!("     Total owed:    {}", money(stats.total_debt, currency));
    println!(
        "     Minimums/mo:   {}",
        money(stats.total_minimum_payments, currency)
    );
    println!();
    println!("  📋 Budgets: {}", stats.budget_count);
    if stats.budgets_over_limit > 0 {
        println!("     ⚠️  Over limit: {}", stats.budgets_over_limit);
    }
    println!("  🔁 Active recurring rules: {}", stats.active_recurring);
    println!();

    if stats.unread_notifications > 0 {
        println!(
            "  🔔 {} unread notifications. Run 'tally notifications' to see them.",
            stats.unread_notifications
        );
    }

    Ok(())
}

pub fn cmd_tier(config: &TallyConfig) -> Result<()> {
    let summary = FeatureGate::for_tier(config.tier).summary();
    let cap = |limit: Option<usize>| {
        limit
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unlimited".to_string())
    };

    println!();
    println!("🎟️  Plan: {}", summary.tier);
    println!("   ─────────────────────────────");
    println!("   Budgets:         {}", cap(summary.max_budgets));
    println!("   Debts:           {}", cap(summary.max_debts));
    println!("   Recurring rules: {}", cap(summary.max_recurring_rules));
    let features = if summary.features.is_empty() {
        "none".to_string()
    } else {
        summary.features.join(", ")
    };
    println!("   Features:        {}", features);
    println!();

    Ok(())
}
