//! Recurring rule command implementations

use anyhow::Result;
use chrono::NaiveDate;
use tally_core::config::TallyConfig;
use tally_core::db::{Database, RecurringRunSummary};
use tally_core::gating::{FeatureGate, Resource};
use tally_core::models::NewRecurringTransaction;

use super::{money, truncate};

pub fn cmd_recurring_list(db: &Database, include_inactive: bool) -> Result<()> {
    let rules = db.list_recurring(include_inactive)?;

    if rules.is_empty() {
        println!("No recurring rules. Add one with:");
        println!("  tally recurring add expense Rent 1200 --category Housing");
        return Ok(());
    }

    println!();
    println!("🔁 Recurring");
    println!("   ─────────────────────────────────────────────────────────────");
    for rule in &rules {
        let state = if rule.active { "" } else { " (paused)" };
        println!(
            "   {:>4}  {:<7} {:<20} {:>14} {:<9} next {}{}",
            rule.id,
            rule.kind,
            truncate(&rule.name, 20),
            money(rule.amount, &rule.currency),
            rule.frequency,
            rule.next_date,
            state
        );
    }

    Ok(())
}

/// Add a rule, subject to the plan's recurring-rule cap
pub fn cmd_recurring_add(
    db: &Database,
    config: &TallyConfig,
    rule: NewRecurringTransaction,
) -> Result<i64> {
    FeatureGate::for_tier(config.tier)
        .check_create(Resource::RecurringRules, db.count_recurring()?)?;

    let id = db.create_recurring(&rule)?;

    println!(
        "✅ Added {} {} '{}' (ID: {}), first on {}",
        rule.frequency, rule.kind, rule.name, id, rule.start_date
    );
    Ok(id)
}

pub fn cmd_recurring_set_active(db: &Database, id: i64, active: bool) -> Result<()> {
    db.set_recurring_active(id, active)?;
    if active {
        println!("▶️  Resumed recurring rule {}", id);
    } else {
        println!("⏸️  Paused recurring rule {}", id);
    }
    Ok(())
}

pub fn cmd_recurring_remove(db: &Database, id: i64) -> Result<()> {
    db.delete_recurring(id)?;
    println!("✅ Removed recurring rule {} (generated records kept)", id);
    Ok(())
}

pub fn cmd_recurring_run(
    db: &Database,
    config: &TallyConfig,
    today: NaiveDate,
) -> Result<RecurringRunSummary> {
    println!("🔁 Processing recurring rules due by {}...", today);

    let summary = db.process_due_recurring(today, config.recurring.max_catch_up)?;

    println!("   Rules processed:  {}", summary.rules_processed);
    println!("   Expenses created: {}", summary.expenses_created);
    println!("   Income created:   {}", summary.incomes_created);
    if summary.rules_capped > 0 {
        println!(
            "   ⚠️  {} rules hit the catch-up limit ({}); run again to continue",
            summary.rules_capped, config.recurring.max_catch_up
        );
    }

    Ok(summary)
}
