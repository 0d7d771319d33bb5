//! Budget command implementations

use anyhow::Result;
use chrono::{DateTime, Utc};
use tally_core::budget::StatusTier;
use tally_core::config::TallyConfig;
use tally_core::db::Database;
use tally_core::gating::{FeatureGate, Resource};
use tally_core::models::NewBudget;

use super::{money, truncate};

pub fn cmd_budgets_list(db: &Database) -> Result<()> {
    let budgets = db.list_budgets()?;

    if budgets.is_empty() {
        println!("No budgets yet. Add one with:");
        println!("  tally budgets add Groceries --limit 400");
        return Ok(());
    }

    println!();
    println!("📋 Budgets");
    println!("   ─────────────────────────────");
    for budget in budgets {
        println!(
            "   {:>4}  {:<24} {:>14}/mo",
            budget.id,
            truncate(&budget.category, 24),
            money(budget.monthly_limit, &budget.currency)
        );
    }

    Ok(())
}

pub fn cmd_budgets_add(
    db: &Database,
    config: &TallyConfig,
    category: &str,
    limit: f64,
    currency: Option<&str>,
) -> Result<i64> {
    FeatureGate::for_tier(config.tier).check_create(Resource::Budgets, db.count_budgets()?)?;

    let id = db.create_budget(&NewBudget {
        category: category.to_string(),
        monthly_limit: limit,
        currency: currency.unwrap_or(&config.default_currency).to_string(),
    })?;

    println!("✅ Added budget for '{}' (ID: {})", category, id);
    Ok(id)
}

pub fn cmd_budgets_remove(db: &Database, id: i64) -> Result<()> {
    db.delete_budget(id)?;
    println!("✅ Removed budget {}", id);
    Ok(())
}

fn tier_icon(tier: StatusTier) -> &'static str {
    match tier {
        StatusTier::Safe => "🟢",
        StatusTier::Warning => "🟡",
        StatusTier::Critical => "🟠",
        StatusTier::Exceeded => "🔴",
    }
}

/// Show month-to-date status; newly crossed thresholds become notifications
pub fn cmd_budgets_status(db: &Database, config: &TallyConfig, now: DateTime<Utc>) -> Result<()> {
    let evaluation = db.evaluate_budgets(now, config.alerts.enabled)?;

    if evaluation.statuses.is_empty() && evaluation.invalid.is_empty() {
        println!("No budgets yet.");
        return Ok(());
    }

    println!();
    println!("📊 Budgets for {}-{:02}", evaluation.year, evaluation.month);
    println!("   ─────────────────────────────────────────────────────────────");

    for status in &evaluation.statuses {
        println!(
            "   {} {:<20} {:>12} of {:>12}  {:>6.1}%  {}",
            tier_icon(status.tier),
            truncate(&status.category, 20),
            format!("{:.2}", status.spent),
            money(status.limit, &status.currency),
            status.percentage,
            status.tier
        );
    }

    for invalid in &evaluation.invalid {
        println!("   ⚠️  {}: skipped ({})", invalid.category, invalid.reason);
    }

    if !evaluation.alerts.is_empty() {
        println!();
        println!("🔔 New alerts");
        for alert in &evaluation.alerts {
            println!("   {}", alert.title());
            println!("      {}", alert.message());
        }
    }
    println!();

    Ok(())
}
