//! Debt command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::config::TallyConfig;
use tally_core::db::Database;
use tally_core::debt::{compare_strategies, order_debts, PayoffPlan, PayoffStrategy, Projector};
use tally_core::gating::{FeatureGate, Resource};
use tally_core::models::NewDebt;

use super::{money, truncate};

pub fn cmd_debts_list(db: &Database) -> Result<()> {
    let debts = db.list_debts()?;

    if debts.is_empty() {
        println!("No debts tracked. Add one with:");
        println!("  tally debts add \"Visa\" --balance 2500 --rate 19.9 --minimum 75");
        return Ok(());
    }

    println!();
    println!("💳 Debts");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:>4}  {:<24} {:<14} {:>14} {:>7} {:>12}",
        "ID", "Name", "Type", "Balance", "APR", "Minimum"
    );

    for debt in &debts {
        println!(
            "   {:>4}  {:<24} {:<14} {:>14} {:>6.2}% {:>12.2}",
            debt.id,
            truncate(&debt.name, 24),
            debt.debt_type,
            money(debt.current_balance, &debt.currency),
            debt.interest_rate,
            debt.minimum_payment
        );
    }

    let total: f64 = debts.iter().map(|d| d.current_balance).sum();
    println!();
    println!("   Total owed: {:.2}", total);

    Ok(())
}

/// Add a debt, subject to the plan's debt cap
pub fn cmd_debts_add(db: &Database, config: &TallyConfig, debt: NewDebt) -> Result<i64> {
    FeatureGate::for_tier(config.tier).check_create(Resource::Debts, db.count_debts()?)?;

    let id = db.create_debt(&debt)?;

    println!("✅ Added debt '{}' (ID: {})", debt.name, id);
    if let Some(created) = db.get_debt(id)? {
        if created.never_amortizes(0.0) {
            println!(
                "   ⚠️  The minimum payment does not cover monthly interest ({:.2}); this debt will never be paid off without extra payments",
                created.current_balance * created.monthly_rate()
            );
        }
    }

    Ok(id)
}

pub fn cmd_debts_update(
    db: &Database,
    id: i64,
    balance: Option<f64>,
    rate: Option<f64>,
    minimum: Option<f64>,
) -> Result<()> {
    let existing = db
        .get_debt(id)?
        .with_context(|| format!("Debt {} not found", id))?;

    let updated = db.update_debt(
        id,
        &NewDebt {
            name: existing.name,
            debt_type: existing.debt_type,
            currency: existing.currency,
            current_balance: balance.unwrap_or(existing.current_balance),
            interest_rate: rate.unwrap_or(existing.interest_rate),
            minimum_payment: minimum.unwrap_or(existing.minimum_payment),
        },
    )?;

    if updated.current_balance <= 0.0 && existing.current_balance > 0.0 {
        println!("🎉 '{}' is paid off!", updated.name);
    } else {
        println!(
            "✅ Updated '{}': balance {}",
            updated.name,
            money(updated.current_balance, &updated.currency)
        );
    }

    Ok(())
}

pub fn cmd_debts_remove(db: &Database, id: i64) -> Result<()> {
    db.delete_debt(id)?;
    println!("✅ Removed debt {}", id);
    Ok(())
}

pub fn cmd_debts_project(
    db: &Database,
    config: &TallyConfig,
    id: i64,
    extra: f64,
    rows: usize,
    today: NaiveDate,
) -> Result<()> {
    let debt = db
        .get_debt(id)?
        .with_context(|| format!("Debt {} not found", id))?;

    let projection = Projector::new(config.projection.max_months).project(&debt, extra, today)?;

    println!();
    println!("📈 Payoff projection: {}", debt.name);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Balance: {}  APR: {:.2}%  Payment: {:.2}/mo",
        money(debt.current_balance, &debt.currency),
        debt.interest_rate,
        debt.minimum_payment + extra
    );

    if rows > 0 && !projection.points.is_empty() {
        println!();
        println!(
            "   {:>5}  {:<10} {:>12} {:>12} {:>12} {:>14}",
            "Month", "Date", "Payment", "Interest", "Principal", "Balance"
        );
        for point in projection.points.iter().take(rows) {
            println!(
                "   {:>5}  {:<10} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
                point.month,
                point.date,
                point.payment,
                point.interest,
                point.principal,
                point.balance
            );
        }
        if projection.points.len() > rows {
            println!("   ... {} more months", projection.points.len() - rows);
        }
    }

    println!();
    match (
        projection.outcome.months_to_payoff(),
        projection.outcome.payoff_date(),
    ) {
        (Some(months), Some(date)) => {
            println!("   ✅ Paid off in {} months ({})", months, date.format("%B %Y"));
            println!(
                "   Total interest: {}",
                money(projection.total_interest, &debt.currency)
            );
            println!(
                "   Total paid:     {}",
                money(projection.total_paid, &debt.currency)
            );
        }
        _ => {
            println!(
                "   ❌ Not paid off within {} months at this payment",
                config.projection.max_months
            );
            if debt.never_amortizes(extra) {
                println!("      The payment does not cover the monthly interest.");
            }
        }
    }
    println!();

    Ok(())
}

pub fn cmd_debts_order(db: &Database, strategy: PayoffStrategy) -> Result<()> {
    let debts = db.list_debts()?;
    if debts.is_empty() {
        println!("No debts tracked.");
        return Ok(());
    }

    println!();
    match strategy {
        PayoffStrategy::Avalanche => println!("🏔️  Avalanche order (highest interest rate first)"),
        PayoffStrategy::Snowball => println!("⛄ Snowball order (smallest balance first)"),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    for (i, debt) in order_debts(&debts, strategy).iter().enumerate() {
        println!(
            "   {}. {:<24} {:>14}  {:>6.2}%",
            i + 1,
            truncate(&debt.name, 24),
            money(debt.current_balance, &debt.currency),
            debt.interest_rate
        );
    }
    println!();

    Ok(())
}

fn print_plan(plan: &PayoffPlan) {
    println!("   Strategy: {}", plan.strategy);
    match plan.months {
        Some(months) => println!("   Debt-free in {} months", months),
        None => println!("   ❌ Not debt-free within the projection horizon"),
    }
    println!("   Total interest: {:.2}", plan.total_interest);
    for payoff in &plan.payoffs {
        match payoff.month {
            Some(month) => println!("     - {} cleared in month {}", payoff.name, month),
            None => println!("     - {} not cleared", payoff.name),
        }
    }
}

pub fn cmd_debts_plan(db: &Database, config: &TallyConfig, extra: f64) -> Result<()> {
    let debts = db.list_debts()?;
    if debts.is_empty() {
        println!("No debts tracked.");
        return Ok(());
    }

    let comparison = compare_strategies(&debts, extra, config.projection.max_months)?;

    println!();
    println!(
        "🧮 Payoff plan ({:.2}/mo including {:.2} extra)",
        comparison.avalanche.monthly_budget, extra
    );
    println!("   ─────────────────────────────────────────────────────────────");
    print_plan(&comparison.avalanche);
    println!();
    print_plan(&comparison.snowball);
    println!();
    if comparison.interest_saved_by_avalanche > 0.0 {
        println!(
            "   💡 Avalanche saves {:.2} in interest",
            comparison.interest_saved_by_avalanche
        );
    }
    println!("   Recommended: {}", comparison.recommended);
    println!();

    Ok(())
}
