//! Income command implementations

use anyhow::Result;
use chrono::NaiveDate;
use tally_core::config::TallyConfig;
use tally_core::db::Database;
use tally_core::models::NewIncome;

use super::{money, truncate};

pub fn cmd_income_list(db: &Database, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let incomes = db.list_incomes(from, to)?;

    if incomes.is_empty() {
        println!("No income recorded.");
        return Ok(());
    }

    println!();
    println!("💵 Income");
    println!("   ─────────────────────────────");
    for income in &incomes {
        println!(
            "   {:>5}  {}  {:<24} {:>14}",
            income.id,
            income.date,
            truncate(&income.source, 24),
            money(income.amount, &income.currency)
        );
    }

    let total: f64 = incomes.iter().map(|i| i.amount).sum();
    println!();
    println!("   Total: {:.2}", total);

    Ok(())
}

pub fn cmd_income_add(
    db: &Database,
    config: &TallyConfig,
    source: &str,
    amount: f64,
    date: NaiveDate,
    currency: Option<&str>,
) -> Result<i64> {
    let id = db.create_income(&NewIncome {
        source: source.to_string(),
        amount,
        currency: currency.unwrap_or(&config.default_currency).to_string(),
        date,
        recurring_id: None,
    })?;

    println!("✅ Recorded {:.2} from '{}' (ID: {})", amount, source, id);
    Ok(id)
}

pub fn cmd_income_remove(db: &Database, id: i64) -> Result<()> {
    db.delete_income(id)?;
    println!("✅ Removed income {}", id);
    Ok(())
}
