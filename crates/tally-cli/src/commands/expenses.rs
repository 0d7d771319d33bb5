//! Expense command implementations

use anyhow::Result;
use chrono::NaiveDate;
use tally_core::config::TallyConfig;
use tally_core::db::{Database, ExpenseFilter};
use tally_core::models::NewExpense;

use super::{money, truncate};

/// Build a filter from the optional month and category arguments
pub fn expense_filter(month: Option<&str>, category: Option<&str>) -> Result<ExpenseFilter> {
    let mut filter = match month {
        Some(m) => ExpenseFilter::parse_month(m)?,
        None => ExpenseFilter::default(),
    };
    if let Some(c) = category {
        filter = filter.with_category(c);
    }
    Ok(filter)
}

pub fn cmd_expenses_list(
    db: &Database,
    month: Option<&str>,
    category: Option<&str>,
    limit: i64,
) -> Result<()> {
    let mut filter = expense_filter(month, category)?;
    filter.limit = Some(limit.max(1));
    let expenses = db.list_expenses(&filter)?;

    if expenses.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }

    println!();
    println!("🧾 Expenses");
    println!("   ─────────────────────────────────────────────────────────────");
    for e in &expenses {
        let marker = if e.recurring_id.is_some() { "🔁" } else { "  " };
        println!(
            "   {:>5}  {}  {:<18} {:>14} {} {}",
            e.id,
            e.date,
            truncate(&e.category, 18),
            money(e.amount, &e.currency),
            marker,
            truncate(e.description.as_deref().unwrap_or(""), 30)
        );
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    println!();
    println!("   {} expenses, total {:.2}", expenses.len(), total);

    Ok(())
}

pub fn cmd_expenses_add(
    db: &Database,
    config: &TallyConfig,
    category: &str,
    amount: f64,
    date: NaiveDate,
    description: Option<&str>,
    currency: Option<&str>,
) -> Result<i64> {
    let id = db.create_expense(&NewExpense {
        category: category.to_string(),
        amount,
        currency: currency.unwrap_or(&config.default_currency).to_string(),
        date,
        description: description.map(str::to_string),
        recurring_id: None,
    })?;

    if amount < 0.0 {
        println!("✅ Recorded refund of {:.2} in '{}' (ID: {})", -amount, category, id);
    } else {
        println!("✅ Recorded {:.2} in '{}' (ID: {})", amount, category, id);
    }
    Ok(id)
}

pub fn cmd_expenses_remove(db: &Database, id: i64) -> Result<()> {
    db.delete_expense(id)?;
    println!("✅ Removed expense {}", id);
    Ok(())
}
