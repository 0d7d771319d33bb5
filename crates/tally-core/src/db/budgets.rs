//! Budget operations and the persistent alert ledger

use chrono::{DateTime, Datelike, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::expenses::ExpenseFilter;
use super::notifications::insert_notification;
use super::{parse_datetime, parse_enum, Database};
use crate::budget::{AlertKey, AlertLedger, AlertThreshold, BudgetEvaluation, BudgetTracker};
use crate::error::{Error, Result};
use crate::models::{Budget, NewBudget};

const BUDGET_COLUMNS: &str = "id, category, monthly_limit, currency, period, created_at";

fn row_to_budget(row: &Row) -> rusqlite::Result<Budget> {
    let period: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        monthly_limit: row.get(2)?,
        currency: row.get(3)?,
        period: parse_enum(&period, 4)?,
        created_at: parse_datetime(&created_at),
    })
}

fn validate_budget(budget: &NewBudget) -> Result<()> {
    if budget.category.is_empty() {
        return Err(Error::InvalidData("Budget category is required".to_string()));
    }
    if !budget.monthly_limit.is_finite() || budget.monthly_limit <= 0.0 {
        return Err(Error::InvalidData(format!(
            "Monthly limit must be greater than zero (got {})",
            budget.monthly_limit
        )));
    }
    Ok(())
}

impl Database {
    fn budget_category_taken(&self, category: &str, except_id: Option<i64>) -> Result<bool> {
        let conn = self.conn()?;
        let taken: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM budgets WHERE category = ? AND id != ?)",
            params![category, except_id.unwrap_or(0)],
            |row| row.get(0),
        )?;
        Ok(taken)
    }

    /// Create a budget. Categories are unique.
    pub fn create_budget(&self, budget: &NewBudget) -> Result<i64> {
        validate_budget(budget)?;
        if self.budget_category_taken(&budget.category, None)? {
            return Err(Error::InvalidData(format!(
                "A budget for '{}' already exists",
                budget.category
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (category, monthly_limit, currency) VALUES (?, ?, ?)",
            params![budget.category, budget.monthly_limit, budget.currency],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all budgets by category
    pub fn list_budgets(&self) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budgets ORDER BY category",
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map([], row_to_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    pub fn get_budget(&self, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!("SELECT {} FROM budgets WHERE id = ?", BUDGET_COLUMNS),
                params![id],
                row_to_budget,
            )
            .optional()?;

        Ok(budget)
    }

    /// Update a budget's category, limit and currency
    pub fn update_budget(&self, id: i64, budget: &NewBudget) -> Result<Budget> {
        validate_budget(budget)?;
        if self.get_budget(id)?.is_none() {
            return Err(Error::NotFound(format!("Budget {} not found", id)));
        }
        if self.budget_category_taken(&budget.category, Some(id))? {
            return Err(Error::InvalidData(format!(
                "A budget for '{}' already exists",
                budget.category
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            "UPDATE budgets SET category = ?, monthly_limit = ?, currency = ? WHERE id = ?",
            params![budget.category, budget.monthly_limit, budget.currency, id],
        )?;
        drop(conn);

        self.get_budget(id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {} not found", id)))
    }

    pub fn delete_budget(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM budgets WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Budget {} not found", id)));
        }
        Ok(())
    }

    pub fn count_budgets(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM budgets", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Evaluate all budgets for the month containing `now`.
    ///
    /// Newly crossed thresholds are recorded in `budget_alert_log` and stored
    /// as notifications in one transaction; thresholds already logged this
    /// month stay quiet. If any write fails nothing is logged, so the next
    /// evaluation fires the same crossings again.
    pub fn evaluate_budgets(&self, now: DateTime<Utc>, alerts_enabled: bool) -> Result<BudgetEvaluation> {
        let today = now.date_naive();
        let budgets = self.list_budgets()?;
        let expenses = self.list_expenses(&ExpenseFilter::for_month(today.year(), today.month())?)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut ledger = AlertLog { conn: &tx };
        let evaluation =
            BudgetTracker::with_alerts(alerts_enabled).evaluate(&budgets, &expenses, now, &mut ledger)?;

        for alert in &evaluation.alerts {
            insert_notification(&tx, &alert.to_notification())?;
        }

        tx.commit()?;
        Ok(evaluation)
    }

    /// Threshold crossings already logged for a month
    pub fn fired_alert_keys(&self, year: i32, month: u32) -> Result<Vec<AlertKey>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, threshold, month, year FROM budget_alert_log
            WHERE year = ? AND month = ?
            ORDER BY category, threshold
            "#,
        )?;

        let keys = stmt
            .query_map(params![year, month], |row| {
                let category: String = row.get(0)?;
                let threshold: u32 = row.get(1)?;
                let month: u32 = row.get(2)?;
                let year: i32 = row.get(3)?;
                Ok((category, threshold, month, year))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .filter_map(|(category, threshold, month, year)| {
                AlertThreshold::from_percent(threshold).map(|threshold| AlertKey {
                    category,
                    threshold,
                    month,
                    year,
                })
            })
            .collect();

        Ok(keys)
    }
}

fn record_alert_key(conn: &Connection, key: &AlertKey) -> Result<bool> {
    let inserted = conn.execute(
        r#"
        INSERT OR IGNORE INTO budget_alert_log (category, threshold, month, year)
        VALUES (?, ?, ?, ?)
        "#,
        params![key.category, key.threshold.percent(), key.month, key.year],
    )?;

    if inserted == 0 {
        debug!(category = %key.category, threshold = key.threshold.percent(), "Alert already fired");
    }
    Ok(inserted == 1)
}

/// Ledger bound to one open transaction
struct AlertLog<'a> {
    conn: &'a Connection,
}

impl AlertLedger for AlertLog<'_> {
    fn try_record(&mut self, key: &AlertKey) -> Result<bool> {
        record_alert_key(self.conn, key)
    }
}

impl AlertLedger for Database {
    fn try_record(&mut self, key: &AlertKey) -> Result<bool> {
        let conn = self.conn()?;
        record_alert_key(&conn, key)
    }
}
