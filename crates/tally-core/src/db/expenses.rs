//! Expense operations

use chrono::{Months, NaiveDate};
use rusqlite::{params, OptionalExtension, Row, ToSql};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};

const EXPENSE_COLUMNS: &str =
    "id, category, amount, currency, date, description, recurring_id, created_at";

/// Filter for listing expenses. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Exact category match
    pub category: Option<String>,
    pub limit: Option<i64>,
}

impl ExpenseFilter {
    /// Every expense in one calendar month
    pub fn for_month(year: i32, month: u32) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::InvalidData(format!("Invalid month: {}-{:02}", year, month)))?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| Error::InvalidData(format!("Invalid month: {}-{:02}", year, month)))?;

        Ok(Self {
            from: Some(first),
            to: Some(last),
            ..Default::default()
        })
    }

    /// Parse a `YYYY-MM` month string
    pub fn parse_month(s: &str) -> Result<Self> {
        let (year, month) = s
            .split_once('-')
            .and_then(|(y, m)| Some((y.parse::<i32>().ok()?, m.parse::<u32>().ok()?)))
            .ok_or_else(|| Error::InvalidData(format!("Expected YYYY-MM, got '{}'", s)))?;
        Self::for_month(year, month)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

fn row_to_expense(row: &Row) -> rusqlite::Result<Expense> {
    let date: String = row.get(4)?;
    let created_at: String = row.get(7)?;
    Ok(Expense {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
        currency: row.get(3)?,
        date: parse_date(&date, 4)?,
        description: row.get(5)?,
        recurring_id: row.get(6)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Record an expense. Negative amounts are refunds.
    pub fn create_expense(&self, expense: &NewExpense) -> Result<i64> {
        if expense.category.is_empty() {
            return Err(Error::InvalidData("Expense category is required".to_string()));
        }
        if !expense.amount.is_finite() {
            return Err(Error::InvalidData(format!(
                "Expense amount must be a finite number (got {})",
                expense.amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO expenses (category, amount, currency, date, description, recurring_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                expense.category,
                expense.amount,
                expense.currency,
                expense.date.to_string(),
                expense.description,
                expense.recurring_id
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List expenses, newest first
    pub fn list_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let conn = self.conn()?;

        let mut sql = format!("SELECT {} FROM expenses WHERE 1 = 1", EXPENSE_COLUMNS);
        let mut params_vec: Vec<Box<dyn ToSql>> = vec![];

        if let Some(from) = &filter.from {
            sql.push_str(" AND date >= ?");
            params_vec.push(Box::new(from.to_string()));
        }
        if let Some(to) = &filter.to {
            sql.push_str(" AND date <= ?");
            params_vec.push(Box::new(to.to_string()));
        }
        if let Some(category) = &filter.category {
            sql.push_str(" AND category = ?");
            params_vec.push(Box::new(category.clone()));
        }
        sql.push_str(" ORDER BY date DESC, id DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            params_vec.push(Box::new(limit));
        }

        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(params_refs.as_slice(), row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                row_to_expense,
            )
            .optional()?;

        Ok(expense)
    }

    pub fn delete_expense(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Expense {} not found", id)));
        }
        Ok(())
    }

    /// Sum of expenses between two dates (inclusive)
    pub fn total_expenses(&self, from: NaiveDate, to: NaiveDate) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expenses WHERE date >= ? AND date <= ?",
            params![from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}
