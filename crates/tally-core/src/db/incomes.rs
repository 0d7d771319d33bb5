//! Income operations

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Income, NewIncome};

fn row_to_income(row: &Row) -> rusqlite::Result<Income> {
    let date: String = row.get(4)?;
    let created_at: String = row.get(6)?;
    Ok(Income {
        id: row.get(0)?,
        source: row.get(1)?,
        amount: row.get(2)?,
        currency: row.get(3)?,
        date: parse_date(&date, 4)?,
        recurring_id: row.get(5)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    pub fn create_income(&self, income: &NewIncome) -> Result<i64> {
        if income.source.trim().is_empty() {
            return Err(Error::InvalidData("Income source is required".to_string()));
        }
        if !income.amount.is_finite() || income.amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Income amount must be zero or more (got {})",
                income.amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO incomes (source, amount, currency, date, recurring_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                income.source.trim(),
                income.amount,
                income.currency,
                income.date.to_string(),
                income.recurring_id
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List income between optional dates (inclusive), newest first
    pub fn list_incomes(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Vec<Income>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, source, amount, currency, date, recurring_id, created_at
            FROM incomes
            WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
            ORDER BY date DESC, id DESC
            "#,
        )?;

        let incomes = stmt
            .query_map(
                params![from.map(|d| d.to_string()), to.map(|d| d.to_string())],
                row_to_income,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(incomes)
    }

    pub fn delete_income(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM incomes WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Income {} not found", id)));
        }
        Ok(())
    }

    /// Sum of income between two dates (inclusive)
    pub fn total_income(&self, from: NaiveDate, to: NaiveDate) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM incomes WHERE date >= ? AND date <= ?",
            params![from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}
