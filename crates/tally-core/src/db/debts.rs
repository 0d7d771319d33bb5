//! Debt operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{parse_datetime, parse_enum, Database};
use crate::error::{Error, Result};
use crate::models::{Debt, NewDebt, NewNotification, NotificationType, Priority};

const DEBT_COLUMNS: &str =
    "id, name, debt_type, currency, current_balance, interest_rate, minimum_payment, created_at";

fn row_to_debt(row: &Row) -> rusqlite::Result<Debt> {
    let debt_type: String = row.get(2)?;
    let created_at: String = row.get(7)?;
    Ok(Debt {
        id: row.get(0)?,
        name: row.get(1)?,
        debt_type: parse_enum(&debt_type, 2)?,
        currency: row.get(3)?,
        current_balance: row.get(4)?,
        interest_rate: row.get(5)?,
        minimum_payment: row.get(6)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Create a debt
    pub fn create_debt(&self, debt: &NewDebt) -> Result<i64> {
        debt.validate().map_err(Error::InvalidData)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO debts (name, debt_type, currency, current_balance, interest_rate, minimum_payment)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                debt.name.trim(),
                debt.debt_type.as_str(),
                debt.currency,
                debt.current_balance,
                debt.interest_rate,
                debt.minimum_payment
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all debts, largest balance first
    pub fn list_debts(&self) -> Result<Vec<Debt>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM debts ORDER BY current_balance DESC, id",
            DEBT_COLUMNS
        ))?;

        let debts = stmt
            .query_map([], row_to_debt)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(debts)
    }

    /// Get a debt by ID
    pub fn get_debt(&self, id: i64) -> Result<Option<Debt>> {
        let conn = self.conn()?;
        let debt = conn
            .query_row(
                &format!("SELECT {} FROM debts WHERE id = ?", DEBT_COLUMNS),
                params![id],
                row_to_debt,
            )
            .optional()?;

        Ok(debt)
    }

    /// Replace a debt's fields.
    ///
    /// A balance that drops to zero records a payoff notification.
    pub fn update_debt(&self, id: i64, debt: &NewDebt) -> Result<Debt> {
        debt.validate().map_err(Error::InvalidData)?;

        let previous = self
            .get_debt(id)?
            .ok_or_else(|| Error::NotFound(format!("Debt {} not found", id)))?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE debts
            SET name = ?, debt_type = ?, currency = ?, current_balance = ?,
                interest_rate = ?, minimum_payment = ?
            WHERE id = ?
            "#,
            params![
                debt.name.trim(),
                debt.debt_type.as_str(),
                debt.currency,
                debt.current_balance,
                debt.interest_rate,
                debt.minimum_payment,
                id
            ],
        )?;
        drop(conn);

        if previous.current_balance > 0.0 && debt.current_balance == 0.0 {
            info!(debt_id = id, name = %debt.name, "Debt paid off");
            self.create_notification(&NewNotification {
                notification_type: NotificationType::DebtMilestone,
                title: format!("Paid off: {}", debt.name.trim()),
                message: format!(
                    "You cleared {} ({:.2} {}). Roll its {:.2} minimum into your next debt.",
                    debt.name.trim(),
                    previous.current_balance,
                    debt.currency,
                    debt.minimum_payment
                ),
                priority: Priority::High,
                related_id: Some(id),
                action_url: Some("/debts".to_string()),
            })?;
        }

        self.get_debt(id)?
            .ok_or_else(|| Error::NotFound(format!("Debt {} not found", id)))
    }

    /// Delete a debt
    pub fn delete_debt(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM debts WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Debt {} not found", id)));
        }
        Ok(())
    }

    pub fn count_debts(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM debts", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
