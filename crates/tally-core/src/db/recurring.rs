//! Recurring rule operations

use chrono::{Datelike, NaiveDate};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;
use tracing::{info, warn};

use super::{parse_date, parse_datetime, parse_enum, Database};
use crate::error::{Error, Result};
use crate::models::{
    NewNotification, NewRecurringTransaction, NotificationType, Priority, RecurringKind,
    RecurringTransaction,
};
use crate::recurring::due_dates;

const RECURRING_COLUMNS: &str =
    "id, kind, name, category, amount, currency, frequency, next_date, anchor_day, active, created_at";

fn row_to_recurring(row: &Row) -> rusqlite::Result<RecurringTransaction> {
    let kind: String = row.get(1)?;
    let frequency: String = row.get(6)?;
    let next_date: String = row.get(7)?;
    let created_at: String = row.get(10)?;
    Ok(RecurringTransaction {
        id: row.get(0)?,
        kind: parse_enum(&kind, 1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        amount: row.get(4)?,
        currency: row.get(5)?,
        frequency: parse_enum(&frequency, 6)?,
        next_date: parse_date(&next_date, 7)?,
        anchor_day: row.get(8)?,
        active: row.get(9)?,
        created_at: parse_datetime(&created_at),
    })
}

/// Result of materializing due recurring rules
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecurringRunSummary {
    pub rules_processed: usize,
    pub expenses_created: usize,
    pub incomes_created: usize,
    /// Rules that still have occurrences due after hitting the catch-up cap
    pub rules_capped: usize,
}

impl RecurringRunSummary {
    pub fn total_created(&self) -> usize {
        self.expenses_created + self.incomes_created
    }
}

impl Database {
    /// Create a recurring rule; the first occurrence is `start_date`
    pub fn create_recurring(&self, rule: &NewRecurringTransaction) -> Result<i64> {
        if rule.name.trim().is_empty() {
            return Err(Error::InvalidData("Recurring rule name is required".to_string()));
        }
        if !rule.amount.is_finite() || rule.amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Recurring amount must be greater than zero (got {})",
                rule.amount
            )));
        }
        if rule.kind == RecurringKind::Expense
            && rule.category.as_deref().map_or(true, str::is_empty)
        {
            return Err(Error::InvalidData(
                "Recurring expenses need a category".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO recurring_transactions
                (kind, name, category, amount, currency, frequency, next_date, anchor_day)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                rule.kind.as_str(),
                rule.name.trim(),
                rule.category,
                rule.amount,
                rule.currency,
                rule.frequency.as_str(),
                rule.start_date.to_string(),
                rule.start_date.day()
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List recurring rules ordered by next due date
    pub fn list_recurring(&self, include_inactive: bool) -> Result<Vec<RecurringTransaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM recurring_transactions WHERE active = 1 OR ? ORDER BY next_date, id",
            RECURRING_COLUMNS
        ))?;

        let rules = stmt
            .query_map(params![include_inactive], row_to_recurring)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rules)
    }

    pub fn get_recurring(&self, id: i64) -> Result<Option<RecurringTransaction>> {
        let conn = self.conn()?;
        let rule = conn
            .query_row(
                &format!(
                    "SELECT {} FROM recurring_transactions WHERE id = ?",
                    RECURRING_COLUMNS
                ),
                params![id],
                row_to_recurring,
            )
            .optional()?;

        Ok(rule)
    }

    /// Pause or resume a rule
    pub fn set_recurring_active(&self, id: i64, active: bool) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE recurring_transactions SET active = ? WHERE id = ?",
            params![active, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Recurring rule {} not found", id)));
        }
        Ok(())
    }

    /// Delete a rule. Records it generated are kept and unlinked.
    pub fn delete_recurring(&self, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "UPDATE expenses SET recurring_id = NULL WHERE recurring_id = ?",
            params![id],
        )?;
        tx.execute(
            "UPDATE incomes SET recurring_id = NULL WHERE recurring_id = ?",
            params![id],
        )?;
        let deleted = tx.execute("DELETE FROM recurring_transactions WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Recurring rule {} not found", id)));
        }

        tx.commit()?;
        Ok(())
    }

    /// Count active rules
    pub fn count_recurring(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recurring_transactions WHERE active = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Materialize every occurrence due on or before `today`.
    ///
    /// Each rule's records and its new `next_date` are written in one SQL
    /// transaction, so a failed run leaves nothing half-applied.
    pub fn process_due_recurring(&self, today: NaiveDate, max_catch_up: usize) -> Result<RecurringRunSummary> {
        let rules = self.list_recurring(false)?;
        let mut summary = RecurringRunSummary::default();

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for rule in &rules {
            let (dates, next) = due_dates(rule, today, max_catch_up)?;
            if dates.is_empty() {
                continue;
            }

            for date in &dates {
                match rule.kind {
                    RecurringKind::Expense => {
                        let category = rule.category.as_deref().unwrap_or("Uncategorized");
                        tx.execute(
                            r#"
                            INSERT INTO expenses (category, amount, currency, date, description, recurring_id)
                            VALUES (?, ?, ?, ?, ?, ?)
                            "#,
                            params![category, rule.amount, rule.currency, date.to_string(), rule.name, rule.id],
                        )?;
                        summary.expenses_created += 1;
                    }
                    RecurringKind::Income => {
                        tx.execute(
                            r#"
                            INSERT INTO incomes (source, amount, currency, date, recurring_id)
                            VALUES (?, ?, ?, ?, ?)
                            "#,
                            params![rule.name, rule.amount, rule.currency, date.to_string(), rule.id],
                        )?;
                        summary.incomes_created += 1;
                    }
                }
            }

            tx.execute(
                "UPDATE recurring_transactions SET next_date = ? WHERE id = ?",
                params![next.to_string(), rule.id],
            )?;

            if next <= today {
                warn!(
                    rule_id = rule.id,
                    name = %rule.name,
                    max_catch_up,
                    "Recurring rule still has occurrences due after catch-up limit"
                );
                summary.rules_capped += 1;
            }
            summary.rules_processed += 1;
        }

        tx.commit()?;
        drop(conn);

        if summary.total_created() > 0 {
            info!(
                rules = summary.rules_processed,
                expenses = summary.expenses_created,
                incomes = summary.incomes_created,
                "Recurring transactions recorded"
            );
            self.create_notification(&NewNotification {
                notification_type: NotificationType::Recurring,
                title: "Recurring transactions recorded".to_string(),
                message: format!(
                    "Added {} expense(s) and {} income record(s) from {} recurring rule(s).",
                    summary.expenses_created, summary.incomes_created, summary.rules_processed
                ),
                priority: Priority::Low,
                related_id: None,
                action_url: Some("/recurring".to_string()),
            })?;
        }

        Ok(summary)
    }
}
