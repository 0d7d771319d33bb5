//! Dashboard aggregates

use chrono::{Datelike, NaiveDate};

use super::expenses::ExpenseFilter;
use super::Database;
use crate::budget::{budget_status, spending_by_category, StatusTier};
use crate::error::{Error, Result};
use crate::models::DashboardStats;

impl Database {
    /// Dashboard statistics for the month containing `today`
    pub fn get_dashboard_stats(&self, today: NaiveDate) -> Result<DashboardStats> {
        let month = ExpenseFilter::for_month(today.year(), today.month())?;
        let (from, to) = month
            .from
            .zip(month.to)
            .ok_or_else(|| Error::InvalidData("Month filter without bounds".to_string()))?;

        let debts = self.list_debts()?;
        let total_debt = debts.iter().map(|d| d.current_balance).sum();
        let total_minimum_payments = debts
            .iter()
            .filter(|d| d.current_balance > 0.0)
            .map(|d| d.minimum_payment)
            .sum();

        let budgets = self.list_budgets()?;
        let expenses = self.list_expenses(&month)?;
        let spending = spending_by_category(&expenses, today.year(), today.month());
        let budgets_over_limit = budgets
            .iter()
            .filter_map(|b| budget_status(b, spending.get(&b.category).copied().unwrap_or(0.0)))
            .filter(|s| s.tier == StatusTier::Exceeded)
            .count() as i64;

        let month_spending: f64 = expenses.iter().map(|e| e.amount).sum();
        let month_income = self.total_income(from, to)?;

        Ok(DashboardStats {
            total_debt,
            total_minimum_payments,
            debt_count: debts.len() as i64,
            budget_count: budgets.len() as i64,
            budgets_over_limit,
            month_spending,
            month_income,
            net_cash_flow: month_income - month_spending,
            unread_notifications: self.count_unread_notifications()?,
            active_recurring: self.count_recurring()? as i64,
        })
    }
}
