//! Amortization projector
//!
//! Walks a debt forward one month at a time: interest accrues on the
//! remaining balance, the payment (minimum plus any extra, never more than
//! what is owed) covers that interest first and the rest reduces principal.
//! The walk stops at a zero balance or at the horizon, whichever comes
//! first, so debts whose payment never covers interest still terminate.

use chrono::{Months, NaiveDate};
use serde::Serialize;
use tracing::debug;

use super::{check_amount, BALANCE_EPSILON};
use crate::error::{Error, Result};
use crate::models::Debt;

/// Default projection horizon (50 years)
pub const DEFAULT_MAX_MONTHS: u32 = 600;

/// One month of a payoff schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionPoint {
    /// 1-based month index
    pub month: u32,
    pub date: NaiveDate,
    pub payment: f64,
    /// Interest accrued this month
    pub interest: f64,
    /// Principal paid down this month (negative when the payment falls short of interest)
    pub principal: f64,
    /// Balance remaining after this month's payment
    pub balance: f64,
}

/// How a projection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoffOutcome {
    PaidOff { months: u32, payoff_date: NaiveDate },
    /// Balance still owed when the walk stopped. `months` is how many months
    /// were projected: `horizon` normally, fewer if the balance overflowed.
    HorizonExceeded { horizon: u32, months: u32 },
}

impl PayoffOutcome {
    pub fn is_paid_off(&self) -> bool {
        matches!(self, Self::PaidOff { .. })
    }

    /// Months until the balance hits zero, `None` for "never"
    pub fn months_to_payoff(&self) -> Option<u32> {
        match self {
            Self::PaidOff { months, .. } => Some(*months),
            Self::HorizonExceeded { .. } => None,
        }
    }

    pub fn payoff_date(&self) -> Option<NaiveDate> {
        match self {
            Self::PaidOff { payoff_date, .. } => Some(*payoff_date),
            Self::HorizonExceeded { .. } => None,
        }
    }
}

/// Full payoff schedule for a debt
#[derive(Debug, Clone, Serialize)]
pub struct DebtProjection {
    pub debt_id: i64,
    pub debt_name: String,
    pub extra_payment: f64,
    pub start_date: NaiveDate,
    pub points: Vec<ProjectionPoint>,
    pub total_interest: f64,
    pub total_paid: f64,
    pub outcome: PayoffOutcome,
}

/// Builds amortization schedules with a bounded horizon
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    max_months: u32,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MONTHS)
    }
}

impl Projector {
    pub fn new(max_months: u32) -> Self {
        Self {
            max_months: max_months.max(1),
        }
    }

    pub fn max_months(&self) -> u32 {
        self.max_months
    }

    /// Project the payoff of `debt` starting the month after `start`
    pub fn project(&self, debt: &Debt, extra_payment: f64, start: NaiveDate) -> Result<DebtProjection> {
        check_amount("Balance", debt.current_balance)?;
        check_amount("Interest rate", debt.interest_rate)?;
        check_amount("Extra payment", extra_payment)?;
        if !debt.minimum_payment.is_finite() {
            return Err(Error::InvalidData(format!(
                "Minimum payment must be a finite number (got {})",
                debt.minimum_payment
            )));
        }

        let monthly_rate = debt.monthly_rate();
        // A non-positive minimum simply never amortizes; the horizon stops it
        let scheduled = (debt.minimum_payment + extra_payment).max(0.0);

        let mut balance = debt.current_balance;
        let mut points = Vec::new();
        let mut total_interest = 0.0;
        let mut total_paid = 0.0;

        while balance > BALANCE_EPSILON && (points.len() as u32) < self.max_months {
            let month = points.len() as u32 + 1;

            let interest = balance * monthly_rate;
            let payment = scheduled.min(balance + interest);
            let principal = payment - interest;
            balance -= principal;

            if balance <= BALANCE_EPSILON {
                balance = 0.0;
            }
            if !balance.is_finite() {
                // Runaway growth on a non-amortizing debt
                break;
            }

            total_interest += interest;
            total_paid += payment;
            points.push(ProjectionPoint {
                month,
                date: month_offset(start, month)?,
                payment,
                interest,
                principal,
                balance,
            });
        }

        let outcome = if balance <= BALANCE_EPSILON {
            let months = points.len() as u32;
            PayoffOutcome::PaidOff {
                months,
                payoff_date: month_offset(start, months)?,
            }
        } else {
            let months = points.len() as u32;
            debug!(
                debt_id = debt.id,
                horizon = self.max_months,
                months,
                "Debt does not pay off within projection horizon"
            );
            PayoffOutcome::HorizonExceeded {
                horizon: self.max_months,
                months,
            }
        };

        Ok(DebtProjection {
            debt_id: debt.id,
            debt_name: debt.name.clone(),
            extra_payment,
            start_date: start,
            points,
            total_interest,
            total_paid,
            outcome,
        })
    }
}

fn month_offset(start: NaiveDate, months: u32) -> Result<NaiveDate> {
    start
        .checked_add_months(Months::new(months))
        .ok_or_else(|| Error::InvalidData(format!("Date overflow adding {} months", months)))
}
