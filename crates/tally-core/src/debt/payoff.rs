//! Payoff ordering and multi-debt payoff plans
//!
//! Avalanche targets the highest interest rate first (least total interest);
//! snowball targets the smallest balance first (fastest individual wins).
//! Both sorts are stable, so ties keep the caller's order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{check_amount, BALANCE_EPSILON};
use crate::error::Result;
use crate::models::Debt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayoffStrategy {
    /// Highest interest rate first
    #[default]
    Avalanche,
    /// Smallest balance first
    Snowball,
}

impl PayoffStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avalanche => "avalanche",
            Self::Snowball => "snowball",
        }
    }
}

impl fmt::Display for PayoffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PayoffStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "avalanche" => Ok(Self::Avalanche),
            "snowball" => Ok(Self::Snowball),
            _ => Err(format!("Unknown payoff strategy: {}", s)),
        }
    }
}

/// Return a new vector of debts in the order they should be attacked
pub fn order_debts(debts: &[Debt], strategy: PayoffStrategy) -> Vec<Debt> {
    let mut ordered = debts.to_vec();
    match strategy {
        PayoffStrategy::Avalanche => {
            ordered.sort_by(|a, b| b.interest_rate.total_cmp(&a.interest_rate))
        }
        PayoffStrategy::Snowball => {
            ordered.sort_by(|a, b| a.current_balance.total_cmp(&b.current_balance))
        }
    }
    ordered
}

/// The debt that should receive extra payments first
pub fn suggest_focus(debts: &[Debt], strategy: PayoffStrategy) -> Option<Debt> {
    order_debts(debts, strategy).into_iter().next()
}

/// When one debt in a plan is cleared
#[derive(Debug, Clone, Serialize)]
pub struct DebtPayoff {
    pub debt_id: i64,
    pub name: String,
    /// Month the balance reached zero, `None` if it never did
    pub month: Option<u32>,
    pub interest_paid: f64,
}

/// Result of paying down a set of debts together
#[derive(Debug, Clone, Serialize)]
pub struct PayoffPlan {
    pub strategy: PayoffStrategy,
    pub extra_payment: f64,
    /// Total paid every month: all minimums plus the extra payment
    pub monthly_budget: f64,
    /// Months until every debt is cleared, `None` when the horizon was hit
    pub months: Option<u32>,
    pub total_interest: f64,
    pub total_paid: f64,
    /// Debts in attack order
    pub payoffs: Vec<DebtPayoff>,
    pub horizon_exceeded: bool,
}

/// Avalanche and snowball side by side
#[derive(Debug, Clone, Serialize)]
pub struct StrategyComparison {
    pub avalanche: PayoffPlan,
    pub snowball: PayoffPlan,
    pub interest_saved_by_avalanche: f64,
    pub recommended: PayoffStrategy,
}

/// Simulate paying all debts at once.
///
/// Every month each open debt accrues interest and gets its minimum; whatever
/// is left of the fixed monthly budget (including minimums freed by debts
/// already cleared) goes to open debts in strategy order.
pub fn simulate_plan(
    debts: &[Debt],
    strategy: PayoffStrategy,
    extra_payment: f64,
    max_months: u32,
) -> Result<PayoffPlan> {
    check_amount("Extra payment", extra_payment)?;
    for debt in debts {
        check_amount("Balance", debt.current_balance)?;
        check_amount("Interest rate", debt.interest_rate)?;
        check_amount("Minimum payment", debt.minimum_payment)?;
    }

    let ordered = order_debts(debts, strategy);
    let monthly_budget: f64 = ordered.iter().map(|d| d.minimum_payment).sum::<f64>() + extra_payment;

    let mut balances: Vec<f64> = ordered.iter().map(|d| d.current_balance).collect();
    let mut interest_paid = vec![0.0; ordered.len()];
    let mut cleared: Vec<Option<u32>> = balances
        .iter()
        .map(|b| (*b <= BALANCE_EPSILON).then_some(0))
        .collect();

    let mut month = 0;
    let mut total_interest = 0.0;
    let mut total_paid = 0.0;

    while cleared.iter().any(Option::is_none) && month < max_months {
        month += 1;

        for (i, debt) in ordered.iter().enumerate() {
            if cleared[i].is_none() {
                let interest = balances[i] * debt.monthly_rate();
                balances[i] += interest;
                interest_paid[i] += interest;
                total_interest += interest;
            }
        }

        let mut available = monthly_budget;

        // Minimums first
        for (i, debt) in ordered.iter().enumerate() {
            if cleared[i].is_none() {
                let pay = debt.minimum_payment.min(balances[i]).min(available);
                balances[i] -= pay;
                available -= pay;
                total_paid += pay;
            }
        }

        // Surplus to the focus debt, cascading down the order
        for i in 0..ordered.len() {
            if available <= BALANCE_EPSILON {
                break;
            }
            if cleared[i].is_none() {
                let pay = available.min(balances[i]);
                balances[i] -= pay;
                available -= pay;
                total_paid += pay;
            }
        }

        for i in 0..ordered.len() {
            if cleared[i].is_none() && balances[i] <= BALANCE_EPSILON {
                balances[i] = 0.0;
                cleared[i] = Some(month);
            }
        }

        if balances.iter().any(|b| !b.is_finite()) {
            break;
        }
    }

    let horizon_exceeded = cleared.iter().any(Option::is_none);
    let months = if horizon_exceeded {
        None
    } else {
        Some(cleared.iter().flatten().copied().max().unwrap_or(0))
    };

    let payoffs = ordered
        .iter()
        .enumerate()
        .map(|(i, debt)| DebtPayoff {
            debt_id: debt.id,
            name: debt.name.clone(),
            month: cleared[i],
            interest_paid: interest_paid[i],
        })
        .collect();

    Ok(PayoffPlan {
        strategy,
        extra_payment,
        monthly_budget,
        months,
        total_interest,
        total_paid,
        payoffs,
        horizon_exceeded,
    })
}

/// Run both strategies and recommend the cheaper one
pub fn compare_strategies(
    debts: &[Debt],
    extra_payment: f64,
    max_months: u32,
) -> Result<StrategyComparison> {
    let avalanche = simulate_plan(debts, PayoffStrategy::Avalanche, extra_payment, max_months)?;
    let snowball = simulate_plan(debts, PayoffStrategy::Snowball, extra_payment, max_months)?;

    let interest_saved_by_avalanche = snowball.total_interest - avalanche.total_interest;
    let recommended = if interest_saved_by_avalanche < 0.0 {
        PayoffStrategy::Snowball
    } else {
        PayoffStrategy::Avalanche
    };

    Ok(StrategyComparison {
        avalanche,
        snowball,
        interest_saved_by_avalanche,
        recommended,
    })
}
