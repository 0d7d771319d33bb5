//! Debt payoff calculations
//!
//! - **Projection** - month-by-month amortization schedule for one debt
//! - **Payoff** - avalanche/snowball ordering and multi-debt payoff plans
//!
//! Everything here is a pure function of its inputs; nothing touches the
//! database.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::debt::{Projector, order_debts, PayoffStrategy};
//!
//! let projection = Projector::default().project(&debt, 50.0, today)?;
//! let ordered = order_debts(&debts, PayoffStrategy::Avalanche);
//! ```

pub mod payoff;
pub mod projection;

pub use payoff::{
    compare_strategies, order_debts, simulate_plan, suggest_focus, DebtPayoff, PayoffPlan,
    PayoffStrategy, StrategyComparison,
};
pub use projection::{
    DebtProjection, PayoffOutcome, ProjectionPoint, Projector, DEFAULT_MAX_MONTHS,
};

/// Balances at or below this are treated as paid off
pub(crate) const BALANCE_EPSILON: f64 = 1e-6;

/// Reject balances, rates and payments that would poison the arithmetic
pub(crate) fn check_amount(label: &str, value: f64) -> crate::Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(crate::Error::InvalidData(format!(
            "{} must be a finite, non-negative number (got {})",
            label, value
        )));
    }
    Ok(())
}
