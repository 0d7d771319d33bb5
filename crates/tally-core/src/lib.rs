//! Tally Core Library
//!
//! Shared functionality for the Tally personal finance tracker:
//! - Debt payoff projections and snowball/avalanche planning
//! - Budget status tiers and once-per-month threshold alerts
//! - Recurring transaction schedules
//! - Subscription tier feature gating
//! - Database access and migrations
//! - CSV export

pub mod budget;
pub mod config;
pub mod db;
pub mod debt;
pub mod error;
pub mod export;
pub mod gating;
pub mod models;
pub mod recurring;

pub use budget::{
    AlertKey, AlertLedger, AlertThreshold, BudgetAlert, BudgetEvaluation, BudgetStatus,
    BudgetTracker, FiredAlerts, StatusTier,
};
pub use config::TallyConfig;
pub use db::{AuditEntry, Database, ExpenseFilter, RecurringRunSummary};
pub use debt::{
    compare_strategies, order_debts, simulate_plan, DebtProjection, PayoffOutcome, PayoffPlan,
    PayoffStrategy, Projector,
};
pub use error::{Error, Result};
pub use gating::{Feature, FeatureGate, Resource, SubscriptionTier};
