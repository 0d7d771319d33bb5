//! Budget tracking
//!
//! - `status` - spend-to-limit percentage and the safe/warning/critical/exceeded tier
//! - `tracker` - month-to-date evaluation and once-per-month threshold alerts
//!
//! Alert deduplication lives behind the [`AlertLedger`] trait so the caller
//! decides where "already fired" is remembered: [`FiredAlerts`] keeps it in
//! memory for one session, `Database` persists it across runs.

pub mod status;
pub mod tracker;

pub use status::{budget_status, BudgetStatus, StatusTier};
pub use tracker::{
    spending_by_category, AlertKey, AlertLedger, AlertThreshold, BudgetAlert, BudgetEvaluation,
    BudgetTracker, FiredAlerts, InvalidBudget,
};
