//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budgets` - Budget commands (list, add, remove, status)
//! - `core` - Core commands (init) and shared utilities (open_db, load_config)
//! - `debts` - Debt commands (list, add, update, remove, project, order, plan)
//! - `expenses` - Expense commands (list, add, remove)
//! - `export` - CSV export commands
//! - `income` - Income commands (list, add, remove)
//! - `notifications` - Notification commands (list, read, read-all)
//! - `recurring` - Recurring rule commands (list, add, pause, resume, remove, run)
//! - `serve` - Web server command
//! - `status` - Status/dashboard/tier commands

pub mod budgets;
pub mod core;
pub mod debts;
pub mod expenses;
pub mod export;
pub mod income;
pub mod notifications;
pub mod recurring;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use debts::*;
pub use expenses::*;
pub use export::*;
pub use income::*;
pub use notifications::*;
pub use recurring::*;
pub use serve::*;
pub use status::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount with its currency code
pub fn money(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}
