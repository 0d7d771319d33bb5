//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod auth;
pub mod budgets;
pub mod dashboard;
pub mod debts;
pub mod expenses;
pub mod export;
pub mod incomes;
pub mod notifications;
pub mod recurring;

// Re-export all handlers for use in router
pub use audit::*;
pub use auth::*;
pub use budgets::*;
pub use dashboard::*;
pub use debts::*;
pub use expenses::*;
pub use export::*;
pub use incomes::*;
pub use notifications::*;
pub use recurring::*;
