//! Budget threshold tracker
//!
//! Sums the current calendar month's expenses per category, computes each
//! budget's status and fires one alert per (category, threshold, month, year)
//! the first time spend reaches 50, 75, 90 or 100% of the limit. Status tiers
//! are recomputed on every call; only alert events are deduplicated.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::status::{budget_status, BudgetStatus};
use crate::error::Result;
use crate::models::{Budget, Expense, NewNotification, NotificationType, Priority};

/// Fixed alert cut points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum AlertThreshold {
    Fifty,
    SeventyFive,
    Ninety,
    Hundred,
}

impl AlertThreshold {
    /// All thresholds, lowest first
    pub const ALL: [AlertThreshold; 4] = [
        AlertThreshold::Fifty,
        AlertThreshold::SeventyFive,
        AlertThreshold::Ninety,
        AlertThreshold::Hundred,
    ];

    pub fn percent(&self) -> u32 {
        match self {
            Self::Fifty => 50,
            Self::SeventyFive => 75,
            Self::Ninety => 90,
            Self::Hundred => 100,
        }
    }

    pub fn from_percent(percent: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.percent() == percent)
    }

    pub fn priority(&self) -> Priority {
        match self {
            Self::Fifty => Priority::Low,
            Self::SeventyFive => Priority::Normal,
            Self::Ninety => Priority::High,
            Self::Hundred => Priority::Urgent,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Fifty => "Budget halfway used",
            Self::SeventyFive => "Budget warning",
            Self::Ninety => "Budget almost spent",
            Self::Hundred => "Budget exceeded",
        }
    }
}

impl From<AlertThreshold> for u32 {
    fn from(t: AlertThreshold) -> Self {
        t.percent()
    }
}

impl TryFrom<u32> for AlertThreshold {
    type Error = String;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        Self::from_percent(value).ok_or_else(|| format!("Unknown alert threshold: {}", value))
    }
}

impl fmt::Display for AlertThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Identity of one threshold crossing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertKey {
    pub category: String,
    pub threshold: AlertThreshold,
    pub month: u32,
    pub year: i32,
}

/// Remembers which threshold crossings already produced an alert
pub trait AlertLedger {
    /// Record `key`; returns `true` only the first time the key is seen
    fn try_record(&mut self, key: &AlertKey) -> Result<bool>;
}

/// In-memory ledger scoped to the owner's lifetime (one user session)
#[derive(Debug, Default, Clone)]
pub struct FiredAlerts {
    fired: HashSet<AlertKey>,
}

impl FiredAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &AlertKey) -> bool {
        self.fired.contains(key)
    }

    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }

    /// Drop keys from months other than the given one
    pub fn retain_month(&mut self, year: i32, month: u32) {
        self.fired.retain(|k| k.year == year && k.month == month);
    }
}

impl AlertLedger for FiredAlerts {
    fn try_record(&mut self, key: &AlertKey) -> Result<bool> {
        Ok(self.fired.insert(key.clone()))
    }
}

/// A threshold crossing event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAlert {
    pub budget_id: i64,
    pub category: String,
    pub currency: String,
    pub threshold: AlertThreshold,
    pub spent: f64,
    pub limit: f64,
    pub percentage: f64,
    pub month: u32,
    pub year: i32,
    pub triggered_at: DateTime<Utc>,
}

impl BudgetAlert {
    pub fn key(&self) -> AlertKey {
        AlertKey {
            category: self.category.clone(),
            threshold: self.threshold,
            month: self.month,
            year: self.year,
        }
    }

    pub fn priority(&self) -> Priority {
        self.threshold.priority()
    }

    pub fn title(&self) -> String {
        format!("{}: {}", self.threshold.title(), self.category)
    }

    pub fn message(&self) -> String {
        let spent = money(self.spent, &self.currency);
        let limit = money(self.limit, &self.currency);
        match self.threshold {
            AlertThreshold::Fifty => format!(
                "You've used half of your {} budget ({} of {}).",
                self.category, spent, limit
            ),
            AlertThreshold::SeventyFive => format!(
                "You've used {:.0}% of your {} budget ({} of {}). Consider slowing down.",
                self.percentage, self.category, spent, limit
            ),
            AlertThreshold::Ninety => format!(
                "Only {} left in your {} budget this month ({} of {} spent).",
                money(self.limit - self.spent, &self.currency),
                self.category,
                spent,
                limit
            ),
            AlertThreshold::Hundred => format!(
                "You've gone over your {} budget by {} ({} of {}).",
                self.category,
                money(self.spent - self.limit, &self.currency),
                spent,
                limit
            ),
        }
    }

    /// Shape handed to the notification store
    pub fn to_notification(&self) -> NewNotification {
        NewNotification {
            notification_type: NotificationType::BudgetAlert,
            title: self.title(),
            message: self.message(),
            priority: self.priority(),
            related_id: Some(self.budget_id),
            action_url: Some("/budgets".to_string()),
        }
    }
}

fn money(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Budget excluded from evaluation because its limit is unusable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidBudget {
    pub budget_id: i64,
    pub category: String,
    pub reason: String,
}

/// Output of one evaluation pass
#[derive(Debug, Clone, Serialize)]
pub struct BudgetEvaluation {
    pub month: u32,
    pub year: i32,
    pub statuses: Vec<BudgetStatus>,
    /// Alerts newly fired by this pass
    pub alerts: Vec<BudgetAlert>,
    pub invalid: Vec<InvalidBudget>,
}

/// Sum expenses for one calendar month, keyed by exact category string
pub fn spending_by_category(expenses: &[Expense], year: i32, month: u32) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for expense in expenses
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
    {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    totals
}

#[derive(Debug, Clone, Copy)]
pub struct BudgetTracker {
    alerts_enabled: bool,
}

impl Default for BudgetTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetTracker {
    pub fn new() -> Self {
        Self {
            alerts_enabled: true,
        }
    }

    /// Tracker that computes statuses but never fires alerts
    pub fn with_alerts(enabled: bool) -> Self {
        Self {
            alerts_enabled: enabled,
        }
    }

    /// Evaluate budgets for the month containing `now`, firing new alerts
    pub fn evaluate<L: AlertLedger + ?Sized>(
        &self,
        budgets: &[Budget],
        expenses: &[Expense],
        now: DateTime<Utc>,
        ledger: &mut L,
    ) -> Result<BudgetEvaluation> {
        let today = now.date_naive();
        let (year, month) = (today.year(), today.month());
        let spending = spending_by_category(expenses, year, month);

        let mut statuses = Vec::with_capacity(budgets.len());
        let mut alerts = Vec::new();
        let mut invalid = Vec::new();

        for budget in budgets {
            let spent = spending.get(&budget.category).copied().unwrap_or(0.0);

            let Some(status) = budget_status(budget, spent) else {
                warn!(
                    budget_id = budget.id,
                    category = %budget.category,
                    limit = budget.monthly_limit,
                    "Skipping budget with unusable limit"
                );
                invalid.push(InvalidBudget {
                    budget_id: budget.id,
                    category: budget.category.clone(),
                    reason: format!(
                        "Monthly limit must be greater than zero (got {})",
                        budget.monthly_limit
                    ),
                });
                continue;
            };

            if self.alerts_enabled {
                for threshold in AlertThreshold::ALL {
                    if status.percentage < threshold.percent() as f64 {
                        break;
                    }

                    let key = AlertKey {
                        category: budget.category.clone(),
                        threshold,
                        month,
                        year,
                    };
                    if !ledger.try_record(&key)? {
                        continue;
                    }

                    info!(
                        category = %budget.category,
                        threshold = threshold.percent(),
                        percentage = status.percentage,
                        "Budget threshold crossed"
                    );
                    alerts.push(BudgetAlert {
                        budget_id: budget.id,
                        category: budget.category.clone(),
                        currency: budget.currency.clone(),
                        threshold,
                        spent: status.spent,
                        limit: status.limit,
                        percentage: status.percentage,
                        month,
                        year,
                        triggered_at: now,
                    });
                }
            }

            statuses.push(status);
        }

        Ok(BudgetEvaluation {
            month,
            year,
            statuses,
            alerts,
            invalid,
        })
    }

    /// Statuses only; never touches a ledger
    pub fn statuses(&self, budgets: &[Budget], expenses: &[Expense], now: DateTime<Utc>) -> Vec<BudgetStatus> {
        let today = now.date_naive();
        let spending = spending_by_category(expenses, today.year(), today.month());
        budgets
            .iter()
            .filter_map(|b| budget_status(b, spending.get(&b.category).copied().unwrap_or(0.0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::StatusTier;
    use crate::models::BudgetPeriod;
    use chrono::{NaiveDate, TimeZone};

    fn budget(id: i64, category: &str, limit: f64) -> Budget {
        Budget {
            id,
            category: category.to_string(),
            monthly_limit: limit,
            currency: "USD".to_string(),
            period: BudgetPeriod::Monthly,
            created_at: Utc::now(),
        }
    }

    fn expense(category: &str, amount: f64, date: NaiveDate) -> Expense {
        Expense {
            id: 0,
            category: category.to_string(),
            amount,
            currency: "USD".to_string(),
            date,
            description: None,
            recurring_id: None,
            created_at: Utc::now(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap()
    }

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn thresholds(alerts: &[BudgetAlert]) -> Vec<u32> {
        alerts.iter().map(|a| a.threshold.percent()).collect()
    }

    #[test]
    fn test_seventy_five_percent_fires_once() {
        let budgets = vec![budget(1, "Dining", 1_000.0)];
        let expenses = vec![expense("Dining", 750.0, march(3))];
        let mut ledger = FiredAlerts::new();
        let tracker = BudgetTracker::new();

        let first = tracker.evaluate(&budgets, &expenses, now(), &mut ledger).unwrap();
        assert_eq!(first.statuses[0].percentage, 75.0);
        assert_eq!(first.statuses[0].tier, StatusTier::Warning);
        assert_eq!(thresholds(&first.alerts), vec![50, 75]);
        assert_eq!(
            first.alerts.iter().filter(|a| a.threshold == AlertThreshold::SeventyFive).count(),
            1
        );

        let second = tracker.evaluate(&budgets, &expenses, now(), &mut ledger).unwrap();
        assert!(second.alerts.is_empty());
        // Status is still reported every time
        assert_eq!(second.statuses[0].tier, StatusTier::Warning);
    }

    #[test]
    fn test_only_new_thresholds_fire_as_spend_grows() {
        let budgets = vec![budget(1, "Fuel", 200.0)];
        let mut ledger = FiredAlerts::new();
        let tracker = BudgetTracker::new();

        let mut expenses = vec![expense("Fuel", 110.0, march(1))];
        let eval = tracker.evaluate(&budgets, &expenses, now(), &mut ledger).unwrap();
        assert_eq!(thresholds(&eval.alerts), vec![50]);

        expenses.push(expense("Fuel", 95.0, march(10)));
        let eval = tracker.evaluate(&budgets, &expenses, now(), &mut ledger).unwrap();
        assert_eq!(thresholds(&eval.alerts), vec![75, 90, 100]);
        assert_eq!(eval.statuses[0].tier, StatusTier::Exceeded);
        assert_eq!(eval.alerts[2].priority(), Priority::Urgent);
    }

    #[test]
    fn test_other_months_are_ignored() {
        let budgets = vec![budget(1, "Groceries", 100.0)];
        let expenses = vec![
            expense("Groceries", 500.0, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()),
            expense("Groceries", 500.0, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()),
            expense("Groceries", 10.0, march(1)),
        ];
        let eval = BudgetTracker::new()
            .evaluate(&budgets, &expenses, now(), &mut FiredAlerts::new())
            .unwrap();
        assert_eq!(eval.statuses[0].spent, 10.0);
        assert!(eval.alerts.is_empty());
    }

    #[test]
    fn test_new_month_fires_again() {
        let budgets = vec![budget(1, "Dining", 100.0)];
        let mut ledger = FiredAlerts::new();
        let tracker = BudgetTracker::new();

        let expenses = vec![expense("Dining", 60.0, march(2))];
        tracker.evaluate(&budgets, &expenses, now(), &mut ledger).unwrap();

        let april = Utc.with_ymd_and_hms(2026, 4, 2, 9, 0, 0).unwrap();
        let expenses = vec![expense("Dining", 60.0, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap())];
        let eval = tracker.evaluate(&budgets, &expenses, april, &mut ledger).unwrap();
        assert_eq!(thresholds(&eval.alerts), vec![50]);
        assert_eq!(eval.alerts[0].month, 4);

        let march_key = AlertKey {
            category: "Dining".to_string(),
            threshold: AlertThreshold::Fifty,
            month: 3,
            year: 2026,
        };
        assert!(ledger.contains(&march_key));

        ledger.retain_month(2026, 4);
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.contains(&march_key));
        assert!(ledger.contains(&eval.alerts[0].key()));
    }

    #[test]
    fn test_category_match_is_exact() {
        let budgets = vec![budget(1, "Groceries", 100.0)];
        let expenses = vec![
            expense("groceries", 80.0, march(1)),
            expense("Groceries ", 80.0, march(1)),
            expense("Groceries", 20.0, march(1)),
        ];
        let eval = BudgetTracker::new()
            .evaluate(&budgets, &expenses, now(), &mut FiredAlerts::new())
            .unwrap();
        assert_eq!(eval.statuses[0].spent, 20.0);
    }

    #[test]
    fn test_invalid_budget_excluded() {
        let budgets = vec![budget(1, "Broken", 0.0), budget(2, "Fine", 100.0)];
        let expenses = vec![expense("Broken", 50.0, march(1))];
        let eval = BudgetTracker::new()
            .evaluate(&budgets, &expenses, now(), &mut FiredAlerts::new())
            .unwrap();

        assert_eq!(eval.statuses.len(), 1);
        assert_eq!(eval.statuses[0].category, "Fine");
        assert_eq!(eval.invalid.len(), 1);
        assert_eq!(eval.invalid[0].budget_id, 1);
        assert!(eval.alerts.is_empty());
    }

    #[test]
    fn test_alerts_disabled() {
        let budgets = vec![budget(1, "Dining", 100.0)];
        let expenses = vec![expense("Dining", 150.0, march(1))];
        let mut ledger = FiredAlerts::new();
        let eval = BudgetTracker::with_alerts(false)
            .evaluate(&budgets, &expenses, now(), &mut ledger)
            .unwrap();
        assert!(eval.alerts.is_empty());
        assert!(ledger.is_empty());
        assert_eq!(eval.statuses[0].tier, StatusTier::Exceeded);
    }

    #[test]
    fn test_notification_shape() {
        let budgets = vec![budget(9, "Travel", 400.0)];
        let expenses = vec![expense("Travel", 380.0, march(5))];
        let eval = BudgetTracker::new()
            .evaluate(&budgets, &expenses, now(), &mut FiredAlerts::new())
            .unwrap();

        let ninety = eval
            .alerts
            .iter()
            .find(|a| a.threshold == AlertThreshold::Ninety)
            .unwrap();
        let n = ninety.to_notification();
        assert_eq!(n.notification_type, NotificationType::BudgetAlert);
        assert_eq!(n.priority, Priority::High);
        assert_eq!(n.related_id, Some(9));
        assert_eq!(n.title, "Budget almost spent: Travel");
        assert!(n.message.contains("20.00 USD"));
    }

    #[test]
    fn test_threshold_serializes_as_number() {
        assert_eq!(serde_json::to_value(AlertThreshold::Ninety).unwrap(), 90);
        let t: AlertThreshold = serde_json::from_value(serde_json::json!(75)).unwrap();
        assert_eq!(t, AlertThreshold::SeventyFive);
        assert!(serde_json::from_value::<AlertThreshold>(serde_json::json!(80)).is_err());
    }

    #[test]
    fn test_statuses_only() {
        let budgets = vec![budget(1, "Dining", 100.0), budget(2, "Zero", 0.0)];
        let expenses = vec![expense("Dining", 95.0, march(4))];
        let statuses = BudgetTracker::new().statuses(&budgets, &expenses, now());
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].tier, StatusTier::Critical);
    }
}
