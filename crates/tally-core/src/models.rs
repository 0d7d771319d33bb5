//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of debt being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    CreditCard,
    StudentLoan,
    Mortgage,
    AutoLoan,
    PersonalLoan,
    Medical,
    Other,
}

impl DebtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::StudentLoan => "student_loan",
            Self::Mortgage => "mortgage",
            Self::AutoLoan => "auto_loan",
            Self::PersonalLoan => "personal_loan",
            Self::Medical => "medical",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for DebtType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "credit_card" | "card" => Ok(Self::CreditCard),
            "student_loan" | "student" => Ok(Self::StudentLoan),
            "mortgage" => Ok(Self::Mortgage),
            "auto_loan" | "auto" | "car" => Ok(Self::AutoLoan),
            "personal_loan" | "personal" => Ok(Self::PersonalLoan),
            "medical" => Ok(Self::Medical),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown debt type: {}", s)),
        }
    }
}

impl std::fmt::Display for DebtType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A debt (loan, card balance, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: i64,
    pub name: String,
    pub debt_type: DebtType,
    pub currency: String,
    /// Outstanding balance
    pub current_balance: f64,
    /// Annual percentage rate (18.0 = 18%)
    pub interest_rate: f64,
    pub minimum_payment: f64,
    pub created_at: DateTime<Utc>,
}

impl Debt {
    /// Monthly interest rate as a fraction (18% APR -> 0.015)
    pub fn monthly_rate(&self) -> f64 {
        self.interest_rate / 12.0 / 100.0
    }

    /// True when the first month's payment does not cover its interest,
    /// so the balance can never reach zero.
    pub fn never_amortizes(&self, extra_payment: f64) -> bool {
        self.current_balance > 0.0
            && self.minimum_payment + extra_payment <= self.current_balance * self.monthly_rate()
    }
}

/// Highest annual rate a stored debt may carry, in percent
pub const MAX_INTEREST_RATE: f64 = 1_000.0;

/// A debt to be created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDebt {
    pub name: String,
    pub debt_type: DebtType,
    pub currency: String,
    pub current_balance: f64,
    pub interest_rate: f64,
    pub minimum_payment: f64,
}

impl NewDebt {
    /// Reject values that can never be stored
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Debt name is required".to_string());
        }
        if !self.current_balance.is_finite() || self.current_balance < 0.0 {
            return Err("Balance must be zero or more".to_string());
        }
        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            return Err("Interest rate must be zero or more".to_string());
        }
        if self.interest_rate > MAX_INTEREST_RATE {
            return Err(format!(
                "Interest rate must be at most {}% (got {})",
                MAX_INTEREST_RATE, self.interest_rate
            ));
        }
        if !self.minimum_payment.is_finite() || self.minimum_payment <= 0.0 {
            return Err("Minimum payment must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Budget period. Only monthly budgets are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unsupported budget period: {}", s)),
        }
    }
}

/// A monthly spending limit for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    /// Category key, matched against expense categories by exact equality
    pub category: String,
    pub monthly_limit: f64,
    pub currency: String,
    pub period: BudgetPeriod,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudget {
    pub category: String,
    pub monthly_limit: f64,
    pub currency: String,
}

/// A spending record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub category: String,
    /// Positive = money spent, negative = refund
    pub amount: f64,
    pub currency: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    /// Recurring rule that generated this expense
    pub recurring_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    pub currency: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    #[serde(default)]
    pub recurring_id: Option<i64>,
}

/// An income record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub source: String,
    pub amount: f64,
    pub currency: String,
    pub date: NaiveDate,
    pub recurring_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIncome {
    pub source: String,
    pub amount: f64,
    pub currency: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub recurring_id: Option<i64>,
}

/// What a recurring rule generates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringKind {
    Expense,
    Income,
}

impl RecurringKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for RecurringKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(format!("Unknown recurring kind: {}", s)),
        }
    }
}

impl std::fmt::Display for RecurringKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often a recurring transaction repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" | "fortnightly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" | "annual" | "annually" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rule that materializes expenses or income on a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTransaction {
    pub id: i64,
    pub kind: RecurringKind,
    pub name: String,
    /// Budget category for generated expenses
    pub category: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub frequency: Frequency,
    /// Next date an occurrence is due
    pub next_date: NaiveDate,
    /// Day of month the schedule is pinned to (survives short-month clamping)
    pub anchor_day: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecurringTransaction {
    pub kind: RecurringKind,
    pub name: String,
    pub category: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub frequency: Frequency,
    /// First occurrence
    pub start_date: NaiveDate,
}

/// Notification categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    BudgetAlert,
    DebtMilestone,
    Recurring,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetAlert => "budget_alert",
            Self::DebtMilestone => "debt_milestone",
            Self::Recurring => "recurring",
            Self::System => "system",
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "budget_alert" => Ok(Self::BudgetAlert),
            "debt_milestone" => Ok(Self::DebtMilestone),
            "recurring" => Ok(Self::Recurring),
            "system" => Ok(Self::System),
            _ => Err(format!("Unknown notification type: {}", s)),
        }
    }
}

/// Notification urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    /// Row the notification is about (budget id for budget alerts)
    pub related_id: Option<i64>,
    /// Where the UI should navigate on click
    pub action_url: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification payload handed to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub related_id: Option<i64>,
    pub action_url: Option<String>,
}

/// Dashboard statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_debt: f64,
    pub total_minimum_payments: f64,
    pub debt_count: i64,
    pub budget_count: i64,
    /// Budgets whose month-to-date spend reached the limit
    pub budgets_over_limit: i64,
    pub month_spending: f64,
    pub month_income: f64,
    pub net_cash_flow: f64,
    pub unread_notifications: i64,
    pub active_recurring: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debt(balance: f64, rate: f64, minimum: f64) -> Debt {
        Debt {
            id: 1,
            name: "Card".to_string(),
            debt_type: DebtType::CreditCard,
            currency: "USD".to_string(),
            current_balance: balance,
            interest_rate: rate,
            minimum_payment: minimum,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_debt_type_parse() {
        assert_eq!("credit_card".parse::<DebtType>(), Ok(DebtType::CreditCard));
        assert_eq!("credit-card".parse::<DebtType>(), Ok(DebtType::CreditCard));
        assert_eq!("Mortgage".parse::<DebtType>(), Ok(DebtType::Mortgage));
        assert!("boat".parse::<DebtType>().is_err());
    }

    #[test]
    fn test_monthly_rate() {
        let d = debt(10_000.0, 18.0, 300.0);
        assert!((d.monthly_rate() - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_never_amortizes() {
        // 150/month interest on 10k at 18%
        assert!(debt(10_000.0, 18.0, 150.0).never_amortizes(0.0));
        assert!(!debt(10_000.0, 18.0, 150.0).never_amortizes(1.0));
        assert!(!debt(0.0, 18.0, 10.0).never_amortizes(0.0));
    }

    #[test]
    fn test_new_debt_validate() {
        let mut nd = NewDebt {
            name: "Loan".to_string(),
            debt_type: DebtType::PersonalLoan,
            currency: "USD".to_string(),
            current_balance: 100.0,
            interest_rate: 5.0,
            minimum_payment: 10.0,
        };
        assert!(nd.validate().is_ok());

        nd.minimum_payment = 0.0;
        assert!(nd.validate().is_err());

        nd.minimum_payment = 10.0;
        nd.current_balance = f64::NAN;
        assert!(nd.validate().is_err());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);
    }

    #[test]
    fn test_new_notification_serializes_type_field() {
        let n = NewNotification {
            notification_type: NotificationType::BudgetAlert,
            title: "t".to_string(),
            message: "m".to_string(),
            priority: Priority::High,
            related_id: Some(3),
            action_url: None,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "budget_alert");
        assert_eq!(json["priority"], "high");
    }
}
