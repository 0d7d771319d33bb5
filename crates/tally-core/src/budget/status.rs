//! Budget status tiers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Budget;

/// Display tier derived from percentage of limit spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    /// Below 75%
    Safe,
    /// 75% up to 90%
    Warning,
    /// 90% up to 100%
    Critical,
    /// 100% or more
    Exceeded,
}

impl StatusTier {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Self::Exceeded
        } else if percentage >= 90.0 {
            Self::Critical
        } else if percentage >= 75.0 {
            Self::Warning
        } else {
            Self::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Exceeded => "exceeded",
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Month-to-date standing of one budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget_id: i64,
    pub category: String,
    pub currency: String,
    pub limit: f64,
    pub spent: f64,
    pub percentage: f64,
    /// Negative once the budget is blown
    pub remaining: f64,
    pub tier: StatusTier,
}

/// Status for a budget given what was spent, `None` when the limit is unusable
pub fn budget_status(budget: &Budget, spent: f64) -> Option<BudgetStatus> {
    let limit = budget.monthly_limit;
    if !limit.is_finite() || limit <= 0.0 || !spent.is_finite() {
        return None;
    }

    let percentage = spent / limit * 100.0;
    Some(BudgetStatus {
        budget_id: budget.id,
        category: budget.category.clone(),
        currency: budget.currency.clone(),
        limit,
        spent,
        percentage,
        remaining: limit - spent,
        tier: StatusTier::from_percentage(percentage),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetPeriod;
    use chrono::Utc;

    fn budget(limit: f64) -> Budget {
        Budget {
            id: 1,
            category: "Groceries".to_string(),
            monthly_limit: limit,
            currency: "USD".to_string(),
            period: BudgetPeriod::Monthly,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(StatusTier::from_percentage(0.0), StatusTier::Safe);
        assert_eq!(StatusTier::from_percentage(74.999), StatusTier::Safe);
        assert_eq!(StatusTier::from_percentage(75.0), StatusTier::Warning);
        assert_eq!(StatusTier::from_percentage(89.999), StatusTier::Warning);
        assert_eq!(StatusTier::from_percentage(90.0), StatusTier::Critical);
        assert_eq!(StatusTier::from_percentage(99.999), StatusTier::Critical);
        assert_eq!(StatusTier::from_percentage(100.0), StatusTier::Exceeded);
        assert_eq!(StatusTier::from_percentage(250.0), StatusTier::Exceeded);
    }

    #[test]
    fn test_status_values() {
        let status = budget_status(&budget(1_000.0), 750.0).unwrap();
        assert_eq!(status.percentage, 75.0);
        assert_eq!(status.remaining, 250.0);
        assert_eq!(status.tier, StatusTier::Warning);

        let over = budget_status(&budget(200.0), 260.0).unwrap();
        assert_eq!(over.tier, StatusTier::Exceeded);
        assert_eq!(over.remaining, -60.0);
    }

    #[test]
    fn test_unusable_limit() {
        assert!(budget_status(&budget(0.0), 10.0).is_none());
        assert!(budget_status(&budget(-50.0), 10.0).is_none());
        assert!(budget_status(&budget(f64::NAN), 10.0).is_none());
        assert!(budget_status(&budget(f64::INFINITY), 10.0).is_none());
    }
}
