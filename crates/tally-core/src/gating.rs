//! Plan tiers and feature gating
//!
//! Each tier caps how many budgets, debts and recurring rules can exist and
//! which features are unlocked. Callers check the gate before creating a
//! record or running a gated feature.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
    Family,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
            Self::Family => "family",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "premium" | "pro" => Ok(Self::Premium),
            "family" => Ok(Self::Family),
            _ => Err(format!("Unknown tier: {}", s)),
        }
    }
}

/// Countable records a tier may cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Budgets,
    Debts,
    RecurringRules,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budgets => "budgets",
            Self::Debts => "debts",
            Self::RecurringRules => "recurring rules",
        }
    }
}

/// Features that are on or off per tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    CsvExport,
    FamilySharing,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CsvExport => "csv_export",
            Self::FamilySharing => "family_sharing",
        }
    }

    pub fn all() -> &'static [Feature] {
        &[Self::CsvExport, Self::FamilySharing]
    }
}

/// Tier limits and feature checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureGate {
    tier: SubscriptionTier,
}

/// Serializable summary of what a tier allows
#[derive(Debug, Clone, Serialize)]
pub struct TierSummary {
    pub tier: SubscriptionTier,
    pub max_budgets: Option<usize>,
    pub max_debts: Option<usize>,
    pub max_recurring_rules: Option<usize>,
    pub features: Vec<&'static str>,
}

impl FeatureGate {
    pub fn for_tier(tier: SubscriptionTier) -> Self {
        Self { tier }
    }

    pub fn tier(&self) -> SubscriptionTier {
        self.tier
    }

    /// Maximum number of records of a resource, `None` when unlimited
    pub fn limit(&self, resource: Resource) -> Option<usize> {
        match (self.tier, resource) {
            (SubscriptionTier::Free, Resource::Budgets) => Some(5),
            (SubscriptionTier::Free, Resource::Debts) => Some(3),
            (SubscriptionTier::Free, Resource::RecurringRules) => Some(5),
            _ => None,
        }
    }

    pub fn allows(&self, feature: Feature) -> bool {
        match feature {
            Feature::CsvExport => self.tier != SubscriptionTier::Free,
            Feature::FamilySharing => self.tier == SubscriptionTier::Family,
        }
    }

    /// Check that one more record fits under the tier's cap
    pub fn check_create(&self, resource: Resource, current_count: usize) -> Result<()> {
        match self.limit(resource) {
            Some(max) if current_count >= max => Err(Error::TierLimit(format!(
                "The {} plan allows {} {}; upgrade to add more",
                self.tier,
                max,
                resource.as_str()
            ))),
            _ => Ok(()),
        }
    }

    /// Check that a feature is unlocked
    pub fn require(&self, feature: Feature) -> Result<()> {
        if self.allows(feature) {
            Ok(())
        } else {
            Err(Error::TierLimit(format!(
                "{} is not available on the {} plan",
                feature.as_str(),
                self.tier
            )))
        }
    }

    pub fn summary(&self) -> TierSummary {
        TierSummary {
            tier: self.tier,
            max_budgets: self.limit(Resource::Budgets),
            max_debts: self.limit(Resource::Debts),
            max_recurring_rules: self.limit(Resource::RecurringRules),
            features: Feature::all()
                .iter()
                .filter(|f| self.allows(**f))
                .map(|f| f.as_str())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_budget_cap() {
        let gate = FeatureGate::for_tier(SubscriptionTier::Free);
        assert!(gate.check_create(Resource::Budgets, 4).is_ok());
        let err = gate.check_create(Resource::Budgets, 5).unwrap_err();
        assert!(matches!(err, Error::TierLimit(_)));
        assert!(err.to_string().contains("free plan allows 5 budgets"));
    }

    #[test]
    fn test_premium_unlimited() {
        let gate = FeatureGate::for_tier(SubscriptionTier::Premium);
        assert_eq!(gate.limit(Resource::Budgets), None);
        assert!(gate.check_create(Resource::Budgets, 500).is_ok());
        assert!(gate.check_create(Resource::Debts, 500).is_ok());
    }

    #[test]
    fn test_feature_matrix() {
        let free = FeatureGate::for_tier(SubscriptionTier::Free);
        let premium = FeatureGate::for_tier(SubscriptionTier::Premium);
        let family = FeatureGate::for_tier(SubscriptionTier::Family);

        assert!(!free.allows(Feature::CsvExport));
        assert!(free.require(Feature::CsvExport).is_err());

        assert!(premium.allows(Feature::CsvExport));
        assert!(!premium.allows(Feature::FamilySharing));

        assert!(family.allows(Feature::FamilySharing));
        assert!(family.require(Feature::CsvExport).is_ok());
    }

    #[test]
    fn test_summary() {
        let summary = FeatureGate::for_tier(SubscriptionTier::Free).summary();
        assert_eq!(summary.max_debts, Some(3));
        assert!(summary.features.is_empty());

        let family = FeatureGate::for_tier(SubscriptionTier::Family).summary();
        assert_eq!(family.features, vec!["csv_export", "family_sharing"]);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("Pro".parse::<SubscriptionTier>(), Ok(SubscriptionTier::Premium));
        assert!("gold".parse::<SubscriptionTier>().is_err());
    }
}
