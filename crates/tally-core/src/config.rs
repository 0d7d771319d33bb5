//! Application configuration
//!
//! Config is resolved in order:
//! 1. Explicit path (`--config`)
//! 2. `TALLY_CONFIG` environment variable
//! 3. Override in data dir (~/.local/share/tally/config/tally.toml)
//! 4. Embedded defaults (compiled into binary)
//!
//! Keys missing from a file fall back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::gating::SubscriptionTier;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "TALLY_CONFIG";

/// Hard ceiling on the projection horizon (100 years)
const MAX_PROJECTION_MONTHS: u32 = 1200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    pub default_currency: String,
    pub tier: SubscriptionTier,
    pub projection: ProjectionConfig,
    pub alerts: AlertConfig,
    pub recurring: RecurringConfig,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
            tier: SubscriptionTier::Free,
            projection: ProjectionConfig::default(),
            alerts: AlertConfig::default(),
            recurring: RecurringConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Months before a projection gives up and reports "never"
    pub max_months: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self { max_months: 600 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub enabled: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurringConfig {
    pub max_catch_up: usize,
}

impl Default for RecurringConfig {
    fn default() -> Self {
        Self { max_catch_up: 366 }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("tally.toml"))
}

impl TallyConfig {
    /// Load configuration using the resolution order above
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let explicit = override_path.map(Path::to_path_buf).or(env_path);

        let content = if let Some(path) = explicit {
            // An explicitly named file must exist
            debug!(path = %path.display(), "Loading config");
            fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?
        } else {
            match default_config_path() {
                Some(path) if path.exists() => {
                    debug!(path = %path.display(), "Loading config override");
                    fs::read_to_string(&path).map_err(|e| {
                        Error::Config(format!("Failed to read {}: {}", path.display(), e))
                    })?
                }
                _ => DEFAULT_CONFIG.to_string(),
            }
        };

        Self::parse(&content)
    }

    /// Parse and validate config from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: TallyConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default_currency.trim().is_empty() {
            return Err(Error::Config("default_currency must not be empty".into()));
        }
        if self.projection.max_months == 0 || self.projection.max_months > MAX_PROJECTION_MONTHS {
            return Err(Error::Config(format!(
                "projection.max_months must be between 1 and {}",
                MAX_PROJECTION_MONTHS
            )));
        }
        if self.recurring.max_catch_up == 0 {
            return Err(Error::Config("recurring.max_catch_up must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_defaults_parse() {
        let config = TallyConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, TallyConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = TallyConfig::parse("tier = \"premium\"\n[projection]\nmax_months = 360\n")
            .unwrap();
        assert_eq!(config.tier, SubscriptionTier::Premium);
        assert_eq!(config.projection.max_months, 360);
        assert_eq!(config.default_currency, "USD");
        assert!(config.alerts.enabled);
        assert_eq!(config.recurring.max_catch_up, 366);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(TallyConfig::parse("[projection]\nmax_months = 0\n").is_err());
        assert!(TallyConfig::parse("[projection]\nmax_months = 5000\n").is_err());
        assert!(TallyConfig::parse("default_currency = \"\"\n").is_err());
        assert!(TallyConfig::parse("tier = \"gold\"\n").is_err());
        assert!(TallyConfig::parse("not toml at all [").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_currency = \"EUR\"\ntier = \"family\"").unwrap();

        let config = TallyConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.default_currency, "EUR");
        assert_eq!(config.tier, SubscriptionTier::Family);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = TallyConfig::load(Some(Path::new("/nonexistent/tally.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
