//! Dashboard configuration

use crate::error::ConfigError;
use legis_drilldown::DrillDownConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Longest accepted summary time-to-live, 1000 years
///
/// The cache refuses expiry periods beyond this.
pub const MAX_SUMMARY_TTL_SECS: u64 = 1000 * 365 * 24 * 60 * 60;

/// Configuration for dashboards and their caches
///
/// ```toml
/// summary_capacity = 500
/// summary_ttl_secs = 60
///
/// [drilldown]
/// failure_policy = "sticky"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Maximum cached summary queries
    pub summary_capacity: u64,
    /// Summary time-to-live in seconds, `0` disables expiry, at most
    /// [`MAX_SUMMARY_TTL_SECS`]
    pub summary_ttl_secs: u64,
    /// Drill-down cache settings
    pub drilldown: DrillDownConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            summary_capacity: 1000,
            summary_ttl_secs: 300,
            drilldown: DrillDownConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With summary cache capacity
    #[inline]
    #[must_use]
    pub fn with_summary_capacity(mut self, capacity: u64) -> Self {
        self.summary_capacity = capacity;
        self
    }

    /// With summary time-to-live
    #[inline]
    #[must_use]
    pub fn with_summary_ttl(mut self, ttl: Duration) -> Self {
        self.summary_ttl_secs = ttl.as_secs();
        self
    }

    /// With drill-down settings
    #[inline]
    #[must_use]
    pub fn with_drilldown(mut self, drilldown: DrillDownConfig) -> Self {
        self.drilldown = drilldown;
        self
    }

    /// Summary time-to-live, `None` when expiry is disabled
    ///
    /// Clamped to [`MAX_SUMMARY_TTL_SECS`] for configurations built without
    /// [`validate`](Self::validate).
    #[must_use]
    pub fn summary_ttl(&self) -> Option<Duration> {
        (self.summary_ttl_secs > 0)
            .then(|| Duration::from_secs(self.summary_ttl_secs.min(MAX_SUMMARY_TTL_SECS)))
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// `ConfigError::Parse` for malformed TOML, `ConfigError::Invalid` for
    /// out-of-range values
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file can't be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "loaded dashboard config");
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.summary_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "summary_capacity",
                message: "must be at least 1".to_string(),
            });
        }
        if self.summary_ttl_secs > MAX_SUMMARY_TTL_SECS {
            return Err(ConfigError::Invalid {
                field: "summary_ttl_secs",
                message: format!("must be at most {MAX_SUMMARY_TTL_SECS}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legis_drilldown::FailurePolicy;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.summary_ttl(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = DashboardConfig::from_toml_str(
            "summary_ttl_secs = 0\n[drilldown]\nfailure_policy = \"sticky\"\n",
        )
        .unwrap();
        assert_eq!(config.summary_capacity, 1000);
        assert_eq!(config.summary_ttl(), None);
        assert_eq!(config.drilldown.failure_policy, FailurePolicy::Sticky);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = DashboardConfig::from_toml_str("summary_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "summary_capacity", .. }));
    }

    #[test]
    fn oversized_ttl_is_rejected() {
        let err = DashboardConfig::from_toml_str("summary_ttl_secs = 99999999999").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "summary_ttl_secs", .. }));

        let limit = format!("summary_ttl_secs = {MAX_SUMMARY_TTL_SECS}");
        assert!(DashboardConfig::from_toml_str(&limit).is_ok());
    }

    #[test]
    fn unvalidated_ttl_is_clamped() {
        let config = DashboardConfig::new().with_summary_ttl(Duration::from_secs(u64::MAX));
        assert_eq!(
            config.summary_ttl(),
            Some(Duration::from_secs(MAX_SUMMARY_TTL_SECS))
        );
    }

    #[test]
    fn unknown_policy_is_a_parse_error() {
        let err = DashboardConfig::from_toml_str("[drilldown]\nfailure_policy = \"never\"")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn builders() {
        let config = DashboardConfig::new()
            .with_summary_capacity(10)
            .with_summary_ttl(Duration::from_secs(5))
            .with_drilldown(DrillDownConfig::new().with_failure_policy(FailurePolicy::Sticky));
        assert_eq!(config.summary_capacity, 10);
        assert_eq!(config.summary_ttl_secs, 5);
        assert_eq!(config.drilldown.failure_policy, FailurePolicy::Sticky);
    }
}
