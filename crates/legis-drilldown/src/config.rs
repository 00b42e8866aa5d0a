//! Drill-down cache configuration

use serde::{Deserialize, Serialize};

/// What happens to a key whose fetch failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The next access refetches the key
    #[default]
    RetryOnAccess,
    /// The failure is reported until [`retry`](crate::DrillDownCache::retry) is called
    Sticky,
}

/// Configuration for [`DrillDownCache`](crate::DrillDownCache)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillDownConfig {
    /// Failed-fetch policy
    pub failure_policy: FailurePolicy,
}

impl DrillDownConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With failure policy
    #[inline]
    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}
