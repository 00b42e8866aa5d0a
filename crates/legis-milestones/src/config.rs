//! Milestone derivation configuration

use serde::{Deserialize, Serialize};

/// How a governor's veto is folded into the stage model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VetoHandling {
    /// `VETOED` counts as reaching `DELIVERED_TO_GOV` and nothing more
    #[default]
    MergeWithDelivered,
    /// `VETOED` reaches `DELIVERED_TO_GOV` and is also kept as its own key,
    /// so the progress view can report the bill as vetoed
    Distinct,
}

/// Configuration for reached-set building and progress derivation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneConfig {
    /// Veto folding policy
    pub veto_handling: VetoHandling,
}

impl MilestoneConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With veto handling policy
    #[inline]
    #[must_use]
    pub fn with_veto_handling(mut self, veto_handling: VetoHandling) -> Self {
        self.veto_handling = veto_handling;
        self
    }
}
