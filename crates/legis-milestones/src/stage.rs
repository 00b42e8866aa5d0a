//! Legislative stage model
//!
//! A fixed, totally ordered list of progress stages. Order encodes
//! legislative progression; indices into [`STAGES`] are stable.

use crate::error::{MilestoneError, MilestoneResult};
use crate::status::Milestone;
use serde::Serialize;

/// How a stage is satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageKind {
    /// One milestone for the bill as a whole
    Shared {
        /// Key required to reach the stage
        key: Milestone,
    },
    /// Parallel Assembly and Senate tracks
    Dual {
        /// Key on the Assembly track
        assembly: Milestone,
        /// Key on the Senate track
        senate: Milestone,
    },
}

/// A single stage in the progress track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Stage {
    /// Stable identifier
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
    /// Shared or dual
    #[serde(flatten)]
    pub kind: StageKind,
}

impl Stage {
    const fn shared(id: &'static str, label: &'static str, key: Milestone) -> Self {
        Self {
            id,
            label,
            kind: StageKind::Shared { key },
        }
    }

    const fn dual(
        id: &'static str,
        label: &'static str,
        assembly: Milestone,
        senate: Milestone,
    ) -> Self {
        Self {
            id,
            label,
            kind: StageKind::Dual { assembly, senate },
        }
    }

    /// Whether this stage has parallel chamber tracks
    #[inline]
    #[must_use]
    pub const fn is_dual(&self) -> bool {
        matches!(self.kind, StageKind::Dual { .. })
    }
}

/// Stage list in legislative order
pub const STAGES: [Stage; 6] = [
    Stage::shared("introduced", "Introduced", Milestone::Introduced),
    Stage::dual(
        "committee",
        "In Committee",
        Milestone::InAssemblyComm,
        Milestone::InSenateComm,
    ),
    Stage::dual(
        "floor",
        "On Floor Calendar",
        Milestone::AssemblyFloor,
        Milestone::SenateFloor,
    ),
    Stage::dual(
        "passed",
        "Passed",
        Milestone::PassedAssembly,
        Milestone::PassedSenate,
    ),
    Stage::shared("governor", "Delivered to Governor", Milestone::DeliveredToGov),
    Stage::shared("law", "Signed into Law", Milestone::SignedByGov),
];

/// Index of a stage by id
///
/// # Errors
/// `MilestoneError::UnknownStage` if no stage has this id
pub fn stage_index(id: &str) -> MilestoneResult<usize> {
    STAGES
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| MilestoneError::unknown_stage(id))
}

/// Stage by id
///
/// # Errors
/// `MilestoneError::UnknownStage` if no stage has this id
pub fn stage_by_id(id: &str) -> MilestoneResult<&'static Stage> {
    stage_index(id).map(|idx| &STAGES[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn stage_ids_are_unique() {
        let ids: HashSet<_> = STAGES.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), STAGES.len());
    }

    #[test]
    fn introduced_is_first_and_shared() {
        assert_eq!(STAGES[0].id, "introduced");
        assert!(!STAGES[0].is_dual());
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(stage_index("committee"), Ok(1));
        assert!(stage_by_id("committee").unwrap().is_dual());
        assert_eq!(
            stage_index("conference"),
            Err(MilestoneError::unknown_stage("conference"))
        );
    }

    #[test]
    fn no_milestone_is_used_twice() {
        let mut seen = HashSet::new();
        for stage in &STAGES {
            match stage.kind {
                StageKind::Shared { key } => assert!(seen.insert(key)),
                StageKind::Dual { assembly, senate } => {
                    assert!(seen.insert(assembly));
                    assert!(seen.insert(senate));
                }
            }
        }
    }
}
