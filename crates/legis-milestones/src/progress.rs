//! Stage resolution and the progress view model
//!
//! [`is_stage_reached`] and [`furthest_stage_index`] are the two predicates
//! the progress track is drawn from; [`BillProgress`] bundles their results
//! into the per-node data a renderer consumes.

use crate::chamber::Chamber;
use crate::config::MilestoneConfig;
use crate::error::MilestoneResult;
use crate::reached::{
    assign_tracks, build_reached_set_with, MilestoneEvent, ReachedSet, TrackAssignment, Tracks,
};
use crate::stage::{stage_index, Stage, StageKind, STAGES};
use crate::status::Milestone;
use chrono::NaiveDate;
use serde::Serialize;

/// Whether a stage is reached by either track
///
/// Shared stages need their key in either set. Dual stages need the
/// Assembly key in the Assembly set or the Senate key in the Senate set;
/// one side is enough.
#[must_use]
pub fn is_stage_reached(stage: &Stage, assembly: &ReachedSet, senate: &ReachedSet) -> bool {
    match stage.kind {
        StageKind::Shared { key } => assembly.contains(key) || senate.contains(key),
        StageKind::Dual {
            assembly: a,
            senate: s,
        } => assembly.contains(a) || senate.contains(s),
    }
}

/// Index of the last reached stage, `0` when none is reached
#[must_use]
pub fn furthest_stage_index(assembly: &ReachedSet, senate: &ReachedSet) -> usize {
    let mut furthest = 0;
    for (idx, stage) in STAGES.iter().enumerate() {
        if is_stage_reached(stage, assembly, senate) {
            furthest = idx;
        }
    }
    furthest
}

/// Render state of a stage node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Reached and behind the furthest stage
    Complete,
    /// The furthest stage
    Current,
    /// Not reached
    Pending,
}

/// Per-chamber lighting of a dual stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DualHalves {
    /// Assembly half reached
    pub assembly_lit: bool,
    /// Senate half reached
    pub senate_lit: bool,
}

/// One node of the progress track
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageNode {
    /// Stage id
    pub id: &'static str,
    /// Stage label
    pub label: &'static str,
    /// Position in the stage list
    pub index: usize,
    /// Whether either track reached the stage
    pub reached: bool,
    /// Render state
    pub state: NodeState,
    /// Half lighting, dual stages only
    pub halves: Option<DualHalves>,
    /// Earliest date either track reached the stage
    pub reached_on: Option<NaiveDate>,
}

/// Overall disposition of the bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Still moving through the legislature or awaiting action
    InProgress,
    /// Signed into law
    Enacted,
    /// Vetoed, only reported when vetoes are tracked distinctly
    Vetoed,
}

/// Everything a progress renderer needs for one bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillProgress {
    /// Nodes in stage order
    pub nodes: Vec<StageNode>,
    /// `connectors[i]` joins node `i` and `i + 1`; lit when node `i + 1` is reached
    pub connectors: Vec<bool>,
    /// Index of the current node
    pub furthest: usize,
    /// Track assignment used
    pub assignment: TrackAssignment,
    /// Overall disposition
    pub outcome: Outcome,
}

impl BillProgress {
    /// Derive progress from both histories
    #[must_use]
    pub fn derive(
        originating: &[MilestoneEvent],
        companion: &[MilestoneEvent],
        chamber: Chamber,
        config: &MilestoneConfig,
    ) -> Self {
        let tracks = assign_tracks(
            build_reached_set_with(originating, config),
            build_reached_set_with(companion, config),
            chamber,
        );
        Self::from_tracks(&tracks)
    }

    /// Build the view model from already-assigned tracks
    #[must_use]
    pub fn from_tracks(tracks: &Tracks) -> Self {
        let (assembly, senate) = (&tracks.assembly, &tracks.senate);
        let furthest = furthest_stage_index(assembly, senate);

        let nodes: Vec<StageNode> = STAGES
            .iter()
            .enumerate()
            .map(|(index, stage)| {
                let reached = is_stage_reached(stage, assembly, senate);
                let state = if index == furthest {
                    NodeState::Current
                } else if reached && index < furthest {
                    NodeState::Complete
                } else {
                    NodeState::Pending
                };
                let (halves, reached_on) = match stage.kind {
                    StageKind::Shared { key } => (
                        None,
                        earliest(assembly.reached_on(key), senate.reached_on(key)),
                    ),
                    StageKind::Dual {
                        assembly: a,
                        senate: s,
                    } => (
                        Some(DualHalves {
                            assembly_lit: assembly.contains(a),
                            senate_lit: senate.contains(s),
                        }),
                        earliest(assembly.reached_on(a), senate.reached_on(s)),
                    ),
                };
                StageNode {
                    id: stage.id,
                    label: stage.label,
                    index,
                    reached,
                    state,
                    halves,
                    reached_on,
                }
            })
            .collect();

        let connectors = nodes.windows(2).map(|pair| pair[1].reached).collect();

        let vetoed = assembly.contains(Milestone::Vetoed) || senate.contains(Milestone::Vetoed);
        let outcome = if vetoed {
            Outcome::Vetoed
        } else if nodes.last().is_some_and(|n| n.reached) {
            Outcome::Enacted
        } else {
            Outcome::InProgress
        };

        Self {
            nodes,
            connectors,
            furthest,
            assignment: tracks.assignment,
            outcome,
        }
    }

    /// Node by stage id
    ///
    /// # Errors
    /// `MilestoneError::UnknownStage` if no stage has this id
    pub fn node(&self, id: &str) -> MilestoneResult<&StageNode> {
        stage_index(id).map(|idx| &self.nodes[idx])
    }

    /// The current node
    #[inline]
    #[must_use]
    pub fn current(&self) -> &StageNode {
        &self.nodes[self.furthest]
    }
}

fn earliest(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VetoHandling;
    use crate::error::MilestoneError;

    fn set(ms: &[Milestone]) -> ReachedSet {
        ms.iter().copied().collect()
    }

    #[test]
    fn shared_stage_reached_from_either_set() {
        let stage = &STAGES[0];
        assert!(is_stage_reached(stage, &set(&[Milestone::Introduced]), &ReachedSet::new()));
        assert!(is_stage_reached(stage, &ReachedSet::new(), &set(&[Milestone::Introduced])));
        assert!(!is_stage_reached(stage, &ReachedSet::new(), &ReachedSet::new()));
    }

    #[test]
    fn dual_stage_needs_one_side_only() {
        let committee = &STAGES[1];
        assert!(is_stage_reached(
            committee,
            &set(&[Milestone::InAssemblyComm]),
            &ReachedSet::new()
        ));
        assert!(is_stage_reached(
            committee,
            &ReachedSet::new(),
            &set(&[Milestone::InSenateComm])
        ));
    }

    #[test]
    fn dual_stage_keys_are_chamber_specific() {
        let committee = &STAGES[1];
        // Senate key recorded on the Assembly track does not count
        assert!(!is_stage_reached(
            committee,
            &set(&[Milestone::InSenateComm]),
            &set(&[Milestone::InAssemblyComm])
        ));
    }

    #[test]
    fn furthest_defaults_to_zero() {
        assert_eq!(furthest_stage_index(&ReachedSet::new(), &ReachedSet::new()), 0);
    }

    #[test]
    fn furthest_with_only_introduced_on_both_tracks() {
        let intro = set(&[Milestone::Introduced]);
        assert_eq!(furthest_stage_index(&intro, &intro.clone()), 0);
    }

    #[test]
    fn furthest_skips_gaps() {
        let assembly = set(&[Milestone::Introduced, Milestone::DeliveredToGov]);
        assert_eq!(furthest_stage_index(&assembly, &ReachedSet::new()), 4);
    }

    #[test]
    fn empty_histories_show_introduced_as_current() {
        let progress =
            BillProgress::derive(&[], &[], Chamber::Assembly, &MilestoneConfig::default());
        assert_eq!(progress.furthest, 0);
        assert_eq!(progress.nodes[0].state, NodeState::Current);
        assert!(!progress.nodes[0].reached);
        assert!(progress.connectors.iter().all(|lit| !lit));
        assert_eq!(progress.outcome, Outcome::InProgress);
    }

    #[test]
    fn states_follow_furthest() {
        let events = [
            MilestoneEvent::new("IN_SENATE_COMM"),
            MilestoneEvent::new("SENATE_FLOOR"),
        ];
        let progress =
            BillProgress::derive(&events, &[], Chamber::Senate, &MilestoneConfig::default());
        let states: Vec<_> = progress.nodes.iter().map(|n| n.state).collect();
        assert_eq!(
            states,
            vec![
                NodeState::Complete,
                NodeState::Complete,
                NodeState::Current,
                NodeState::Pending,
                NodeState::Pending,
                NodeState::Pending,
            ]
        );
        assert_eq!(progress.connectors, vec![true, true, false, false, false]);
        assert_eq!(progress.current().id, "floor");
    }

    #[test]
    fn signed_bill_is_enacted() {
        let events = [MilestoneEvent::new("CHAPTERED")];
        let progress =
            BillProgress::derive(&events, &[], Chamber::Assembly, &MilestoneConfig::default());
        assert_eq!(progress.outcome, Outcome::Enacted);
        assert_eq!(progress.current().id, "law");
    }

    #[test]
    fn distinct_veto_reports_vetoed_outcome() {
        let config = MilestoneConfig::new().with_veto_handling(VetoHandling::Distinct);
        let events = [MilestoneEvent::new("PASSED_SENATE"), MilestoneEvent::new("VETOED")];
        let progress = BillProgress::derive(&events, &[], Chamber::Senate, &config);
        assert_eq!(progress.outcome, Outcome::Vetoed);
        assert_eq!(progress.current().id, "governor");

        let merged =
            BillProgress::derive(&events, &[], Chamber::Senate, &MilestoneConfig::default());
        assert_eq!(merged.outcome, Outcome::InProgress);
        assert_eq!(merged.current().id, "governor");
    }

    #[test]
    fn node_lookup_rejects_unknown_ids() {
        let progress =
            BillProgress::derive(&[], &[], Chamber::Unknown, &MilestoneConfig::default());
        assert_eq!(progress.node("passed").unwrap().index, 3);
        assert_eq!(
            progress.node("conference").unwrap_err(),
            MilestoneError::unknown_stage("conference")
        );
    }
}
