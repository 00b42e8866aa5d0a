//! Reached-set building and chamber track assignment

use crate::chamber::Chamber;
use crate::config::MilestoneConfig;
use crate::status::{normalize, Milestone, RawStatus, StatusKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One action in a bill's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneEvent {
    /// Raw upstream status code
    pub status_type: String,
    /// Date the action was recorded
    #[serde(default, alias = "actionDate")]
    pub date: Option<NaiveDate>,
    /// Free-text description of the action
    #[serde(default, alias = "statusDesc")]
    pub description: Option<String>,
}

impl MilestoneEvent {
    /// Create event with status only
    #[inline]
    #[must_use]
    pub fn new(status_type: impl Into<String>) -> Self {
        Self {
            status_type: status_type.into(),
            date: None,
            description: None,
        }
    }

    /// With action date
    #[inline]
    #[must_use]
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Normalized milestone keys one track has reached
///
/// Keeps the earliest known date per key. Keys that normalized to
/// [`StatusKey::Unrecognized`] are retained separately and never satisfy a
/// stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachedSet {
    reached: BTreeMap<Milestone, Option<NaiveDate>>,
    unrecognized: BTreeSet<String>,
}

impl ReachedSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a normalized key
    ///
    /// A distinct `Vetoed` key also marks `DeliveredToGov`.
    pub fn insert(&mut self, key: StatusKey, date: Option<NaiveDate>) {
        match key {
            StatusKey::Milestone(m) => {
                if m == Milestone::Vetoed {
                    self.mark(Milestone::DeliveredToGov, date);
                }
                self.mark(m, date);
            }
            StatusKey::Unrecognized(code) => {
                self.unrecognized.insert(code);
            }
        }
    }

    /// Mark a milestone reached, keeping the earliest date
    pub fn mark(&mut self, milestone: Milestone, date: Option<NaiveDate>) {
        let slot = self.reached.entry(milestone).or_insert(date);
        *slot = match (*slot, date) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }

    /// Whether the milestone was reached
    #[inline]
    #[must_use]
    pub fn contains(&self, milestone: Milestone) -> bool {
        self.reached.contains_key(&milestone)
    }

    /// Earliest date the milestone was recorded
    #[inline]
    #[must_use]
    pub fn reached_on(&self, milestone: Milestone) -> Option<NaiveDate> {
        self.reached.get(&milestone).copied().flatten()
    }

    /// Number of reached milestones
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.reached.len()
    }

    /// Whether no milestone and no unrecognized code was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reached.is_empty() && self.unrecognized.is_empty()
    }

    /// Reached milestones in canonical order
    pub fn milestones(&self) -> impl Iterator<Item = Milestone> + '_ {
        self.reached.keys().copied()
    }

    /// Codes that passed through normalization unmapped
    pub fn unrecognized(&self) -> impl Iterator<Item = &str> + '_ {
        self.unrecognized.iter().map(String::as_str)
    }
}

impl FromIterator<Milestone> for ReachedSet {
    fn from_iter<I: IntoIterator<Item = Milestone>>(iter: I) -> Self {
        let mut set = Self::new();
        for m in iter {
            set.mark(m, None);
        }
        set
    }
}

/// Build a reached set with the default configuration
///
/// Every event's status is normalized and inserted. A non-empty history
/// always reaches `Introduced`, whether or not it records an introduction.
#[must_use]
pub fn build_reached_set(events: &[MilestoneEvent]) -> ReachedSet {
    build_reached_set_with(events, &MilestoneConfig::default())
}

/// Build a reached set under an explicit configuration
#[must_use]
pub fn build_reached_set_with(events: &[MilestoneEvent], config: &MilestoneConfig) -> ReachedSet {
    let mut set = ReachedSet::new();
    for event in events {
        let raw = match event.status_type.parse::<RawStatus>() {
            Ok(raw) => raw,
            Err(never) => match never {},
        };
        set.insert(normalize(&raw, config.veto_handling), event.date);
    }
    if !events.is_empty() {
        let first_date = events.iter().filter_map(|e| e.date).min();
        set.mark(Milestone::Introduced, first_date);
    }
    set
}

/// How the originating and companion histories were mapped onto chambers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackAssignment {
    /// Originating bill is the Assembly track
    OriginatingAssembly,
    /// Originating bill is the Senate track
    OriginatingSenate,
    /// No chamber known; both tracks carry the companion history
    Unassigned,
}

/// Assembly and Senate progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracks {
    /// Assembly track
    pub assembly: ReachedSet,
    /// Senate track
    pub senate: ReachedSet,
    /// Assignment that produced these tracks
    pub assignment: TrackAssignment,
}

impl Tracks {
    /// Whether the assignment came from a known chamber
    #[inline]
    #[must_use]
    pub fn is_authoritative(&self) -> bool {
        !matches!(self.assignment, TrackAssignment::Unassigned)
    }
}

/// Assign originating and companion reached sets to chamber tracks
///
/// With [`Chamber::Unknown`] neither history can be placed, so both tracks
/// take the companion set and the result is marked
/// [`TrackAssignment::Unassigned`].
#[must_use]
pub fn assign_tracks(originating: ReachedSet, companion: ReachedSet, chamber: Chamber) -> Tracks {
    match chamber {
        Chamber::Assembly => Tracks {
            assembly: originating,
            senate: companion,
            assignment: TrackAssignment::OriginatingAssembly,
        },
        Chamber::Senate => Tracks {
            assembly: companion,
            senate: originating,
            assignment: TrackAssignment::OriginatingSenate,
        },
        Chamber::Unknown => {
            tracing::debug!(
                originating = originating.len(),
                companion = companion.len(),
                "no chamber for originating bill; tracks unassigned"
            );
            Tracks {
                assembly: companion.clone(),
                senate: companion,
                assignment: TrackAssignment::Unassigned,
            }
        }
    }
}
