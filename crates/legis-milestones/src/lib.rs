//! Legis Milestones
//!
//! Derives a bill's progress through the New York State legislature from
//! its milestone history and the history of its cross-chamber companion.
//!
//! # Pipeline
//!
//! ```text
//! statusType ─► RawStatus ─► normalize ─► ReachedSet ─┐
//!                                                     ├─► assign_tracks ─► Tracks ─► BillProgress
//! companion history ─────────────────────► ReachedSet ┘         ▲
//!                                                            Chamber
//! ```
//!
//! # Example
//!
//! ```rust
//! use legis_milestones::{BillProgress, Chamber, MilestoneConfig, MilestoneEvent, NodeState};
//!
//! let history = vec![MilestoneEvent::new("IN_ASSEMBLY_COMM")];
//! let progress = BillProgress::derive(&history, &[], Chamber::Assembly, &MilestoneConfig::default());
//!
//! let committee = progress.node("committee").unwrap();
//! assert_eq!(committee.state, NodeState::Current);
//! assert!(committee.halves.unwrap().assembly_lit);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod chamber;
pub mod config;
pub mod error;
pub mod progress;
pub mod reached;
pub mod stage;
pub mod status;

// Re-exports
pub use chamber::Chamber;
pub use config::{MilestoneConfig, VetoHandling};
pub use error::{MilestoneError, MilestoneResult};
pub use progress::{
    furthest_stage_index, is_stage_reached, BillProgress, DualHalves, NodeState, Outcome, StageNode,
};
pub use reached::{
    assign_tracks, build_reached_set, build_reached_set_with, MilestoneEvent, ReachedSet,
    TrackAssignment, Tracks,
};
pub use stage::{stage_by_id, stage_index, Stage, StageKind, STAGES};
pub use status::{normalize, normalize_status, Milestone, RawStatus, StatusKey};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for progress derivation
    pub use crate::{
        BillProgress, Chamber, Milestone, MilestoneConfig, MilestoneEvent, NodeState, ReachedSet,
        Stage, STAGES,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
