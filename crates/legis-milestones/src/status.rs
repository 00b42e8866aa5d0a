//! Status vocabulary and normalization
//!
//! Upstream bill histories carry an open vocabulary of status codes
//! (`statusType`). [`RawStatus`] parses that vocabulary into a closed enum
//! and [`normalize`] maps it onto the canonical [`Milestone`] keys the stage
//! model understands. The mapping is an exhaustive `match`, so adding a new
//! [`RawStatus`] variant will not compile until it is given a canonical key.

use crate::config::VetoHandling;
use crate::error::{MilestoneError, MilestoneResult};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Canonical milestone keys referenced by the stage model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Milestone {
    /// Bill introduced and printed
    Introduced,
    /// Referred to an Assembly standing committee
    InAssemblyComm,
    /// Referred to a Senate standing committee
    InSenateComm,
    /// Reported to the Assembly floor calendar
    AssemblyFloor,
    /// Reported to the Senate floor calendar
    SenateFloor,
    /// Passed the Assembly
    PassedAssembly,
    /// Passed the Senate
    PassedSenate,
    /// Delivered to the governor
    DeliveredToGov,
    /// Signed into law
    SignedByGov,
    /// Vetoed by the governor (only produced under [`VetoHandling::Distinct`])
    Vetoed,
}

impl Milestone {
    /// All canonical keys in declaration order
    pub const ALL: [Milestone; 10] = [
        Milestone::Introduced,
        Milestone::InAssemblyComm,
        Milestone::InSenateComm,
        Milestone::AssemblyFloor,
        Milestone::SenateFloor,
        Milestone::PassedAssembly,
        Milestone::PassedSenate,
        Milestone::DeliveredToGov,
        Milestone::SignedByGov,
        Milestone::Vetoed,
    ];

    /// Upstream status code for this key
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Introduced => "INTRODUCED",
            Self::InAssemblyComm => "IN_ASSEMBLY_COMM",
            Self::InSenateComm => "IN_SENATE_COMM",
            Self::AssemblyFloor => "ASSEMBLY_FLOOR",
            Self::SenateFloor => "SENATE_FLOOR",
            Self::PassedAssembly => "PASSED_ASSEMBLY",
            Self::PassedSenate => "PASSED_SENATE",
            Self::DeliveredToGov => "DELIVERED_TO_GOV",
            Self::SignedByGov => "SIGNED_BY_GOV",
            Self::Vetoed => "VETOED",
        }
    }
}

impl Display for Milestone {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of normalizing a raw status
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusKey {
    /// Maps onto a canonical milestone
    Milestone(Milestone),
    /// Passed through unchanged; never matches a stage
    Unrecognized(String),
}

impl StatusKey {
    /// Canonical milestone, if any
    #[inline]
    #[must_use]
    pub fn milestone(&self) -> Option<Milestone> {
        match self {
            Self::Milestone(m) => Some(*m),
            Self::Unrecognized(_) => None,
        }
    }

    /// Status code string
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Milestone(m) => m.code(),
            Self::Unrecognized(code) => code,
        }
    }
}

impl Display for StatusKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Milestone> for StatusKey {
    fn from(m: Milestone) -> Self {
        Self::Milestone(m)
    }
}

/// Upstream status vocabulary
///
/// Variant names mirror the upstream codes (`IN_ASSEMBLY_COMM` is
/// [`RawStatus::InAssemblyComm`]).
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawStatus {
    Introduced,
    InAssemblyComm,
    InSenateComm,
    AssemblyFloor,
    SenateFloor,
    PassedAssembly,
    PassedSenate,
    DeliveredToGov,
    SignedByGov,
    Vetoed,
    PocketApproved,
    Chaptered,
    VetoOverridden,
    Stricken,
    Lost,
    Substituted,
    Adopted,
    /// Code outside the known vocabulary
    Other(String),
}

impl RawStatus {
    /// Parse, rejecting codes outside the known vocabulary
    ///
    /// # Errors
    /// `MilestoneError::UnknownStatus` when the code is not recognized
    pub fn parse_strict(code: &str) -> MilestoneResult<Self> {
        match code.parse::<RawStatus>() {
            Ok(Self::Other(other)) => Err(MilestoneError::unknown_status(other)),
            Ok(known) => Ok(known),
            Err(never) => match never {},
        }
    }

    /// Upstream status code
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Introduced => "INTRODUCED",
            Self::InAssemblyComm => "IN_ASSEMBLY_COMM",
            Self::InSenateComm => "IN_SENATE_COMM",
            Self::AssemblyFloor => "ASSEMBLY_FLOOR",
            Self::SenateFloor => "SENATE_FLOOR",
            Self::PassedAssembly => "PASSED_ASSEMBLY",
            Self::PassedSenate => "PASSED_SENATE",
            Self::DeliveredToGov => "DELIVERED_TO_GOV",
            Self::SignedByGov => "SIGNED_BY_GOV",
            Self::Vetoed => "VETOED",
            Self::PocketApproved => "POCKET_APPROVED",
            Self::Chaptered => "CHAPTERED",
            Self::VetoOverridden => "VETO_OVERRIDDEN",
            Self::Stricken => "STRICKEN",
            Self::Lost => "LOST",
            Self::Substituted => "SUBSTITUTED",
            Self::Adopted => "ADOPTED",
            Self::Other(code) => code,
        }
    }
}

impl FromStr for RawStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Ok(match code.to_ascii_uppercase().as_str() {
            "INTRODUCED" => Self::Introduced,
            "IN_ASSEMBLY_COMM" => Self::InAssemblyComm,
            "IN_SENATE_COMM" => Self::InSenateComm,
            "ASSEMBLY_FLOOR" => Self::AssemblyFloor,
            "SENATE_FLOOR" => Self::SenateFloor,
            "PASSED_ASSEMBLY" => Self::PassedAssembly,
            "PASSED_SENATE" => Self::PassedSenate,
            "DELIVERED_TO_GOV" => Self::DeliveredToGov,
            "SIGNED_BY_GOV" => Self::SignedByGov,
            "VETOED" => Self::Vetoed,
            "POCKET_APPROVED" => Self::PocketApproved,
            "CHAPTERED" => Self::Chaptered,
            "VETO_OVERRIDDEN" => Self::VetoOverridden,
            "STRICKEN" => Self::Stricken,
            "LOST" => Self::Lost,
            "SUBSTITUTED" => Self::Substituted,
            "ADOPTED" => Self::Adopted,
            _ => Self::Other(code.to_string()),
        })
    }
}

/// Map a parsed status onto its canonical key
#[must_use]
pub fn normalize(raw: &RawStatus, veto: VetoHandling) -> StatusKey {
    let milestone = match raw {
        RawStatus::Introduced => Milestone::Introduced,
        RawStatus::InAssemblyComm => Milestone::InAssemblyComm,
        RawStatus::InSenateComm => Milestone::InSenateComm,
        RawStatus::AssemblyFloor => Milestone::AssemblyFloor,
        RawStatus::SenateFloor => Milestone::SenateFloor,
        RawStatus::PassedAssembly => Milestone::PassedAssembly,
        RawStatus::PassedSenate => Milestone::PassedSenate,
        RawStatus::DeliveredToGov => Milestone::DeliveredToGov,
        RawStatus::Vetoed => match veto {
            VetoHandling::MergeWithDelivered => Milestone::DeliveredToGov,
            VetoHandling::Distinct => Milestone::Vetoed,
        },
        RawStatus::SignedByGov
        | RawStatus::PocketApproved
        | RawStatus::Chaptered
        | RawStatus::VetoOverridden => Milestone::SignedByGov,
        RawStatus::Stricken | RawStatus::Lost | RawStatus::Substituted | RawStatus::Adopted => {
            tracing::debug!(status = raw.code(), "status has no stage; passing through");
            return StatusKey::Unrecognized(raw.code().to_string());
        }
        RawStatus::Other(code) => {
            tracing::warn!(status = %code, "unrecognized milestone status; passing through");
            return StatusKey::Unrecognized(code.clone());
        }
    };
    StatusKey::Milestone(milestone)
}

/// Normalize a raw status string with the default veto policy
#[must_use]
pub fn normalize_status(code: &str) -> StatusKey {
    match code.parse::<RawStatus>() {
        Ok(raw) => normalize(&raw, VetoHandling::default()),
        Err(never) => match never {},
    }
}
