//! Error types for milestone derivation
//!
//! Derivation itself never fails; these errors come from the strict
//! lookup helpers used by callers that want unknown input rejected.

/// Errors from strict status parsing and stage lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MilestoneError {
    /// Status code is not part of the known upstream vocabulary
    #[error("unknown milestone status: '{0}'")]
    UnknownStatus(String),

    /// Stage id is not part of the stage list
    #[error("unknown stage id: '{0}'")]
    UnknownStage(String),
}

impl MilestoneError {
    /// Create unknown status error
    pub fn unknown_status(code: impl Into<String>) -> Self {
        Self::UnknownStatus(code.into())
    }

    /// Create unknown stage error
    pub fn unknown_stage(id: impl Into<String>) -> Self {
        Self::UnknownStage(id.into())
    }
}

/// Result type alias for milestone operations
pub type MilestoneResult<T> = Result<T, MilestoneError>;
