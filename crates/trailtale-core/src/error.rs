//! Domain error types.

use thiserror::Error;

/// Top-level domain error type for hunt operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// The roster size does not match the total slot count of the plan.
    #[error(
        "configuration mismatch: {participants} participants but {slots} word slots; they must be equal"
    )]
    ConfigurationMismatch {
        /// Number of configured participants.
        participants: usize,
        /// Total number of word slots across the plan.
        slots: usize,
    },

    /// A structurally invalid hunt plan (bad checkpoint ids, empty slots).
    #[error("invalid hunt plan: {0}")]
    InvalidPlan(String),

    /// An operation was attempted outside its required phase.
    #[error("{operation} is not allowed in phase {phase}")]
    InvalidPhase {
        /// The rejected operation.
        operation: &'static str,
        /// The session phase at the time of the attempt.
        phase: &'static str,
    },

    /// A commit was attempted while one or more slots were still blank.
    #[error("cannot approve step: {missing} slot(s) still blank")]
    IncompleteInputs {
        /// Number of blank slots.
        missing: usize,
    },

    /// A slot reference outside the current checkpoint's bounds.
    #[error("slot index {index} out of range (current checkpoint has {len} slots)")]
    InvalidIndex {
        /// The rejected index.
        index: usize,
        /// Number of slots on the current checkpoint.
        len: usize,
    },

    /// The external text-generation service failed or timed out.
    /// Recovered locally with a fallback segment, never surfaced to players.
    #[error("generation service failure: {0}")]
    Generation(String),
}

impl GameError {
    /// Returns a stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationMismatch { .. } => "configuration_mismatch",
            Self::InvalidPlan(_) => "invalid_plan",
            Self::InvalidPhase { .. } => "invalid_phase",
            Self::IncompleteInputs { .. } => "incomplete_inputs",
            Self::InvalidIndex { .. } => "invalid_index",
            Self::Generation(_) => "generation_failure",
        }
    }
}
